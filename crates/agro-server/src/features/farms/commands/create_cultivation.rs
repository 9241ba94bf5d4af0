//! Create cultivation command
//!
//! Plants a crop on a farm. The farm's cultivable area bounds the sum of its
//! cultivated areas.

use agro_common::area::cultivation_fits;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::features::farms::types::{CULTIVATED_AREA, CULTIVATION_FARM_ID, CULTIVATION_NAME, HARVEST};
use crate::features::shared::{store_failure, StoreFailure, ValidationErrors, Validator};
use crate::models::{Cultivation, NewCultivation};
use crate::store::{CultivationStore, FarmStore, StoreError};

/// Request body of `POST /v1/farms/cultivation`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCultivationCommand {
    pub cultivation_name: Option<String>,
    pub farm_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cultivated_area: Option<Decimal>,
    pub harvest: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateCultivationError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("The farm provided does not exist.")]
    FarmNotFound,
    #[error("The farm does not have enough cultivable area for this cultivation.")]
    InsufficientArea,
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

impl CreateCultivationCommand {
    /// The validated name is upper-cased.
    pub fn validate(self) -> Result<NewCultivation, ValidationErrors> {
        let mut validator = Validator::new();
        let cultivation_name = validator.text(&CULTIVATION_NAME, self.cultivation_name);
        let farm_id = validator.value(&CULTIVATION_FARM_ID, self.farm_id);
        let cultivated_area = validator.value(&CULTIVATED_AREA, self.cultivated_area);
        let harvest = validator.text(&HARVEST, self.harvest);

        validator.finish(|| {
            Some(NewCultivation {
                farm_id: farm_id?,
                cultivation_name: cultivation_name?.to_uppercase(),
                cultivated_area: cultivated_area?,
                harvest: harvest?,
            })
        })
    }
}

#[tracing::instrument(skip(farms, cultivations, command), fields(farm_id = ?command.farm_id))]
pub async fn handle(
    farms: &dyn FarmStore,
    cultivations: &dyn CultivationStore,
    command: CreateCultivationCommand,
) -> Result<Cultivation, CreateCultivationError> {
    let cultivation = command.validate()?;

    let (farm, already_cultivated) = tokio::try_join!(
        async {
            farms
                .find_by_id(cultivation.farm_id)
                .await
                .map_err(store_failure("Could not check whether the farm exists, please try again."))
        },
        async {
            cultivations
                .sum_cultivated_area_by_farm(cultivation.farm_id)
                .await
                .map_err(store_failure("Could not check the area already cultivated, please try again."))
        },
    )?;

    let farm = farm.ok_or(CreateCultivationError::FarmNotFound)?;

    if !cultivation_fits(farm.cultivable_area, already_cultivated, cultivation.cultivated_area) {
        tracing::debug!(
            cultivable = %farm.cultivable_area,
            %already_cultivated,
            requested = %cultivation.cultivated_area,
            "Cultivation does not fit"
        );
        return Err(CreateCultivationError::InsufficientArea);
    }

    let created = cultivations.create(cultivation).await.map_err(|e| match e {
        StoreError::MissingReference => CreateCultivationError::FarmNotFound,
        StoreError::CapacityExceeded => CreateCultivationError::InsufficientArea,
        other => store_failure("Could not create this cultivation, please try again.")(other).into(),
    })?;

    tracing::info!(
        cultivation_id = created.id,
        name = %created.cultivation_name,
        "Cultivation created"
    );

    Ok(created)
}
