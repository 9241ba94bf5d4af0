//! Create farm command

use agro_common::area::farm_area_is_consistent;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::features::farms::types::{
    CITY, CULTIVABLE_AREA, FARM_NAME, FARM_PRODUCER_ID, PRESERVED_AREA, STATE, TOTAL_AREA,
};
use crate::features::shared::{store_failure, StoreFailure, ValidationErrors, Validator};
use crate::models::{Farm, NewFarm};
use crate::store::{FarmStore, ProducerStore, StoreError};

/// Request body of `POST /v1/farms`
///
/// # Examples
///
/// ```json
/// {
///   "farmName": "Fazenda Boa Vista",
///   "producerId": 1,
///   "city": "Tubarão",
///   "state": "SC",
///   "totalArea": 100,
///   "cultivableArea": 80,
///   "preservedArea": 20
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateFarmCommand {
    pub farm_name: Option<String>,
    pub producer_id: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_area: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cultivable_area: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub preserved_area: Option<Decimal>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateFarmError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("The producer provided does not exist.")]
    ProducerNotFound,
    #[error("The area in use exceeds the farm's total area.")]
    AreaExceedsTotal,
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

impl CreateFarmCommand {
    pub fn validate(self) -> Result<NewFarm, ValidationErrors> {
        let mut validator = Validator::new();
        let farm_name = validator.text(&FARM_NAME, self.farm_name);
        let producer_id = validator.value(&FARM_PRODUCER_ID, self.producer_id);
        let city = validator.text(&CITY, self.city);
        let state = validator.text(&STATE, self.state);
        let total_area = validator.value(&TOTAL_AREA, self.total_area);
        let cultivable_area = validator.value(&CULTIVABLE_AREA, self.cultivable_area);
        let preserved_area = validator.value(&PRESERVED_AREA, self.preserved_area);

        validator.finish(|| {
            Some(NewFarm {
                producer_id: producer_id?,
                farm_name: farm_name?,
                city: city?,
                state: state?.parse().ok()?,
                total_area: total_area?,
                cultivable_area: cultivable_area?,
                preserved_area: preserved_area?,
            })
        })
    }
}

#[tracing::instrument(skip(producers, farms, command), fields(producer_id = ?command.producer_id))]
pub async fn handle(
    producers: &dyn ProducerStore,
    farms: &dyn FarmStore,
    command: CreateFarmCommand,
) -> Result<Farm, CreateFarmError> {
    let farm = command.validate()?;

    let owner = producers
        .find_by_id(farm.producer_id)
        .await
        .map_err(store_failure("Could not check whether the producer exists, please try again."))?;

    if owner.is_none() {
        return Err(CreateFarmError::ProducerNotFound);
    }

    if !farm_area_is_consistent(farm.total_area, farm.cultivable_area, farm.preserved_area) {
        return Err(CreateFarmError::AreaExceedsTotal);
    }

    let created = farms.create(farm).await.map_err(|e| match e {
        StoreError::MissingReference => CreateFarmError::ProducerNotFound,
        other => store_failure("Could not create this farm, please try again.")(other).into(),
    })?;

    tracing::info!(farm_id = created.id, state = %created.state, "Farm created");

    Ok(created)
}
