//! Farm statistics query
//!
//! Aggregates over every farm and cultivation. The five reads run
//! concurrently and the first failure fails the whole report.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::features::shared::{store_failure, StoreFailure};
use crate::models::GroupCount;
use crate::store::{CultivationStore, FarmStore};

/// Response of `GET /v1/farms/statistics`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmStatistics {
    pub total_farms_count: i64,
    pub total_farms_count_by_state: Vec<GroupCount>,
    pub total_farms_count_cultivations: Vec<GroupCount>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_farms_sum_total_areas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_farms_sum_cultivable_areas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_farms_sum_preservation_areas: Decimal,
}

#[derive(Debug, thiserror::Error)]
pub enum FarmStatisticsError {
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

#[tracing::instrument(skip(farms, cultivations))]
pub async fn handle(
    farms: &dyn FarmStore,
    cultivations: &dyn CultivationStore,
) -> Result<FarmStatistics, FarmStatisticsError> {
    let (count, by_state, by_cultivation, total_area, area_sums) = tokio::try_join!(
        async {
            farms
                .count()
                .await
                .map_err(store_failure("Could not count the registered farms."))
        },
        async {
            farms
                .count_grouped_by_state()
                .await
                .map_err(store_failure("Could not count the registered farms by state."))
        },
        async {
            cultivations
                .count_grouped_by_name()
                .await
                .map_err(store_failure("Could not count the cultivations by crop."))
        },
        async {
            farms
                .sum_total_area()
                .await
                .map_err(store_failure("Could not sum the total area of the registered farms."))
        },
        async {
            farms.sum_cultivable_and_preserved_area().await.map_err(store_failure(
                "Could not sum the cultivable and preserved areas of the registered farms.",
            ))
        },
    )?;

    tracing::debug!(farms = count, "Farm statistics computed");

    Ok(FarmStatistics {
        total_farms_count: count,
        total_farms_count_by_state: by_state,
        total_farms_count_cultivations: by_cultivation,
        total_farms_sum_total_areas: total_area,
        total_farms_sum_cultivable_areas: area_sums.cultivable,
        total_farms_sum_preservation_areas: area_sums.preserved,
    })
}
