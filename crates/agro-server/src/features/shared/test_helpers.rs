//! Test helpers and fixtures for feature tests
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::features::shared::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let stores = Stores::in_memory();
//!     let producer = TestProducer::new("46751972059").insert(&stores).await;
//!     let farm = TestFarm::new(producer.id).with_areas("100", "80", "20").insert(&stores).await;
//! }
//! ```

use agro_common::StateCode;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::{
    AreaSums, Cultivation, Farm, GroupCount, NewCultivation, NewFarm, NewProducer, Producer,
};
use crate::store::{
    CultivationStore, FarmStore, ProducerStore, StoreError, StoreHealth, StoreResult, Stores,
};

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("test decimal literal")
}

/// Builder for persisted test producers
#[derive(Debug, Clone)]
pub struct TestProducer {
    pub full_name: String,
    pub document: String,
}

impl TestProducer {
    pub fn new(document: &str) -> Self {
        Self {
            full_name: "Gustavo Egidio Rigoni".to_string(),
            document: document.to_string(),
        }
    }

    pub async fn insert(self, stores: &Stores) -> Producer {
        stores
            .producers
            .create(NewProducer {
                full_name: self.full_name,
                document: self.document,
            })
            .await
            .expect("insert test producer")
    }
}

/// Builder for persisted test farms
#[derive(Debug, Clone)]
pub struct TestFarm {
    pub producer_id: i64,
    pub state: StateCode,
    pub total_area: Decimal,
    pub cultivable_area: Decimal,
    pub preserved_area: Decimal,
}

impl TestFarm {
    pub fn new(producer_id: i64) -> Self {
        Self {
            producer_id,
            state: StateCode::Sc,
            total_area: dec("100"),
            cultivable_area: dec("80"),
            preserved_area: dec("20"),
        }
    }

    pub fn with_state(mut self, state: StateCode) -> Self {
        self.state = state;
        self
    }

    pub fn with_areas(mut self, total: &str, cultivable: &str, preserved: &str) -> Self {
        self.total_area = dec(total);
        self.cultivable_area = dec(cultivable);
        self.preserved_area = dec(preserved);
        self
    }

    pub async fn insert(self, stores: &Stores) -> Farm {
        stores
            .farms
            .create(NewFarm {
                producer_id: self.producer_id,
                farm_name: "Fazenda Boa Vista".to_string(),
                city: "Tubarão".to_string(),
                state: self.state,
                total_area: self.total_area,
                cultivable_area: self.cultivable_area,
                preserved_area: self.preserved_area,
            })
            .await
            .expect("insert test farm")
    }
}

pub async fn insert_cultivation(stores: &Stores, farm_id: i64, name: &str, area: &str) -> Cultivation {
    stores
        .cultivations
        .create(NewCultivation {
            farm_id,
            cultivation_name: name.to_string(),
            cultivated_area: dec(area),
            harvest: "2024".to_string(),
        })
        .await
        .expect("insert test cultivation")
}

/// Store whose every call fails as if the database were unreachable
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn stores() -> Stores {
        Stores::from_backend(Arc::new(Self))
    }
}

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ProducerStore for FailingStore {
    async fn create(&self, _producer: NewProducer) -> StoreResult<Producer> {
        unavailable()
    }

    async fn update(&self, _id: i64, _producer: NewProducer) -> StoreResult<Option<Producer>> {
        unavailable()
    }

    async fn delete(&self, _id: i64) -> StoreResult<Option<Producer>> {
        unavailable()
    }

    async fn find_by_id(&self, _id: i64) -> StoreResult<Option<Producer>> {
        unavailable()
    }

    async fn find_by_document(
        &self,
        _document: &str,
        _excluding_id: Option<i64>,
    ) -> StoreResult<Option<Producer>> {
        unavailable()
    }
}

#[async_trait]
impl FarmStore for FailingStore {
    async fn create(&self, _farm: NewFarm) -> StoreResult<Farm> {
        unavailable()
    }

    async fn find_by_id(&self, _id: i64) -> StoreResult<Option<Farm>> {
        unavailable()
    }

    async fn count(&self) -> StoreResult<i64> {
        unavailable()
    }

    async fn count_by_producer(&self, _producer_id: i64) -> StoreResult<i64> {
        unavailable()
    }

    async fn sum_total_area(&self) -> StoreResult<Decimal> {
        unavailable()
    }

    async fn sum_cultivable_and_preserved_area(&self) -> StoreResult<AreaSums> {
        unavailable()
    }

    async fn count_grouped_by_state(&self) -> StoreResult<Vec<GroupCount>> {
        unavailable()
    }
}

#[async_trait]
impl CultivationStore for FailingStore {
    async fn create(&self, _cultivation: NewCultivation) -> StoreResult<Cultivation> {
        unavailable()
    }

    async fn sum_cultivated_area_by_farm(&self, _farm_id: i64) -> StoreResult<Decimal> {
        unavailable()
    }

    async fn count_grouped_by_name(&self) -> StoreResult<Vec<GroupCount>> {
        unavailable()
    }
}

#[async_trait]
impl StoreHealth for FailingStore {
    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
