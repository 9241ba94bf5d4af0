//! Store collaborators
//!
//! Orchestration code talks to persistence only through these traits. Two
//! backends implement them:
//!
//! - [`postgres::PgStore`]: PostgreSQL through sqlx, schema in `migrations/`
//! - [`memory::MemoryStore`]: process-local maps, used by tests and local runs
//!
//! Both backends close the read-then-write races of the orchestration layer
//! themselves: duplicate documents, deleting a producer that still owns farms,
//! and over-allocating a farm's cultivable area are rejected at write time.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    AreaSums, Cultivation, Farm, GroupCount, NewCultivation, NewFarm, NewProducer, Producer,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by a store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Another producer already uses this document")]
    DuplicateDocument,

    #[error("Referenced record does not exist")]
    MissingReference,

    #[error("Record still has dependent records")]
    HasDependents,

    #[error("Farm has no cultivable area left for this cultivation")]
    CapacityExceeded,

    #[error("Area sum exceeds the supported range")]
    AreaOverflow,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProducerStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateDocument`] if the document is taken.
    async fn create(&self, producer: NewProducer) -> StoreResult<Producer>;

    /// Returns `None` if the producer does not exist.
    async fn update(&self, id: i64, producer: NewProducer) -> StoreResult<Option<Producer>>;

    /// Returns the removed producer, or `None` if it did not exist. Fails with
    /// [`StoreError::HasDependents`] while the producer owns farms.
    async fn delete(&self, id: i64) -> StoreResult<Option<Producer>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Producer>>;

    /// Producer owning `document`, ignoring `excluding_id` when given.
    async fn find_by_document(
        &self,
        document: &str,
        excluding_id: Option<i64>,
    ) -> StoreResult<Option<Producer>>;
}

#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Fails with [`StoreError::MissingReference`] if the producer is gone.
    async fn create(&self, farm: NewFarm) -> StoreResult<Farm>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Farm>>;
    async fn count(&self) -> StoreResult<i64>;
    async fn count_by_producer(&self, producer_id: i64) -> StoreResult<i64>;
    /// Zero when there are no farms
    async fn sum_total_area(&self) -> StoreResult<Decimal>;
    async fn sum_cultivable_and_preserved_area(&self) -> StoreResult<AreaSums>;
    /// Ordered by count descending, then state ascending
    async fn count_grouped_by_state(&self) -> StoreResult<Vec<GroupCount>>;
}

#[async_trait]
pub trait CultivationStore: Send + Sync {
    /// Re-checks the farm's remaining cultivable area while holding the farm,
    /// failing with [`StoreError::CapacityExceeded`] if it no longer fits and
    /// with [`StoreError::MissingReference`] if the farm is gone.
    async fn create(&self, cultivation: NewCultivation) -> StoreResult<Cultivation>;

    /// Zero when the farm has no cultivations
    async fn sum_cultivated_area_by_farm(&self, farm_id: i64) -> StoreResult<Decimal>;

    /// Ordered by count descending, then name ascending
    async fn count_grouped_by_name(&self) -> StoreResult<Vec<GroupCount>>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name reported by the health endpoint
    fn backend(&self) -> &'static str;
}

/// Store handles shared by every request
#[derive(Clone)]
pub struct Stores {
    pub producers: Arc<dyn ProducerStore>,
    pub farms: Arc<dyn FarmStore>,
    pub cultivations: Arc<dyn CultivationStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Use one backend for every collaborator
    pub fn from_backend<S>(store: Arc<S>) -> Self
    where
        S: ProducerStore + FarmStore + CultivationStore + StoreHealth + 'static,
    {
        Self {
            producers: store.clone(),
            farms: store.clone(),
            cultivations: store.clone(),
            health: store,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.health.backend())
            .finish()
    }
}
