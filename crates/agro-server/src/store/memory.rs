//! In-memory store
//!
//! Every operation runs under one async mutex, which gives the same
//! write-time guarantees as the PostgreSQL constraints and row locks.

use agro_common::area::cultivation_fits;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use super::{
    CultivationStore, FarmStore, ProducerStore, StoreError, StoreHealth, StoreResult,
};
use crate::models::{
    sort_groups, AreaSums, Cultivation, Farm, GroupCount, NewCultivation, NewFarm, NewProducer,
    Producer,
};

#[derive(Debug, Default)]
struct Tables {
    producers: BTreeMap<i64, Producer>,
    farms: BTreeMap<i64, Farm>,
    cultivations: BTreeMap<i64, Cultivation>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn document_taken(&self, document: &str, excluding_id: Option<i64>) -> Option<&Producer> {
        self.producers
            .values()
            .find(|p| p.document == document && Some(p.id) != excluding_id)
    }

    fn cultivated_area(&self, farm_id: i64) -> StoreResult<Decimal> {
        checked_sum(
            self.cultivations
                .values()
                .filter(|c| c.farm_id == farm_id)
                .map(|c| c.cultivated_area),
        )
    }
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> StoreResult<Decimal> {
    values.try_fold(Decimal::ZERO, |sum, value| {
        sum.checked_add(value).ok_or(StoreError::AreaOverflow)
    })
}

fn group_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount::new(key, count))
        .collect();
    sort_groups(&mut groups);
    groups
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProducerStore for MemoryStore {
    async fn create(&self, producer: NewProducer) -> StoreResult<Producer> {
        let mut tables = self.tables.lock().await;
        if tables.document_taken(&producer.document, None).is_some() {
            return Err(StoreError::DuplicateDocument);
        }

        let now = Utc::now();
        let created = Producer {
            id: tables.next_id(),
            full_name: producer.full_name,
            document: producer.document,
            created_at: now,
            updated_at: now,
        };
        tables.producers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, producer: NewProducer) -> StoreResult<Option<Producer>> {
        let mut tables = self.tables.lock().await;
        if tables.document_taken(&producer.document, Some(id)).is_some() {
            return Err(StoreError::DuplicateDocument);
        }

        Ok(tables.producers.get_mut(&id).map(|existing| {
            existing.full_name = producer.full_name;
            existing.document = producer.document;
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Producer>> {
        let mut tables = self.tables.lock().await;
        if tables.farms.values().any(|f| f.producer_id == id) {
            return Err(StoreError::HasDependents);
        }
        Ok(tables.producers.remove(&id))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Producer>> {
        Ok(self.tables.lock().await.producers.get(&id).cloned())
    }

    async fn find_by_document(
        &self,
        document: &str,
        excluding_id: Option<i64>,
    ) -> StoreResult<Option<Producer>> {
        Ok(self
            .tables
            .lock()
            .await
            .document_taken(document, excluding_id)
            .cloned())
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn create(&self, farm: NewFarm) -> StoreResult<Farm> {
        let mut tables = self.tables.lock().await;
        if !tables.producers.contains_key(&farm.producer_id) {
            return Err(StoreError::MissingReference);
        }

        let now = Utc::now();
        let created = Farm {
            id: tables.next_id(),
            producer_id: farm.producer_id,
            farm_name: farm.farm_name,
            city: farm.city,
            state: farm.state,
            total_area: farm.total_area,
            cultivable_area: farm.cultivable_area,
            preserved_area: farm.preserved_area,
            created_at: now,
            updated_at: now,
        };
        tables.farms.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Farm>> {
        Ok(self.tables.lock().await.farms.get(&id).cloned())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.tables.lock().await.farms.len() as i64)
    }

    async fn count_by_producer(&self, producer_id: i64) -> StoreResult<i64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .farms
            .values()
            .filter(|f| f.producer_id == producer_id)
            .count() as i64)
    }

    async fn sum_total_area(&self) -> StoreResult<Decimal> {
        let tables = self.tables.lock().await;
        checked_sum(tables.farms.values().map(|f| f.total_area))
    }

    async fn sum_cultivable_and_preserved_area(&self) -> StoreResult<AreaSums> {
        let tables = self.tables.lock().await;
        Ok(AreaSums {
            cultivable: checked_sum(tables.farms.values().map(|f| f.cultivable_area))?,
            preserved: checked_sum(tables.farms.values().map(|f| f.preserved_area))?,
        })
    }

    async fn count_grouped_by_state(&self) -> StoreResult<Vec<GroupCount>> {
        let tables = self.tables.lock().await;
        Ok(group_counts(tables.farms.values().map(|f| f.state.as_str())))
    }
}

#[async_trait]
impl CultivationStore for MemoryStore {
    async fn create(&self, cultivation: NewCultivation) -> StoreResult<Cultivation> {
        let mut tables = self.tables.lock().await;
        let cultivable = tables
            .farms
            .get(&cultivation.farm_id)
            .map(|farm| farm.cultivable_area)
            .ok_or(StoreError::MissingReference)?;

        let already_cultivated = tables.cultivated_area(cultivation.farm_id)?;
        if !cultivation_fits(cultivable, already_cultivated, cultivation.cultivated_area) {
            return Err(StoreError::CapacityExceeded);
        }

        let now = Utc::now();
        let created = Cultivation {
            id: tables.next_id(),
            farm_id: cultivation.farm_id,
            cultivation_name: cultivation.cultivation_name,
            cultivated_area: cultivation.cultivated_area,
            harvest: cultivation.harvest,
            created_at: now,
            updated_at: now,
        };
        tables.cultivations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn sum_cultivated_area_by_farm(&self, farm_id: i64) -> StoreResult<Decimal> {
        self.tables.lock().await.cultivated_area(farm_id)
    }

    async fn count_grouped_by_name(&self) -> StoreResult<Vec<GroupCount>> {
        let tables = self.tables.lock().await;
        Ok(group_counts(
            tables.cultivations.values().map(|c| c.cultivation_name.as_str()),
        ))
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
