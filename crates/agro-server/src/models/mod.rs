//! Domain records returned by the stores and serialized in API responses
//!
//! JSON field names are camelCase; decimal areas are written as JSON numbers.

use agro_common::StateCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Rural producer, identified by a CPF or CNPJ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: i64,
    pub full_name: String,
    pub document: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Farm owned by a producer.
///
/// `cultivable_area + preserved_area <= total_area` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: i64,
    pub producer_id: i64,
    pub farm_name: String,
    pub city: String,
    pub state: StateCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_area: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cultivable_area: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub preserved_area: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Crop planted on a farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cultivation {
    pub id: i64,
    pub farm_id: i64,
    pub cultivation_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cultivated_area: Decimal,
    pub harvest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated producer fields, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProducer {
    pub full_name: String,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFarm {
    pub producer_id: i64,
    pub farm_name: String,
    pub city: String,
    pub state: StateCode,
    pub total_area: Decimal,
    pub cultivable_area: Decimal,
    pub preserved_area: Decimal,
}

/// Validated cultivation fields. The name is already upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCultivation {
    pub farm_id: i64,
    pub cultivation_name: String,
    pub cultivated_area: Decimal,
    pub harvest: String,
}

/// Number of records sharing a key, serialized as `{"<key>": <count>}`
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

impl GroupCount {
    pub fn new(key: impl Into<String>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

impl Serialize for GroupCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.count)?;
        map.end()
    }
}

/// Sort groups by count descending, then key ascending
pub fn sort_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

/// Cultivable and preserved area summed over every farm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct AreaSums {
    pub cultivable: Decimal,
    pub preserved: Decimal,
}
