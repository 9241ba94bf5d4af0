//! PostgreSQL store

use agro_common::area::cultivation_fits;
use agro_common::StateCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{
    CultivationStore, FarmStore, ProducerStore, StoreError, StoreHealth, StoreResult,
};
use crate::models::{
    AreaSums, Cultivation, Farm, GroupCount, NewCultivation, NewFarm, NewProducer, Producer,
};

const PRODUCER_COLUMNS: &str = "id, full_name, document, created_at, updated_at";

const FARM_COLUMNS: &str = "id, producer_id, farm_name, city, state, total_area, \
                            cultivable_area, preserved_area, created_at, updated_at";

const CULTIVATION_COLUMNS: &str =
    "id, farm_id, cultivation_name, cultivated_area, harvest, created_at, updated_at";

/// Store backed by a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FarmRow {
    id: i64,
    producer_id: i64,
    farm_name: String,
    city: String,
    state: String,
    total_area: Decimal,
    cultivable_area: Decimal,
    preserved_area: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FarmRow> for Farm {
    type Error = StoreError;

    fn try_from(row: FarmRow) -> Result<Self, Self::Error> {
        let state: StateCode = row
            .state
            .parse()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Farm {
            id: row.id,
            producer_id: row.producer_id,
            farm_name: row.farm_name,
            city: row.city,
            state,
            total_area: row.total_area,
            cultivable_area: row.cultivable_area,
            preserved_area: row.preserved_area,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_unique_violation(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateDocument
        },
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl ProducerStore for PgStore {
    #[tracing::instrument(skip(self, producer))]
    async fn create(&self, producer: NewProducer) -> StoreResult<Producer> {
        let sql = format!(
            "INSERT INTO producers (full_name, document) VALUES ($1, $2) RETURNING {}",
            PRODUCER_COLUMNS
        );

        sqlx::query_as::<_, Producer>(&sql)
            .bind(&producer.full_name)
            .bind(&producer.document)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    #[tracing::instrument(skip(self, producer))]
    async fn update(&self, id: i64, producer: NewProducer) -> StoreResult<Option<Producer>> {
        let sql = format!(
            r#"
            UPDATE producers
            SET full_name = $2, document = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCER_COLUMNS
        );

        sqlx::query_as::<_, Producer>(&sql)
            .bind(id)
            .bind(&producer.full_name)
            .bind(&producer.document)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> StoreResult<Option<Producer>> {
        let sql = format!("DELETE FROM producers WHERE id = $1 RETURNING {}", PRODUCER_COLUMNS);

        sqlx::query_as::<_, Producer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::HasDependents
                },
                _ => StoreError::Database(e),
            })
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Producer>> {
        let sql = format!("SELECT {} FROM producers WHERE id = $1", PRODUCER_COLUMNS);

        Ok(sqlx::query_as::<_, Producer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_document(
        &self,
        document: &str,
        excluding_id: Option<i64>,
    ) -> StoreResult<Option<Producer>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM producers
            WHERE document = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
            PRODUCER_COLUMNS
        );

        Ok(sqlx::query_as::<_, Producer>(&sql)
            .bind(document)
            .bind(excluding_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl FarmStore for PgStore {
    #[tracing::instrument(skip(self, farm), fields(producer_id = farm.producer_id))]
    async fn create(&self, farm: NewFarm) -> StoreResult<Farm> {
        let sql = format!(
            r#"
            INSERT INTO farms
                (producer_id, farm_name, city, state, total_area, cultivable_area, preserved_area)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FARM_COLUMNS
        );

        let row = sqlx::query_as::<_, FarmRow>(&sql)
            .bind(farm.producer_id)
            .bind(&farm.farm_name)
            .bind(&farm.city)
            .bind(farm.state.as_str())
            .bind(farm.total_area)
            .bind(farm.cultivable_area)
            .bind(farm.preserved_area)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::MissingReference
                },
                _ => StoreError::Database(e),
            })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Farm>> {
        let sql = format!("SELECT {} FROM farms WHERE id = $1", FARM_COLUMNS);

        sqlx::query_as::<_, FarmRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Farm::try_from)
            .transpose()
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farms")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn count_by_producer(&self, producer_id: i64) -> StoreResult<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farms WHERE producer_id = $1")
                .bind(producer_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn sum_total_area(&self) -> StoreResult<Decimal> {
        Ok(
            sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(total_area), 0) FROM farms")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn sum_cultivable_and_preserved_area(&self) -> StoreResult<AreaSums> {
        Ok(sqlx::query_as::<_, AreaSums>(
            r#"
            SELECT COALESCE(SUM(cultivable_area), 0) AS cultivable,
                   COALESCE(SUM(preserved_area), 0) AS preserved
            FROM farms
            "#,
        )
        .fetch_one(&self.pool)
        .await?)
    }

    async fn count_grouped_by_state(&self) -> StoreResult<Vec<GroupCount>> {
        Ok(sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT state AS key, COUNT(*) AS count
            FROM farms
            GROUP BY state
            ORDER BY count DESC, key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl CultivationStore for PgStore {
    #[tracing::instrument(skip(self, cultivation), fields(farm_id = cultivation.farm_id))]
    async fn create(&self, cultivation: NewCultivation) -> StoreResult<Cultivation> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent cultivations of the same farm.
        let cultivable: Option<Decimal> =
            sqlx::query_scalar("SELECT cultivable_area FROM farms WHERE id = $1 FOR UPDATE")
                .bind(cultivation.farm_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(cultivable) = cultivable else {
            return Err(StoreError::MissingReference);
        };

        let already_cultivated: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cultivated_area), 0) FROM farm_cultivations WHERE farm_id = $1",
        )
        .bind(cultivation.farm_id)
        .fetch_one(&mut *tx)
        .await?;

        if !cultivation_fits(cultivable, already_cultivated, cultivation.cultivated_area) {
            tracing::warn!(
                %cultivable,
                %already_cultivated,
                requested = %cultivation.cultivated_area,
                "Cultivation rejected at write time"
            );
            return Err(StoreError::CapacityExceeded);
        }

        let sql = format!(
            r#"
            INSERT INTO farm_cultivations (farm_id, cultivation_name, cultivated_area, harvest)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CULTIVATION_COLUMNS
        );

        let created = sqlx::query_as::<_, Cultivation>(&sql)
            .bind(cultivation.farm_id)
            .bind(&cultivation.cultivation_name)
            .bind(cultivation.cultivated_area)
            .bind(&cultivation.harvest)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn sum_cultivated_area_by_farm(&self, farm_id: i64) -> StoreResult<Decimal> {
        Ok(sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(cultivated_area), 0) FROM farm_cultivations WHERE farm_id = $1",
        )
        .bind(farm_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn count_grouped_by_name(&self) -> StoreResult<Vec<GroupCount>> {
        Ok(sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT cultivation_name AS key, COUNT(*) AS count
            FROM farm_cultivations
            GROUP BY cultivation_name
            ORDER BY count DESC, key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::db::health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
