//! Delete producer command

use crate::features::producers::types::check_producer_id;
use crate::features::shared::{store_failure, StoreFailure, ValidationErrors, Validator};
use crate::models::Producer;
use crate::store::{FarmStore, ProducerStore, StoreError};

#[derive(Debug, Clone)]
pub struct DeleteProducerCommand {
    pub producer_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteProducerError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("The producer provided does not exist.")]
    NotFound,
    #[error("The producer still owns farms and cannot be removed.")]
    OwnsFarms,
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

impl DeleteProducerCommand {
    pub fn validate(self) -> Result<i64, ValidationErrors> {
        let mut validator = Validator::new();
        let id = check_producer_id(&mut validator, self.producer_id);
        validator.finish(|| id)
    }
}

/// Remove a producer that owns no farms, returning the removed record
#[tracing::instrument(skip(producers, farms, command), fields(producer_id = %command.producer_id))]
pub async fn handle(
    producers: &dyn ProducerStore,
    farms: &dyn FarmStore,
    command: DeleteProducerCommand,
) -> Result<Producer, DeleteProducerError> {
    let id = command.validate()?;

    let (existing, farm_count) = tokio::try_join!(
        async {
            producers
                .find_by_id(id)
                .await
                .map_err(store_failure("Could not check whether this producer exists, please try again."))
        },
        async {
            farms
                .count_by_producer(id)
                .await
                .map_err(store_failure("Could not check the farms of this producer, please try again."))
        },
    )?;

    if existing.is_none() {
        return Err(DeleteProducerError::NotFound);
    }

    if farm_count > 0 {
        tracing::debug!(farm_count, "Producer still owns farms");
        return Err(DeleteProducerError::OwnsFarms);
    }

    let removed = producers
        .delete(id)
        .await
        .map_err(|e| match e {
            StoreError::HasDependents => DeleteProducerError::OwnsFarms,
            other => store_failure("Could not remove this producer, please try again.")(other).into(),
        })?
        .ok_or(DeleteProducerError::NotFound)?;

    tracing::info!(producer_id = removed.id, "Producer removed");

    Ok(removed)
}
