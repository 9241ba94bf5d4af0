//! Update producer command
//!
//! Replaces the full name and document of an existing producer. The producer
//! may keep its own document; any other producer's document is rejected.

use serde::Deserialize;

use crate::features::producers::types::{check_producer_fields, check_producer_id};
use crate::features::shared::{store_failure, StoreFailure, ValidationErrors, Validator};
use crate::models::{NewProducer, Producer};
use crate::store::{ProducerStore, StoreError};

/// Request body of `PATCH /v1/producers/:producer_id`. The identifier comes
/// from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProducerCommand {
    #[serde(skip)]
    pub producer_id: String,
    pub full_name: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProducerError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("The producer provided does not exist.")]
    NotFound,
    #[error("A producer with this CPF/CNPJ is already registered.")]
    DuplicateDocument,
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

impl UpdateProducerCommand {
    /// Path violations are reported before body violations.
    pub fn validate(self) -> Result<(i64, NewProducer), ValidationErrors> {
        let mut validator = Validator::new();
        let id = check_producer_id(&mut validator, self.producer_id);
        let producer = check_producer_fields(&mut validator, self.full_name, self.document);
        validator.finish(|| Some((id?, producer?)))
    }
}

#[tracing::instrument(skip(producers, command), fields(producer_id = %command.producer_id))]
pub async fn handle(
    producers: &dyn ProducerStore,
    command: UpdateProducerCommand,
) -> Result<Producer, UpdateProducerError> {
    let (id, producer) = command.validate()?;

    let (existing, document_owner) = tokio::try_join!(
        async {
            producers
                .find_by_id(id)
                .await
                .map_err(store_failure("Could not check whether this producer exists, please try again."))
        },
        async {
            producers
                .find_by_document(&producer.document, Some(id))
                .await
                .map_err(store_failure("Could not check whether this document is in use, please try again."))
        },
    )?;

    if existing.is_none() {
        return Err(UpdateProducerError::NotFound);
    }

    if document_owner.is_some() {
        return Err(UpdateProducerError::DuplicateDocument);
    }

    let updated = producers
        .update(id, producer)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateDocument => UpdateProducerError::DuplicateDocument,
            other => store_failure("Could not update this producer, please try again.")(other).into(),
        })?
        .ok_or(UpdateProducerError::NotFound)?;

    tracing::info!(producer_id = updated.id, "Producer updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestProducer;
    use crate::store::Stores;

    fn command(producer_id: &str, full_name: &str, document: &str) -> UpdateProducerCommand {
        UpdateProducerCommand {
            producer_id: producer_id.to_string(),
            full_name: Some(full_name.to_string()),
            document: Some(document.to_string()),
        }
    }

    #[tokio::test]
    async fn test_keeps_own_document() {
        let stores = Stores::in_memory();
        let producer = TestProducer::new("46751972059").insert(&stores).await;

        let updated = handle(
            stores.producers.as_ref(),
            command(&producer.id.to_string(), "Maria Aparecida Souza", "46751972059"),
        )
        .await
        .unwrap();

        assert_eq!(updated.id, producer.id);
        assert_eq!(updated.full_name, "Maria Aparecida Souza");
    }

    #[tokio::test]
    async fn test_document_of_another_producer_is_rejected() {
        let stores = Stores::in_memory();
        let producer = TestProducer::new("46751972059").insert(&stores).await;
        TestProducer::new("93419415044").insert(&stores).await;

        let result = handle(
            stores.producers.as_ref(),
            command(&producer.id.to_string(), "Maria Souza", "93419415044"),
        )
        .await;
        assert!(matches!(result, Err(UpdateProducerError::DuplicateDocument)));
    }

    #[tokio::test]
    async fn test_missing_producer() {
        let stores = Stores::in_memory();
        let result = handle(
            stores.producers.as_ref(),
            command("404", "Maria Souza", "46751972059"),
        )
        .await;
        assert!(matches!(result, Err(UpdateProducerError::NotFound)));
    }

    #[tokio::test]
    async fn test_path_and_body_violations_are_merged() {
        let stores = Stores::in_memory();
        let result = handle(
            stores.producers.as_ref(),
            command("abc", "Maria", "46751972059"),
        )
        .await;

        let Err(UpdateProducerError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["producerId", "fullName"]);
    }
}
