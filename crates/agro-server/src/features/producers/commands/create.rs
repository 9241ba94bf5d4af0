//! Create producer command

use serde::Deserialize;

use crate::features::producers::types::check_producer_fields;
use crate::features::shared::{store_failure, StoreFailure, ValidationErrors, Validator};
use crate::models::{NewProducer, Producer};
use crate::store::{ProducerStore, StoreError};

/// Request body of `POST /v1/producers`
///
/// # Examples
///
/// ```json
/// { "fullName": "Gustavo Egidio Rigoni", "document": "46751972059" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProducerCommand {
    pub full_name: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateProducerError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("A producer with this CPF/CNPJ is already registered.")]
    DuplicateDocument,
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

impl CreateProducerCommand {
    pub fn validate(self) -> Result<NewProducer, ValidationErrors> {
        let mut validator = Validator::new();
        let producer = check_producer_fields(&mut validator, self.full_name, self.document);
        validator.finish(|| producer)
    }
}

#[tracing::instrument(skip(producers, command))]
pub async fn handle(
    producers: &dyn ProducerStore,
    command: CreateProducerCommand,
) -> Result<Producer, CreateProducerError> {
    let producer = command.validate()?;

    let owner = producers
        .find_by_document(&producer.document, None)
        .await
        .map_err(store_failure("Could not check whether this document is in use, please try again."))?;

    if owner.is_some() {
        return Err(CreateProducerError::DuplicateDocument);
    }

    let created = producers.create(producer).await.map_err(|e| match e {
        StoreError::DuplicateDocument => CreateProducerError::DuplicateDocument,
        other => store_failure("Could not create this producer, please try again.")(other).into(),
    })?;

    tracing::info!(producer_id = created.id, "Producer created");

    Ok(created)
}
