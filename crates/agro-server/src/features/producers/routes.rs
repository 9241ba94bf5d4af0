//! Producer API routes
//!
//! - `POST /v1/producers` - Register a producer
//! - `PATCH /v1/producers/:producer_id` - Replace name and document
//! - `DELETE /v1/producers/:producer_id` - Remove a producer without farms

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{patch, post},
    Json, Router,
};

use super::commands::{
    CreateProducerCommand, CreateProducerError, DeleteProducerCommand, DeleteProducerError,
    UpdateProducerCommand, UpdateProducerError,
};
use crate::api::response::{internal_error, rejected, validation_failed};
use crate::features::shared::ValidationErrors;
use crate::store::Stores;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn producers_routes() -> Router<Stores> {
    Router::new()
        .route("/", post(create_producer))
        .route("/:producer_id", patch(update_producer).delete(delete_producer))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /v1/producers`
///
/// - `201 Created` - Producer registered
/// - `400 Bad Request` - Validation error or document already registered
/// - `500 Internal Server Error` - Store failure
#[tracing::instrument(skip(stores, body))]
async fn create_producer(
    State(stores): State<Stores>,
    body: Result<Json<CreateProducerCommand>, JsonRejection>,
) -> Result<Response, ProducerApiError> {
    let Json(command) = body.map_err(ValidationErrors::from)?;

    let producer = super::commands::create::handle(stores.producers.as_ref(), command).await?;

    Ok((StatusCode::CREATED, Json(producer)).into_response())
}

/// `PATCH /v1/producers/:producer_id`
///
/// - `200 OK` - Updated producer
/// - `400 Bad Request` - Validation error, unknown producer or document in use
/// - `500 Internal Server Error` - Store failure
#[tracing::instrument(skip(stores, path, body))]
async fn update_producer(
    State(stores): State<Stores>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateProducerCommand>, JsonRejection>,
) -> Result<Response, ProducerApiError> {
    let Path(producer_id) = path.map_err(ValidationErrors::from)?;
    let Json(mut command) = body.map_err(ValidationErrors::from)?;
    command.producer_id = producer_id;

    let producer = super::commands::update::handle(stores.producers.as_ref(), command).await?;

    Ok((StatusCode::OK, Json(producer)).into_response())
}

/// `DELETE /v1/producers/:producer_id`
///
/// - `200 OK` - The removed producer
/// - `400 Bad Request` - Invalid identifier, unknown producer or producer owns farms
/// - `500 Internal Server Error` - Store failure
#[tracing::instrument(skip(stores, path))]
async fn delete_producer(
    State(stores): State<Stores>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ProducerApiError> {
    let Path(producer_id) = path.map_err(ValidationErrors::from)?;
    let command = DeleteProducerCommand { producer_id };

    let producer = super::commands::delete::handle(
        stores.producers.as_ref(),
        stores.farms.as_ref(),
        command,
    )
    .await?;

    Ok((StatusCode::OK, Json(producer)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for producer API endpoints
#[derive(Debug)]
enum ProducerApiError {
    Request(ValidationErrors),
    Create(CreateProducerError),
    Update(UpdateProducerError),
    Delete(DeleteProducerError),
}

impl From<ValidationErrors> for ProducerApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::Request(err)
    }
}

impl From<CreateProducerError> for ProducerApiError {
    fn from(err: CreateProducerError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateProducerError> for ProducerApiError {
    fn from(err: UpdateProducerError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteProducerError> for ProducerApiError {
    fn from(err: DeleteProducerError) -> Self {
        Self::Delete(err)
    }
}

impl IntoResponse for ProducerApiError {
    fn into_response(self) -> Response {
        match self {
            ProducerApiError::Request(errors)
            | ProducerApiError::Create(CreateProducerError::Validation(errors))
            | ProducerApiError::Update(UpdateProducerError::Validation(errors))
            | ProducerApiError::Delete(DeleteProducerError::Validation(errors)) => {
                validation_failed(&errors)
            },

            ProducerApiError::Create(CreateProducerError::Store(failure))
            | ProducerApiError::Update(UpdateProducerError::Store(failure))
            | ProducerApiError::Delete(DeleteProducerError::Store(failure)) => {
                internal_error(failure.message)
            },

            ProducerApiError::Create(err) => rejected(err.to_string()),
            ProducerApiError::Update(err) => rejected(err.to_string()),
            ProducerApiError::Delete(err) => rejected(err.to_string()),
        }
    }
}
