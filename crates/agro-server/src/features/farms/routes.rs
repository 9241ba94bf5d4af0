//! Farm API routes
//!
//! - `POST /v1/farms` - Register a farm
//! - `POST /v1/farms/cultivation` - Plant a crop on a farm
//! - `GET /v1/farms/statistics` - Aggregates over every farm

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::commands::{
    CreateCultivationCommand, CreateCultivationError, CreateFarmCommand, CreateFarmError,
};
use super::queries::FarmStatisticsError;
use crate::api::response::{internal_error, rejected, validation_failed};
use crate::features::shared::ValidationErrors;
use crate::store::Stores;

pub fn farms_routes() -> Router<Stores> {
    Router::new()
        .route("/", post(create_farm))
        .route("/cultivation", post(create_cultivation))
        .route("/statistics", get(farm_statistics))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /v1/farms`
///
/// - `201 Created` - Farm registered
/// - `400 Bad Request` - Validation error, unknown producer or areas over total
/// - `500 Internal Server Error` - Store failure
#[tracing::instrument(skip(stores, body))]
async fn create_farm(
    State(stores): State<Stores>,
    body: Result<Json<CreateFarmCommand>, JsonRejection>,
) -> Result<Response, FarmApiError> {
    let Json(command) = body.map_err(ValidationErrors::from)?;

    let farm = super::commands::create::handle(
        stores.producers.as_ref(),
        stores.farms.as_ref(),
        command,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(farm)).into_response())
}

/// `POST /v1/farms/cultivation`
///
/// - `201 Created` - Cultivation registered, name upper-cased
/// - `400 Bad Request` - Validation error, unknown farm or not enough cultivable area
/// - `500 Internal Server Error` - Store failure
#[tracing::instrument(skip(stores, body))]
async fn create_cultivation(
    State(stores): State<Stores>,
    body: Result<Json<CreateCultivationCommand>, JsonRejection>,
) -> Result<Response, FarmApiError> {
    let Json(command) = body.map_err(ValidationErrors::from)?;

    let cultivation = super::commands::create_cultivation::handle(
        stores.farms.as_ref(),
        stores.cultivations.as_ref(),
        command,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(cultivation)).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(stores))]
async fn farm_statistics(State(stores): State<Stores>) -> Result<Response, FarmApiError> {
    let report =
        super::queries::statistics::handle(stores.farms.as_ref(), stores.cultivations.as_ref())
            .await?;

    Ok((StatusCode::OK, Json(report)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum FarmApiError {
    Request(ValidationErrors),
    CreateFarm(CreateFarmError),
    CreateCultivation(CreateCultivationError),
    Statistics(FarmStatisticsError),
}

impl From<ValidationErrors> for FarmApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::Request(err)
    }
}

impl From<CreateFarmError> for FarmApiError {
    fn from(err: CreateFarmError) -> Self {
        Self::CreateFarm(err)
    }
}

impl From<CreateCultivationError> for FarmApiError {
    fn from(err: CreateCultivationError) -> Self {
        Self::CreateCultivation(err)
    }
}

impl From<FarmStatisticsError> for FarmApiError {
    fn from(err: FarmStatisticsError) -> Self {
        Self::Statistics(err)
    }
}

impl IntoResponse for FarmApiError {
    fn into_response(self) -> Response {
        match self {
            FarmApiError::Request(errors)
            | FarmApiError::CreateFarm(CreateFarmError::Validation(errors))
            | FarmApiError::CreateCultivation(CreateCultivationError::Validation(errors)) => {
                validation_failed(&errors)
            },

            FarmApiError::CreateFarm(CreateFarmError::Store(failure))
            | FarmApiError::CreateCultivation(CreateCultivationError::Store(failure))
            | FarmApiError::Statistics(FarmStatisticsError::Store(failure)) => {
                internal_error(failure.message)
            },

            FarmApiError::CreateFarm(err) => rejected(err.to_string()),
            FarmApiError::CreateCultivation(err) => rejected(err.to_string()),
        }
    }
}
