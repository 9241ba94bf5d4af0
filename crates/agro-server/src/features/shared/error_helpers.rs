//! Store error handling utilities
//!
//! A failed store call becomes a [`StoreFailure`]: the user-facing message
//! that names the operation, plus the underlying [`StoreError`] as source.
//!
//! # Examples
//!
//! ```rust,ignore
//! use agro_server::features::shared::error_helpers::store_failure;
//!
//! let farm = farms
//!     .find_by_id(farm_id)
//!     .await
//!     .map_err(store_failure("Could not look up the farm, please try again."))?;
//! ```

use crate::store::StoreError;

/// A store call failed for reasons unrelated to the request
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreFailure {
    /// Safe to return to clients
    pub message: &'static str,
    #[source]
    pub source: StoreError,
}

/// Wrap a store error, logging it once at the wrap site
pub fn store_failure(message: &'static str) -> impl FnOnce(StoreError) -> StoreFailure {
    move |source| {
        tracing::error!(error = %source, "{}", message);
        StoreFailure { message, source }
    }
}
