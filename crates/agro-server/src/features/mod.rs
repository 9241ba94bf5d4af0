//! Feature modules implementing the agro API
//!
//! Each feature is a vertical slice:
//! - `commands/` - Write operations, one `handle` function each
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions and error mapping
//! - `types.rs` - Request field rules
//!
//! Handlers receive their store collaborators explicitly, so every command and
//! query runs unchanged against any [`Stores`] backend.

pub mod farms;
pub mod producers;
pub mod shared;

use axum::Router;

use crate::store::Stores;

/// Creates the API router with all feature routes mounted
///
/// - `/producers` - Producer registration
/// - `/farms` - Farms, cultivations and statistics
pub fn router(stores: Stores) -> Router<()> {
    Router::new()
        .nest("/producers", producers::producers_routes().with_state(stores.clone()))
        .nest("/farms", farms::farms_routes().with_state(stores))
}
