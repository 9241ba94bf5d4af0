//! Agro Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Domain rules and shared utilities for the agro workspace.
//!
//! # Overview
//!
//! - **Documents**: CPF/CNPJ check-digit validation
//! - **Areas**: Farm and cultivation area invariants over exact decimals
//! - **Types**: Shared domain types such as federative-unit codes
//! - **Logging**: Centralized `tracing` subscriber setup
//! - **Error Handling**: Common error and result types
//!
//! # Example
//!
//! ```
//! use agro_common::area::farm_area_is_consistent;
//! use agro_common::document::is_valid_document;
//! use rust_decimal::Decimal;
//!
//! assert!(is_valid_document("46751972059"));
//! assert!(farm_area_is_consistent(
//!     Decimal::from(100),
//!     Decimal::from(80),
//!     Decimal::from(20),
//! ));
//! ```

pub mod area;
pub mod document;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{AgroError, Result};
pub use types::StateCode;
