//! Shared utilities and types for feature modules
//!
//! - **validation**: request rule tables and predicates
//! - **error_helpers**: store failure wrapping
//! - **test_helpers**: test fixtures (test-only)

pub mod error_helpers;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use error_helpers::{store_failure, StoreFailure};
pub use validation::{FieldRules, Rule, ValidationErrors, Validator};
