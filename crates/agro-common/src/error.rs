//! Error types for agro

use thiserror::Error;

/// Result type alias for agro operations
pub type Result<T> = std::result::Result<T, AgroError>;

/// Main error type for the shared domain crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgroError {
    #[error("Invalid state code: {0}")]
    InvalidStateCode(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
