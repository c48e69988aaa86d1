//! Error types for ddbtbl

use thiserror::Error;

/// Result type alias for ddbtbl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum Error {
    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Attribute missing from an item
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// No item exists for the requested key
    #[error("Item not found")]
    NotFound,

    /// The store rejected the request as malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Table has not been provisioned in the store
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Backend-specific failure
    #[error("Store error: {0}")]
    Store(String),
}
