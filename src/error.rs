//! Error types for the relevant-memory selector

use thiserror::Error;

/// Result type alias for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;

#[derive(Error, Debug)]
pub enum SelectorError {

    // =============================
    // Collaborator Failures
    // =============================

    #[error("Language model error: {0}")]
    BackendFailure(String),

    #[error("Memory store error: {0}")]
    StoreFailure(String),

    // =============================
    // Usage Errors
    // =============================

    #[error("History recording requires a clock but none was configured")]
    MissingTimeProvider,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}
