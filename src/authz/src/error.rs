//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Name is not one of the catalog's permission values
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    /// Name is not one of the catalog's role values
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Catalog definition is incomplete or inconsistent
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Catalog document could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
