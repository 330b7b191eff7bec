/// Core error types for the Ahoy catalog model
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while reading catalog records or node identifiers
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A single catalog entry could not be interpreted
    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    /// A node id string does not decode to a known node
    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    /// JSON document errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a malformed record error
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }

    /// Create an invalid node id error
    pub fn invalid_node_id(id: impl Into<String>) -> Self {
        Self::InvalidNodeId(id.into())
    }
}
