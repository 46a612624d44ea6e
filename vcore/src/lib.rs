// VecDocs — lib.rs
// Public API, error types, client configuration, re-exports.
// Author: d65v <https://github.com/d65v>

pub mod client;
pub mod data;
pub mod embedding;
pub mod filter;
pub mod format;
pub mod iterator;
pub mod local;
pub mod rbac;
pub mod runner;
pub mod schema;

use thiserror::Error;

pub use crate::client::{QueryRequest, SearchRequest, VectorClient};
pub use crate::data::{Column, ColumnData, MutationResult, PrimaryKey, ResultSet, Row, SearchResult};
pub use crate::embedding::MetricType;
pub use crate::format::{result_set_to_json, results_to_json};
pub use crate::iterator::{QueryIterator, SearchIterator};
pub use crate::local::LocalClient;
pub use crate::schema::{CollectionSchema, DataType, FieldSchema, IndexParams, IndexType};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum VecDocsError {
    #[error("Dimension mismatch on '{field}': expected {expected}, got {got}")]
    DimensionMismatch {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Collection not loaded: {0}")]
    CollectionNotLoaded(String),

    #[error("Partition not found: {0}")]
    PartitionNotFound(String),

    #[error("Partition already exists: {0}")]
    PartitionExists(String),

    #[error("Alias error: {0}")]
    Alias(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists: {0}")]
    IndexExists(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Field error: {0}")]
    Field(String),

    #[error("Invalid filter expression at {pos}: {msg}")]
    InvalidFilter { pos: usize, msg: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Access control error: {0}")]
    AccessControl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Env file error: {0}")]
    EnvFile(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Program output exhausted at line {line}: no output left for a print call")]
    OutputExhausted { line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VecDocsError>;

// ── Config ────────────────────────────────────────────────────────────────────

/// Connection settings for a vector database client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service URI, e.g. `http://localhost:19530`
    pub address: String,
    /// API key or `user:password`
    pub token: String,
    /// Database to operate in
    pub db_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:19530".to_string(),
            token: String::new(),
            db_name: "default".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let address = std::env::var("VECDOCS_ADDRESS").unwrap_or(defaults.address);
        let token = std::env::var("VECDOCS_TOKEN").unwrap_or(defaults.token);
        let db_name = std::env::var("VECDOCS_DB_NAME").unwrap_or(defaults.db_name);

        Self {
            address,
            token,
            db_name,
        }
    }

    /// Split a `user:password` token. API keys yield `None`.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.token.split_once(':')
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.address, "http://localhost:19530");
        assert_eq!(cfg.db_name, "default");
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn test_config_credentials() {
        let cfg = ClientConfig::new("http://localhost:19530", "root:Milvus");
        assert_eq!(cfg.credentials(), Some(("root", "Milvus")));
    }

    #[test]
    fn test_error_display() {
        let err = VecDocsError::DimensionMismatch {
            field: "vector".into(),
            expected: 5,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch on 'vector': expected 5, got 3"
        );
    }
}
