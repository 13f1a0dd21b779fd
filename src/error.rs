//! Errors raised while compiling schema modules into strategies.
//!
//! Every variant is detected during the single compilation pass; a failed
//! compilation never returns a partial strategy map.

/// Type alias for compilation results
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unsupported schema: {type_name}: {reason}")]
    UnsupportedSchema { type_name: String, reason: String },

    #[error("field {field} refers to {target}, which is not a top-level type of the compiled modules")]
    UnresolvedReference { field: String, target: String },

    #[error("invalid override {key:?}: {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("override {key:?} does not name a field or enum of the compiled modules")]
    UnknownOverride { key: String },

    #[error("type {type_name} is defined more than once")]
    DuplicateType { type_name: String },

    #[error("invalid compiler configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("could not parse schema module: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn unsupported(type_name: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::UnsupportedSchema {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_override(key: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidOverride {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
