//! Error types for ansinv records and inventories.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("group '{group}' references missing host {id}")]
    DanglingHost { group: String, id: String },
}

impl Error {
    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
