//! Inventory parsing errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("KDL parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("duplicate group [{name}] on line {line}")]
    DuplicateGroup { name: String, line: usize },

    #[error("missing group '{name}' referenced by [{referenced_by}] on line {line}")]
    MissingGroup {
        name: String,
        referenced_by: String,
        line: usize,
    },

    #[error("invalid value for {field} on host '{hostname}' in group '{group}' (line {line}): {message}")]
    InvalidValue {
        group: String,
        hostname: String,
        line: usize,
        field: String,
        message: String,
    },

    #[error("invalid policy setting {setting}: {message}")]
    InvalidPolicy { setting: String, message: String },

    #[error(transparent)]
    Inventory(#[from] ansinv_core::Error),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
