use divifilter_warehouse::WarehouseError;
use thiserror::Error;

/// Validation and contract errors exposed by `divifilter-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid aggregate selector '{value}', expected one of min, max")]
    InvalidSelector { value: String },

    #[error("unknown field '{name}'")]
    UnknownField { name: String },
    #[error("field '{field}' is categorical; a numeric field is required")]
    NotNumeric { field: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("range '{field}' has min {min} greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("at least one field is required")]
    NoFields,
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed something the contract rejects.
    InvalidArgument,
    /// The row store could not serve the request.
    Unavailable,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    #[error(transparent)]
    Unavailable(#[from] WarehouseError),
}

impl CoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}
