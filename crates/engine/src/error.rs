//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when a field value is malformed or out of range.
//! - [`InvalidFormat`] thrown when filter text does not match the expected
//!   date shape.
//! - [`NotFound`] thrown when a record does not exist for the given owner.
//! - [`Database`] thrown when the storage layer fails.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidFormat`]: EngineError::InvalidFormat
//!  [`NotFound`]: EngineError::NotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid value: {0}")]
    Validation(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by user input, which are always
    /// recoverable by asking again.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidFormat(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidFormat(a), Self::InvalidFormat(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
