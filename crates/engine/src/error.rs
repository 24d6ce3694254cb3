//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`MissingField`] thrown when a candidate expense lacks a required field.
//! - [`InvalidAmount`] thrown when an amount fails validation.
//! - [`InvalidId`] thrown when a stored identifier cannot be parsed back.
//!
//!  [`MissingField`]: EngineError::MissingField
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidId`]: EngineError::InvalidId
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid stored id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
