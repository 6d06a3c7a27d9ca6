use sea_orm::{DbErr, SqlErr};
use std::fmt::Display;

use crate::media::ImageError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Missing row of the given kind.
    pub fn not_found(what: &str, id: impl Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", what, id))
    }

    /// Maps an insert/update failure, turning unique violations into `Conflict`.
    pub fn from_write(err: DbErr, what: impl Display) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("{} already exists ({})", what, detail))
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}
