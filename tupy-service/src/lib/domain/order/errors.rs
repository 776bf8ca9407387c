use thiserror::Error;

use crate::domain::errors::RepositoryError;

/// Error for GeoPoint validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderNameError {
    #[error("Order name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for inconsistent search bounds
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderFilterError {
    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Top-level error for all order-related operations
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] OrderNameError),

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] OrderFilterError),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
