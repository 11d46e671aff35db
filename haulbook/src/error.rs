//! Error types for haulbook
//!
//! All errors use thiserror for structured error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Trip not found: {0}")]
    TripNotFound(i64),

    #[error("Depot not found: {0}")]
    DepotNotFound(String),

    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields_in_order() {
        let err = AppError::Validation {
            missing: vec!["origin".to_string(), "vehicle_plate".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: origin, vehicle_plate"
        );
    }
}
