use aquamap_schemas::{marker::MarkerId, parameter::Parameter};
use thiserror::Error;

/// Why a candidate marker was rejected. Checks run in the order the variants
/// are declared and stop at the first failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Latitude must be a number in [-90, 90] and longitude a number in [-180, 180]")]
    InvalidCoordinates,

    #[error("Please enter a valid value for '{0}'")]
    InvalidParameter(Parameter),

    #[error("Optional parameter '{0}' is enabled but has no valid value")]
    MissingOptionalParameter(Parameter),

    #[error("Points must be at least 20 meters apart: {distance_m:.1} m from marker '{nearest}'")]
    TooClose { distance_m: f64, nearest: MarkerId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Marker '{0}' not found in store")]
    NotFound(MarkerId),
}

#[derive(Debug, Error)]
pub enum AquamapError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("Failed to encode JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Invalid sampling config: {0}")]
    InvalidConfig(String),
}

impl From<ValidationError> for AquamapError {
    fn from(err: ValidationError) -> Self {
        AquamapError::Store(StoreError::Validation(err))
    }
}
