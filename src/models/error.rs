use thiserror::Error;

/// Errors raised while normalizing or rendering a workout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Required field missing or malformed
    #[error("invalid workout: {0}")]
    Validation(String),
    /// Unrecognized step type, step kind or sport
    #[error("unsupported workout schema: {0}")]
    Schema(String),
    /// A target could not be turned into a Garmin value
    #[error("cannot convert workout: {0}")]
    Conversion(String),
}
