use thiserror::Error;

/// Returned when a pattern name does not match any known date shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown date pattern: {0}")]
pub struct UnknownPattern(pub String);
