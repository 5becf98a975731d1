//! Errors for externally supplied data.
//!
//! The tick itself never fails; these cover loading levels, ability
//! catalogs, tuning config and input recordings before a session starts.

/// Failure to load or decode simulation input data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Malformed JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed binary recording.
    #[error("Binary decode error: {0}")]
    Binary(#[from] bincode::Error),

    /// Failed to read a data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two catalog entries share an identifier.
    #[error("Duplicate ability id: {0}")]
    DuplicateAbility(String),

    /// Level geometry or roster is unusable.
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Tuning values violate an ordering or range requirement.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
