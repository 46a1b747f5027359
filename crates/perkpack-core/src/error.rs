//! Error types for perkpack-core

use thiserror::Error;

/// Perk construction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid stack max {0}: must be at least 1")]
    InvalidStackMax(i64),
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Perk build failed: {0}")]
    Build(#[from] BuildError),

    #[error("Perk not found: {0}")]
    PerkNotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
