//! Error types for perkpack-script

use perkpack_core::BuildError;
use thiserror::Error;

/// Content loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Unrecognized definition format: {0}")]
    UnrecognizedFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Collection {0:?} contains no perks")]
    EmptyCollection(String),

    #[error("Perk build failed: {0}")]
    Build(#[from] BuildError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
