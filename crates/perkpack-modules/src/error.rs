//! Error types for perkpack-modules

use thiserror::Error;

/// Module construction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModuleError {
    #[error("Module type is missing or empty for module: {0}")]
    MissingType(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ModuleError>;
