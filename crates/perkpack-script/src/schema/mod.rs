//! Schema mapper: definition trees to typed records
//!
//! Definition files are parsed into a [`Value`] tree first and classified by
//! shape; the records are then mapped field by field, leniently.

pub mod collection;
pub mod perk;

pub use collection::PerkCollectionDefinition;
pub use perk::{module_definitions, PerkDefinition};

use crate::error::{Error, Result};
use perkpack_core::Value;
use std::path::Path;

/// Text format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Ron,
}

impl DefinitionFormat {
    /// Pick by extension; anything that is not `.ron` is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => DefinitionFormat::Ron,
            _ => DefinitionFormat::Json,
        }
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        match self {
            DefinitionFormat::Json => Ok(serde_json::from_str(content)?),
            DefinitionFormat::Ron => Ok(ron::from_str(content)?),
        }
    }
}

/// What a definition tree turned out to be
#[derive(Debug)]
pub enum DefinitionShape {
    Single(PerkDefinition),
    Collection(PerkCollectionDefinition),
}

/// Classify and map a definition tree
///
/// A `perks` list makes a collection; `id` and `title` scalars make a single
/// perk. Anything else is an unrecognized format.
pub fn classify(tree: &Value) -> Result<DefinitionShape> {
    let Some(map) = tree.as_map() else {
        return Err(Error::UnrecognizedFormat(format!(
            "top level is a {}",
            tree.type_name()
        )));
    };
    if map.get("perks").and_then(Value::as_list).is_some() {
        return PerkCollectionDefinition::from_map(map).map(DefinitionShape::Collection);
    }
    let is_scalar = |key: &str| map.get(key).and_then(Value::coerce_string).is_some();
    if is_scalar("id") && is_scalar("title") {
        return PerkDefinition::from_map(map).map(DefinitionShape::Single);
    }
    Err(Error::UnrecognizedFormat(
        "expected a `perks` list or `id` and `title` fields".to_string(),
    ))
}
