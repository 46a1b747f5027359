//! Multi-perk collection record

use super::perk::PerkDefinition;
use crate::error::{Error, Result};
use perkpack_core::{Value, ValueMap};
use perkpack_modules::Params;

/// Several perks shipped in one package
///
/// Each entry is mapped on its own, so one bad entry leaves its siblings
/// intact.
#[derive(Debug)]
pub struct PerkCollectionDefinition {
    pub name: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub perks: Vec<Result<PerkDefinition>>,
}

impl PerkCollectionDefinition {
    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let p = Params::new(Some(map));
        let name = p.non_blank("collectionName");
        let entries = p.get("perks").and_then(Value::as_list).unwrap_or_default();
        if entries.is_empty() {
            return Err(Error::EmptyCollection(
                name.unwrap_or_else(|| "<unnamed>".to_string()),
            ));
        }
        Ok(Self {
            name,
            author: p.non_blank("author"),
            version: p.non_blank("version"),
            perks: entries.iter().map(PerkDefinition::from_value).collect(),
        })
    }

    /// Display label for logs
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(json: &str) -> ValueMap {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_entries_mapped_independently() {
        let collection = PerkCollectionDefinition::from_map(&map(
            r#"{
                "collectionName": "Climbing Pack",
                "author": "Ana",
                "version": 2,
                "perks": [
                    {"id": "grip", "title": "Grip"},
                    {"title": "No Id"}
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(collection.label(), "Climbing Pack");
        assert_eq!(collection.version.as_deref(), Some("2"));
        assert_eq!(collection.perks.len(), 2);
        assert!(collection.perks[0].is_ok());
        assert!(matches!(collection.perks[1], Err(Error::MissingField("id"))));
    }

    #[test]
    fn test_empty_collection() {
        let result = PerkCollectionDefinition::from_map(&map(r#"{"collectionName": "Void", "perks": []}"#));
        assert!(matches!(result, Err(Error::EmptyCollection(name)) if name == "Void"));
    }
}
