//! Single-perk definition record

use crate::error::{Error, Result};
use perkpack_core::{BuffGraph, Value, ValueMap};
use perkpack_modules::{ModuleDefinition, Params};

/// A perk as authored, before building
///
/// Only `id` and `title` are required; every other field keeps its default
/// when absent or of the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PerkDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub flavor_text: Option<String>,
    pub author: Option<String>,
    /// Category tag, e.g. `Red` or `Unstable`
    pub perk_type: Option<String>,
    pub competitive: bool,
    pub cost: i64,
    pub spawn_pool: Option<String>,
    pub spawn_in_endless: bool,
    pub can_stack: bool,
    pub stack_max: i64,
    pub multiplier_curve_keys: Option<Vec<f32>>,
    pub buff: Option<BuffGraph>,
    pub base_buff: Option<BuffGraph>,
    pub buff_multiplier: f32,
    pub flags: Vec<String>,
    pub modules: Vec<ModuleDefinition>,
    pub icon: Option<String>,
    pub perk_card: Option<String>,
    pub perk_frame: Option<String>,
    pub unlock_progression_id: Option<String>,
    pub unlock_xp: i64,
}

impl PerkDefinition {
    /// A definition with the required fields and defaults elsewhere
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            flavor_text: None,
            author: None,
            perk_type: None,
            competitive: true,
            cost: 0,
            spawn_pool: None,
            spawn_in_endless: true,
            can_stack: false,
            stack_max: 1,
            multiplier_curve_keys: None,
            buff: None,
            base_buff: None,
            buff_multiplier: 1.0,
            flags: Vec::new(),
            modules: Vec::new(),
            icon: None,
            perk_card: None,
            perk_frame: None,
            unlock_progression_id: None,
            unlock_xp: 0,
        }
    }

    /// Map a definition tree node
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_map()
            .ok_or_else(|| Error::UnrecognizedFormat(format!("perk entry is a {}", value.type_name())))?;
        Self::from_map(map)
    }

    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let p = Params::new(Some(map));
        let id = p.non_blank("id").ok_or(Error::MissingField("id"))?;
        let title = p.non_blank("title").ok_or(Error::MissingField("title"))?;
        let defaults = Self::new(id, title);
        Ok(Self {
            description: p.string_or("description", ""),
            flavor_text: p.non_blank("flavorText"),
            author: p.non_blank("author"),
            perk_type: p.non_blank("perkType"),
            competitive: p.bool_or("competitive", defaults.competitive),
            cost: p.i64_or("cost", defaults.cost),
            spawn_pool: p.non_blank("spawnPool"),
            spawn_in_endless: p.bool_or("spawnInEndless", defaults.spawn_in_endless),
            can_stack: p.bool_or("canStack", defaults.can_stack),
            stack_max: p.i64_or("stackMax", defaults.stack_max),
            multiplier_curve_keys: p.f32_list("multiplierCurveKeys"),
            buff: p.buff("buff"),
            base_buff: p.buff("baseBuff"),
            buff_multiplier: p.f32_or("buffMultiplier", defaults.buff_multiplier),
            flags: p.string_list_or("flags", &[]),
            modules: p
                .get("modules")
                .and_then(Value::as_list)
                .map(module_definitions)
                .unwrap_or_default(),
            icon: p.non_blank("icon"),
            perk_card: p.non_blank("perkCard"),
            perk_frame: p.non_blank("perkFrame"),
            unlock_progression_id: p.non_blank("unlockProgressionID"),
            unlock_xp: p.i64_or("unlockXP", defaults.unlock_xp),
            ..defaults
        })
    }
}

/// Map module entries; entries that are not maps are dropped
///
/// A missing `type` is kept as an empty tag so the factory can report it.
pub fn module_definitions(entries: &[Value]) -> Vec<ModuleDefinition> {
    entries
        .iter()
        .filter_map(Value::as_map)
        .map(|entry| {
            let p = Params::new(Some(entry));
            ModuleDefinition {
                type_tag: p.string_or("type", ""),
                name: p.non_blank("name"),
                parameters: p
                    .get("parameters")
                    .and_then(Value::as_map)
                    .cloned()
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_definition_takes_defaults() {
        let def = PerkDefinition::from_value(&parse(r#"{"id": "grip", "title": "Grip"}"#)).unwrap();
        assert_eq!(def, PerkDefinition::new("grip", "Grip"));
        assert!(def.competitive);
        assert!(def.spawn_in_endless);
        assert_eq!(def.stack_max, 1);
        assert_eq!(def.buff_multiplier, 1.0);
    }

    #[test]
    fn test_full_definition() {
        let def = PerkDefinition::from_value(&parse(
            r#"{
                "id": "rage",
                "title": "Rage",
                "description": "Hits make you stronger",
                "flavorText": "Grr",
                "author": "Ana",
                "perkType": "Red",
                "competitive": false,
                "cost": 3,
                "spawnPool": "unstable",
                "spawnInEndless": "false",
                "canStack": true,
                "stackMax": 5,
                "multiplierCurveKeys": [0, 0.5, 1],
                "buff": {"id": "rage", "buffs": [{"id": "addDamage", "maxAmount": 1}]},
                "buffMultiplier": 1.5,
                "flags": ["nodrop"],
                "modules": [
                    {"type": "OnDamage", "name": "Rage", "parameters": {"buffAmount": 2}},
                    "junk",
                    {"name": "typeless"}
                ],
                "icon": "icon.png",
                "perkFrame": "advanced",
                "unlockProgressionID": "climber",
                "unlockXP": 250
            }"#,
        ))
        .unwrap();

        assert_eq!(def.perk_type.as_deref(), Some("Red"));
        assert!(!def.competitive);
        assert!(!def.spawn_in_endless);
        assert_eq!(def.cost, 3);
        assert_eq!(def.stack_max, 5);
        assert_eq!(def.multiplier_curve_keys, Some(vec![0.0, 0.5, 1.0]));
        assert_eq!(def.buff.as_ref().map(|b| b.id.as_str()), Some("rage"));
        assert_eq!(def.flags, vec!["nodrop".to_string()]);
        assert_eq!(def.modules.len(), 2);
        assert_eq!(def.modules[0].type_tag, "OnDamage");
        assert_eq!(def.modules[0].parameters.get("buffAmount"), Some(&Value::Int(2)));
        assert_eq!(def.modules[1].type_tag, "");
        assert_eq!(def.perk_frame.as_deref(), Some("advanced"));
        assert_eq!(def.unlock_xp, 250);
    }

    #[test]
    fn test_mistyped_fields_fall_back() {
        let def = PerkDefinition::from_value(&parse(
            r#"{"id": "x", "title": "X", "cost": "lots", "flags": "solo", "modules": {}, "buff": 4}"#,
        ))
        .unwrap();
        assert_eq!(def.cost, 0);
        assert!(def.flags.is_empty());
        assert!(def.modules.is_empty());
        assert!(def.buff.is_none());
    }

    #[test]
    fn test_required_fields() {
        let missing_id = PerkDefinition::from_value(&parse(r#"{"title": "X"}"#));
        assert!(matches!(missing_id, Err(Error::MissingField("id"))));
        let blank_title = PerkDefinition::from_value(&parse(r#"{"id": "x", "title": "  "}"#));
        assert!(matches!(blank_title, Err(Error::MissingField("title"))));
        assert!(matches!(
            PerkDefinition::from_value(&Value::from("x")),
            Err(Error::UnrecognizedFormat(_))
        ));
    }
}
