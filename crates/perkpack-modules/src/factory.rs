//! Tag-dispatched construction of behavior modules

use crate::error::{ModuleError, Result};
use crate::modules::*;
use crate::params::Params;
use perkpack_core::{BehaviorModule, ModuleKind, Value, ValueMap};
use tracing::{debug, error};

/// One entry of a perk's `modules` list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDefinition {
    /// Variant selector, matched case-insensitively
    pub type_tag: String,
    /// Display name; defaults to the type tag
    pub name: Option<String>,
    pub parameters: ValueMap,
}

impl ModuleDefinition {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    fn display_name(&self, fallback: &str) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Build the module a definition describes
///
/// Unknown tags produce an inert [`GenericModule`]; only a blank tag fails.
pub fn try_create(def: &ModuleDefinition) -> Result<Box<dyn BehaviorModule>> {
    let tag = def.type_tag.trim();
    if tag.is_empty() {
        return Err(ModuleError::MissingType(def.display_name("<unnamed>")));
    }
    let Some(kind) = ModuleKind::from_tag(tag) else {
        return Ok(Box::new(GenericModule::new(def.display_name(tag))));
    };
    let params = Params::new(Some(&def.parameters));
    let name = def.display_name(kind.tag());
    let module: Box<dyn BehaviorModule> = match kind {
        ModuleKind::RemovalTimer => Box::new(RemovalTimer::new(
            name,
            RemovalTimerConfig::from_params(&params),
        )),
        ModuleKind::ConsumeBuff => {
            Box::new(ConsumeBuff::new(name, ConsumeBuffConfig::from_params(&params)))
        }
        ModuleKind::RoachBanker => {
            Box::new(RoachBanker::new(name, RoachBankerConfig::from_params(&params)))
        }
        ModuleKind::BuffFromInventory => Box::new(BuffFromInventory::new(
            name,
            BuffFromInventoryConfig::from_params(&params),
        )),
        ModuleKind::HoldDrop => Box::new(HoldDrop::new(name, HoldDropConfig::from_params(&params))),
        ModuleKind::AutoConsumer => Box::new(AutoConsumer::new(
            name,
            AutoConsumerConfig::from_params(&params),
        )),
        ModuleKind::FallBuff => Box::new(FallBuff::new(name, FallBuffConfig::from_params(&params))),
        ModuleKind::HungerMeter => {
            Box::new(HungerMeter::new(name, HungerMeterConfig::from_params(&params)))
        }
        ModuleKind::JazzHand => Box::new(JazzHand::new(name, JazzHandConfig::from_params(&params))),
        ModuleKind::MassController => Box::new(MassController::new(
            name,
            MassControllerConfig::from_params(&params),
        )),
        ModuleKind::ObjectSpawner => Box::new(ObjectSpawner::new(
            name,
            ObjectSpawnerConfig::from_params(&params),
        )),
        ModuleKind::ItemRemover => {
            Box::new(ItemRemover::new(name, ItemRemoverConfig::from_params(&params)))
        }
        ModuleKind::ItemTransformer => Box::new(ItemTransformer::new(
            name,
            ItemTransformerConfig::from_params(&params),
        )),
        ModuleKind::OnDamage => Box::new(OnDamage::new(name, OnDamageConfig::from_params(&params))),
        ModuleKind::Generic => Box::new(GenericModule::new(name)),
    };
    Ok(module)
}

/// Build a module, logging and swallowing failures
///
/// `None` means the module is skipped; the owning perk is still built.
pub fn create(def: &ModuleDefinition) -> Option<Box<dyn BehaviorModule>> {
    match try_create(def) {
        Ok(module) => {
            debug!(kind = %module.kind(), name = module.name(), "created module");
            Some(module)
        }
        Err(e) => {
            error!("Failed to create module {:?}: {}", def.type_tag, e);
            None
        }
    }
}

/// Build every module in a list, dropping the ones that fail
pub fn create_all<'a>(
    defs: impl IntoIterator<Item = &'a ModuleDefinition>,
) -> Vec<Box<dyn BehaviorModule>> {
    defs.into_iter().filter_map(create).collect()
}
