//! Drops tagged items from the hands on the hold/drop input

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostEvent, HostRequest, ModuleContext, ModuleKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoldDropConfig {
    pub item_tag_to_remove: String,
}

impl HoldDropConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        Self {
            item_tag_to_remove: params.string_or("itemTagToRemove", ""),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HoldDrop {
    name: String,
    config: HoldDropConfig,
}

impl HoldDrop {
    pub fn new(name: impl Into<String>, config: HoldDropConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &HoldDropConfig {
        &self.config
    }
}

impl BehaviorModule for HoldDrop {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::HoldDrop
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        if *event != HostEvent::HoldDrop || self.config.item_tag_to_remove.is_empty() {
            return;
        }
        let tag = &self.config.item_tag_to_remove;
        let dropped = ctx.actor.inventory.take_from_hands(|item| item.has_tag(tag));
        if !dropped.is_empty() {
            ctx.requests.push(HostRequest::DropItems(dropped));
        }
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(self.clone())
    }
}
