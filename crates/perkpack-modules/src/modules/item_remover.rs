//! Deletes tagged items from hands and bag on trigger

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostEvent, ModuleContext, ModuleKind};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemRemoverConfig {
    pub item_tag_to_remove: String,
}

impl ItemRemoverConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        Self {
            item_tag_to_remove: params.string_or("itemTagToRemove", ""),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemRemover {
    name: String,
    config: ItemRemoverConfig,
}

impl ItemRemover {
    pub fn new(name: impl Into<String>, config: ItemRemoverConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &ItemRemoverConfig {
        &self.config
    }
}

impl BehaviorModule for ItemRemover {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::ItemRemover
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        if *event != HostEvent::Trigger || self.config.item_tag_to_remove.is_empty() {
            return;
        }
        let tag = &self.config.item_tag_to_remove;
        let inventory = &mut ctx.actor.inventory;
        let removed = inventory.take_from_hands(|item| item.has_tag(tag)).len()
            + inventory.take_from_bag(|item| item.has_tag(tag)).len();
        if removed > 0 {
            debug!(tag = %tag, removed, "removed items");
        }
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, Harness};

    #[test]
    fn test_removes_everywhere_on_trigger() {
        let mut h = Harness::new();
        h.actor.inventory.hands[1] = Some(item(1, "Item_Pills").with_tag("cursed"));
        h.actor.inventory.bag = vec![item(2, "Item_Pills").with_tag("Cursed"), item(3, "Item_Rope")];

        let mut module = ItemRemover::new(
            "r",
            ItemRemoverConfig {
                item_tag_to_remove: "cursed".to_string(),
            },
        );
        module.on_event(&HostEvent::Trigger, &mut h.ctx(0.0));

        let left: Vec<_> = h.actor.inventory.all_items().map(|i| i.id.raw()).collect();
        assert_eq!(left, vec![3]);
    }
}
