//! Banks tagged items the moment they enter the inventory

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostEvent, HostRequest, Item, ModuleContext, ModuleKind};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RoachBankerConfig {
    pub item_tag: String,
    /// Only bank items that land in the bag, never held ones
    pub bag_only: bool,
}

impl Default for RoachBankerConfig {
    fn default() -> Self {
        Self {
            item_tag: "roach".to_string(),
            bag_only: false,
        }
    }
}

impl RoachBankerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            item_tag: params.string_or("itemTag", &defaults.item_tag),
            bag_only: params.bool_or("bagOnly", defaults.bag_only),
        }
    }
}

#[derive(Debug)]
pub struct RoachBanker {
    name: String,
    config: RoachBankerConfig,
    banked: u32,
}

impl RoachBanker {
    pub fn new(name: impl Into<String>, config: RoachBankerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            banked: 0,
        }
    }

    pub fn config(&self) -> &RoachBankerConfig {
        &self.config
    }

    /// Whether an inventory change passes the tag and scope filter
    pub fn accepts(&self, item: &Item, in_bag: bool) -> bool {
        (in_bag || !self.config.bag_only) && item.has_tag(&self.config.item_tag)
    }

    /// Items banked since attach
    pub fn banked(&self) -> u32 {
        self.banked
    }
}

impl BehaviorModule for RoachBanker {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::RoachBanker
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        let HostEvent::ItemAdded { item, in_bag } = event else {
            return;
        };
        if !self.accepts(item, *in_bag) {
            return;
        }
        let Some(taken) = ctx.actor.inventory.take(item.id) else {
            return;
        };
        self.banked += 1;
        debug!(item = %taken.id, banked = self.banked, "banked item");
        ctx.requests.push(HostRequest::BankItems(vec![taken]));
    }

    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {
        self.banked = 0;
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}
