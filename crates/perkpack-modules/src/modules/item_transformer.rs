//! Replaces carried items with a target prefab
//!
//! Two paths share one eligibility rule and one dedup set:
//! a debounced scan over hands and bag, and an insertion hook the host runs
//! before an item reaches a hand.

use crate::params::Params;
use perkpack_core::{
    BehaviorModule, Item, ItemId, ItemInterceptor, ListenerId, ModuleContext, ModuleKind,
    PerkOwner, World,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

/// Minimum seconds between inventory scans
pub const SCAN_INTERVAL: f32 = 0.1;

/// Never transformed, whatever the configuration says
const PROTECTED_ITEM: &str = "Item_Hammer";

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTransformerConfig {
    /// Prefab id of the replacement, e.g. `Item_Rebar`
    pub transform_to_item_id: String,
    /// Case-insensitive name substrings that are left alone
    pub excluded_item_names: Vec<String>,
    /// Copy bag placement onto the replacement
    pub preserve_position: bool,
}

impl Default for ItemTransformerConfig {
    fn default() -> Self {
        Self {
            transform_to_item_id: String::new(),
            excluded_item_names: Vec::new(),
            preserve_position: true,
        }
    }
}

impl ItemTransformerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            transform_to_item_id: params.string_or("transformToItemID", ""),
            excluded_item_names: params.string_list_or("excludedItemNames", &[]),
            preserve_position: params.bool_or("preservePosition", defaults.preserve_position),
        }
    }

    /// Target id without its `Item_` prefix, lowercased
    fn target_stem(&self) -> String {
        self.transform_to_item_id
            .trim()
            .trim_start_matches("Item_")
            .to_ascii_lowercase()
    }
}

/// State shared between the module and its insertion hook
#[derive(Debug)]
pub struct TransformerState {
    config: ItemTransformerConfig,
    /// Instances this module produced and must not touch again
    transformed: HashSet<ItemId>,
}

impl TransformerState {
    fn new(config: ItemTransformerConfig) -> Self {
        Self {
            config,
            transformed: HashSet::new(),
        }
    }

    /// Eligibility rule shared by the scan and the insertion hook
    pub fn should_transform(&self, item: &Item) -> bool {
        let stem = self.config.target_stem();
        if stem.is_empty() || self.transformed.contains(&item.id) {
            return false;
        }
        if item.name.eq_ignore_ascii_case(PROTECTED_ITEM) || item.name_contains(&stem) {
            return false;
        }
        !self
            .config
            .excluded_item_names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .any(|name| item.name_contains(name))
    }

    /// Instantiate the replacement and remember it
    fn replace(&mut self, original: &Item, world: &mut dyn World) -> Option<Item> {
        let Some(mut fresh) = world.instantiate_item(&self.config.transform_to_item_id) else {
            warn!(
                target = %self.config.transform_to_item_id,
                "transform target could not be instantiated"
            );
            return None;
        };
        if self.config.preserve_position {
            fresh.bag_position = original.bag_position;
            fresh.bag_rotation = original.bag_rotation;
        }
        debug!(from = %original.name, to = %fresh.name, "transformed item");
        self.transformed.insert(fresh.id);
        Some(fresh)
    }

    /// Forget produced items the actor no longer carries
    fn prune(&mut self, still_present: impl Fn(ItemId) -> bool) {
        self.transformed.retain(|id| still_present(*id));
    }

    pub fn transformed_count(&self) -> usize {
        self.transformed.len()
    }
}

impl ItemInterceptor for TransformerState {
    fn intercept(&mut self, item: &Item, world: &mut dyn World) -> Option<Item> {
        if !self.should_transform(item) {
            return None;
        }
        self.replace(item, world)
    }
}

#[derive(Debug)]
pub struct ItemTransformer {
    name: String,
    state: Rc<RefCell<TransformerState>>,
    registration: Option<ListenerId>,
    since_scan: f32,
}

impl ItemTransformer {
    pub fn new(name: impl Into<String>, config: ItemTransformerConfig) -> Self {
        Self {
            name: name.into(),
            state: Rc::new(RefCell::new(TransformerState::new(config))),
            registration: None,
            since_scan: 0.0,
        }
    }

    pub fn config(&self) -> ItemTransformerConfig {
        self.state.borrow().config.clone()
    }

    pub fn should_transform(&self, item: &Item) -> bool {
        self.state.borrow().should_transform(item)
    }

    pub fn transformed_count(&self) -> usize {
        self.state.borrow().transformed_count()
    }

    /// Replace every eligible carried item; returns how many were replaced
    pub fn scan(&mut self, ctx: &mut ModuleContext<'_>) -> usize {
        let mut state = self.state.borrow_mut();
        let inventory = &mut ctx.actor.inventory;
        let carried: HashSet<ItemId> = inventory.all_items().map(|item| item.id).collect();
        state.prune(|id| carried.contains(&id));

        let world = &mut *ctx.world;
        let mut replaced = 0;
        for slot in inventory.all_items_mut() {
            if !state.should_transform(slot) {
                continue;
            }
            if let Some(fresh) = state.replace(slot, world) {
                *slot = fresh;
                replaced += 1;
            }
        }
        replaced
    }
}

impl BehaviorModule for ItemTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::ItemTransformer
    }

    fn initialize(&mut self, _owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        if self.registration.is_none() {
            self.registration = Some(ctx.session.insertion.register(&self.state));
        }
        self.since_scan = 0.0;
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.registration.is_none() {
            return;
        }
        self.since_scan += ctx.dt;
        if self.since_scan < SCAN_INTERVAL {
            return;
        }
        self.since_scan = 0.0;
        self.scan(ctx);
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if let Some(id) = self.registration.take() {
            ctx.session.insertion.unregister(id);
        }
        self.state.borrow_mut().transformed.clear();
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config()))
    }
}
