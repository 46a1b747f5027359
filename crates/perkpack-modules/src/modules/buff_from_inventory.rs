//! Scales a buff by how many matching items the actor carries

use crate::params::Params;
use perkpack_core::{
    BehaviorModule, BuffGraph, Inventory, Item, ModuleContext, ModuleKind, MultiplierCurve,
    PerkOwner, StackCounter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BuffFromInventoryConfig {
    pub item_tag: Option<String>,
    /// Case-insensitive substring of the item name; replaces the tag when set
    pub item_name: Option<String>,
    pub buff_multiplier: f32,
    pub use_curve: bool,
    /// Count at which the curve reaches its end
    pub curve_max: f32,
    pub include_hands: bool,
    pub curve: MultiplierCurve,
    pub buff: Option<BuffGraph>,
}

impl Default for BuffFromInventoryConfig {
    fn default() -> Self {
        Self {
            item_tag: None,
            item_name: None,
            buff_multiplier: 1.0,
            use_curve: false,
            curve_max: 10.0,
            include_hands: false,
            curve: MultiplierCurve::linear(0.0, 0.0, 1.0, 1.0),
            buff: None,
        }
    }
}

impl BuffFromInventoryConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            item_tag: params.non_blank("itemTag"),
            item_name: params.non_blank("itemName"),
            buff_multiplier: params.f32_or("buffMultiplier", defaults.buff_multiplier),
            use_curve: params.bool_or("useCurve", defaults.use_curve),
            curve_max: params.f32_or("curveMax", defaults.curve_max),
            include_hands: params.bool_or("includeHands", defaults.include_hands),
            curve: params.curve_or("curve", defaults.curve),
            buff: params.buff("buff"),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        match (&self.item_name, &self.item_tag) {
            (Some(name), _) => item.name_contains(name),
            (None, Some(tag)) => item.has_tag(tag),
            (None, None) => false,
        }
    }
}

#[derive(Debug)]
pub struct BuffFromInventory {
    name: String,
    config: BuffFromInventoryConfig,
    stacks: Option<StackCounter>,
    last_count: usize,
}

impl BuffFromInventory {
    pub fn new(name: impl Into<String>, config: BuffFromInventoryConfig) -> Self {
        Self {
            name: name.into(),
            config,
            stacks: None,
            last_count: 0,
        }
    }

    pub fn config(&self) -> &BuffFromInventoryConfig {
        &self.config
    }

    /// Matching items in the bag, plus hands when configured
    pub fn count_matching(&self, inventory: &Inventory) -> usize {
        let held = if self.config.include_hands {
            inventory.held_items().filter(|i| self.config.matches(i)).count()
        } else {
            0
        };
        held + inventory.bag.iter().filter(|i| self.config.matches(i)).count()
    }

    /// Count seen on the most recent update
    pub fn last_count(&self) -> usize {
        self.last_count
    }

    /// Buff multiplier for a raw count at a stack amount
    pub fn multiplier_for(&self, count: usize, stack_amount: f32) -> f32 {
        let count = count as f32;
        let scaled = if self.config.use_curve && self.config.curve_max > 0.0 {
            self.config.curve.evaluate(count / self.config.curve_max)
        } else {
            count
        };
        scaled * self.config.buff_multiplier * stack_amount
    }
}

impl BehaviorModule for BuffFromInventory {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::BuffFromInventory
    }

    fn initialize(&mut self, owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        self.stacks = Some(owner.stacks.clone());
        if let Some(buff) = &self.config.buff {
            let mut buff = buff.clone().held();
            buff.set_multiplier(0.0);
            ctx.actor.buffs.add(buff);
        }
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        let Some(stacks) = &self.stacks else {
            return;
        };
        self.last_count = self.count_matching(&ctx.actor.inventory);
        let multiplier = self.multiplier_for(self.last_count, stacks.amount());
        // Overwritten every tick; other writers of the same buff lose
        if let Some(buff) = &self.config.buff {
            ctx.actor.buffs.set_multiplier(&buff.id, multiplier);
        }
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.take().is_some() {
            if let Some(buff) = &self.config.buff {
                ctx.actor.buffs.remove(&buff.id);
            }
        }
        self.last_count = 0;
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, owner, Harness};

    fn rebar(id: u64) -> Item {
        item(id, "Item_Rebar").with_tag("metal")
    }

    fn config() -> BuffFromInventoryConfig {
        BuffFromInventoryConfig {
            item_tag: Some("metal".to_string()),
            buff: Some(BuffGraph::new("heavy").with_stat("addDamage", 1.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_hands_and_bag() {
        let mut h = Harness::new();
        h.actor.inventory.hands = vec![Some(rebar(1)), Some(rebar(2))];
        h.actor.inventory.bag = vec![rebar(3), item(4, "Item_Food")];

        let mut module = BuffFromInventory::new(
            "b",
            BuffFromInventoryConfig {
                include_hands: true,
                ..config()
            },
        );
        module.initialize(&owner(1), &mut h.ctx(0.0));
        module.update(&mut h.ctx(0.1));

        assert_eq!(module.last_count(), 3);
        assert_eq!(h.actor.buffs.get("heavy").unwrap().multiplier(), 3.0);
    }

    #[test]
    fn test_hands_excluded_by_default() {
        let mut inventory = Inventory::with_hands(2);
        inventory.hands[0] = Some(rebar(1));
        inventory.bag.push(rebar(2));
        let module = BuffFromInventory::new("b", config());
        assert_eq!(module.count_matching(&inventory), 1);
    }

    #[test]
    fn test_curve_and_stack_scaling() {
        let module = BuffFromInventory::new(
            "b",
            BuffFromInventoryConfig {
                use_curve: true,
                curve_max: 4.0,
                buff_multiplier: 2.0,
                ..config()
            },
        );
        // 2 of 4 on the default linear curve is 0.5
        assert_eq!(module.multiplier_for(2, 3.0), 3.0);
        assert_eq!(module.multiplier_for(40, 1.0), 2.0);
    }

    #[test]
    fn test_overwrites_every_tick_and_cleans_up() {
        let mut h = Harness::new();
        let mut module = BuffFromInventory::new("b", config());
        module.initialize(&owner(2), &mut h.ctx(0.0));
        h.actor.inventory.bag.push(rebar(1));

        h.actor.buffs.set_multiplier("heavy", 50.0);
        module.update(&mut h.ctx(0.1));
        assert_eq!(h.actor.buffs.get("heavy").unwrap().multiplier(), 2.0);

        module.on_destroy(&mut h.ctx(0.0));
        assert!(!h.actor.buffs.contains("heavy"));
    }

    #[test]
    fn test_name_match() {
        let module = BuffFromInventory::new(
            "b",
            BuffFromInventoryConfig {
                item_name: Some("rebar".to_string()),
                ..Default::default()
            },
        );
        let mut inventory = Inventory::default();
        inventory.bag.push(item(1, "Item_Rebar_Rusty"));
        assert_eq!(module.count_matching(&inventory), 1);
    }

    #[test]
    fn test_name_takes_precedence_over_tag() {
        let module = BuffFromInventory::new(
            "b",
            BuffFromInventoryConfig {
                item_name: Some("rebar".to_string()),
                ..config()
            },
        );
        let mut inventory = Inventory::default();
        inventory.bag.push(rebar(1));
        inventory.bag.push(item(2, "Item_Pipe").with_tag("metal"));
        assert_eq!(module.count_matching(&inventory), 1);
    }
}
