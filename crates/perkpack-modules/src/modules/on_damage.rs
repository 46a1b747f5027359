//! Reacts to survived hits with a timed buff, healing and item drops

use crate::params::Params;
use perkpack_core::{
    Actor, BehaviorModule, BuffGraph, DamageEvent, DamageListener, HostRequest, ListenerId,
    ModuleContext, ModuleKind, PerkOwner, Requests, StackCounter,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Filter value that accepts every damage type
pub const ANY_DAMAGE: &str = "any";

#[derive(Debug, Clone, PartialEq)]
pub struct OnDamageConfig {
    /// Buff id to raise on a hit; created when the actor lacks it
    pub apply_buff_on_hit: Option<String>,
    pub buff_duration: f32,
    pub buff_amount: f32,
    pub heal_amount: f32,
    pub drop_all_items: bool,
    /// `any`, or a case-insensitive substring of the damage type
    pub damage_type_filter: String,
}

impl Default for OnDamageConfig {
    fn default() -> Self {
        Self {
            apply_buff_on_hit: None,
            buff_duration: 3.0,
            buff_amount: 1.0,
            heal_amount: 0.0,
            drop_all_items: false,
            damage_type_filter: ANY_DAMAGE.to_string(),
        }
    }
}

impl OnDamageConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            apply_buff_on_hit: params.non_blank("applyBuffOnHit"),
            buff_duration: params.f32_or("buffDuration", defaults.buff_duration),
            buff_amount: params.f32_or("buffAmount", defaults.buff_amount),
            heal_amount: params.f32_or("healAmount", defaults.heal_amount),
            drop_all_items: params.bool_or("dropAllItems", defaults.drop_all_items),
            damage_type_filter: params.string_or("damageTypeFilter", &defaults.damage_type_filter),
        }
    }

    pub fn accepts(&self, kind: &str) -> bool {
        let filter = self.damage_type_filter.trim();
        filter.is_empty()
            || filter.eq_ignore_ascii_case(ANY_DAMAGE)
            || kind.to_ascii_lowercase().contains(&filter.to_ascii_lowercase())
    }
}

/// Listener half of the module, held weakly by the damage stream
#[derive(Debug)]
pub struct OnDamageState {
    config: OnDamageConfig,
    stacks: StackCounter,
    /// Seconds left on the hit buff
    timer: f32,
    last_hit: Option<(u64, u32, String)>,
}

impl OnDamageState {
    fn is_duplicate(&mut self, event: &DamageEvent) -> bool {
        let key = (event.frame, event.amount.to_bits(), event.kind.clone());
        if self.last_hit.as_ref() == Some(&key) {
            return true;
        }
        self.last_hit = Some(key);
        false
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }
}

impl DamageListener for OnDamageState {
    fn on_damage(&mut self, event: &DamageEvent, actor: &mut Actor, requests: &mut Requests) {
        if !self.config.accepts(&event.kind) || self.is_duplicate(event) {
            return;
        }
        debug!(amount = event.amount, kind = %event.kind, "damage reaction");
        if let Some(buff) = &self.config.apply_buff_on_hit {
            if self.config.buff_amount > 0.0 {
                actor
                    .buffs
                    .set_multiplier(buff, self.config.buff_amount * self.stacks.amount());
                self.timer = self.config.buff_duration;
            }
        }
        if self.config.heal_amount > 0.0 {
            actor.heal(self.config.heal_amount);
        }
        if self.config.drop_all_items {
            let dropped = actor.inventory.drop_all();
            if !dropped.is_empty() {
                requests.push(HostRequest::DropItems(dropped));
            }
        }
    }
}

#[derive(Debug)]
pub struct OnDamage {
    name: String,
    config: OnDamageConfig,
    state: Option<Rc<RefCell<OnDamageState>>>,
    subscription: Option<ListenerId>,
}

impl OnDamage {
    pub fn new(name: impl Into<String>, config: OnDamageConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: None,
            subscription: None,
        }
    }

    pub fn config(&self) -> &OnDamageConfig {
        &self.config
    }

    /// Seconds left on the hit buff, zero when idle or detached
    pub fn remaining(&self) -> f32 {
        self.state
            .as_ref()
            .map(|state| state.borrow().timer())
            .unwrap_or(0.0)
    }
}

impl BehaviorModule for OnDamage {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::OnDamage
    }

    fn initialize(&mut self, owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        if self.subscription.is_some() {
            return;
        }
        if let Some(id) = &self.config.apply_buff_on_hit {
            let buff = ctx.actor.buffs.get_or_add(BuffGraph::new(id.clone()).held());
            buff.set_multiplier(0.0);
        }
        let state = Rc::new(RefCell::new(OnDamageState {
            config: self.config.clone(),
            stacks: owner.stacks.clone(),
            timer: 0.0,
            last_hit: None,
        }));
        self.subscription = Some(ctx.session.damage.subscribe(&state));
        self.state = Some(state);
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        let mut state = state.borrow_mut();
        if state.timer <= 0.0 {
            return;
        }
        state.timer -= ctx.dt;
        if state.timer <= 0.0 {
            state.timer = 0.0;
            if let Some(buff) = &self.config.apply_buff_on_hit {
                ctx.actor.buffs.set_multiplier(buff, 0.0);
            }
        }
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if let Some(id) = self.subscription.take() {
            ctx.session.damage.unsubscribe(id);
        }
        if self.state.take().is_some() {
            if let Some(buff) = &self.config.apply_buff_on_hit {
                ctx.actor.buffs.remove(buff);
            }
        }
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, owner, Harness};

    fn hit(h: &mut Harness, amount: f32, kind: &str, frame: u64) -> usize {
        let event = DamageEvent::new(amount, kind, frame);
        h.session.damage.publish(&event, &mut h.actor, &mut h.requests)
    }

    fn rage() -> OnDamage {
        OnDamage::new(
            "rage",
            OnDamageConfig {
                apply_buff_on_hit: Some("rage".to_string()),
                buff_amount: 2.0,
                buff_duration: 1.0,
                ..Default::default()
            },
        )
    }

    fn multiplier(h: &Harness) -> f32 {
        h.actor.buffs.get("rage").unwrap().multiplier()
    }

    #[test]
    fn test_hit_sets_stack_scaled_buff_then_expires() {
        let mut h = Harness::new();
        let mut module = rage();
        module.initialize(&owner(3), &mut h.ctx(0.0));
        assert_eq!(multiplier(&h), 0.0);

        assert_eq!(hit(&mut h, 10.0, "fall", 1), 1);
        assert_eq!(multiplier(&h), 6.0);
        assert_eq!(module.remaining(), 1.0);

        module.update(&mut h.ctx(0.5));
        assert_eq!(multiplier(&h), 6.0);
        module.update(&mut h.ctx(0.5));
        assert_eq!(multiplier(&h), 0.0);
        assert_eq!(module.remaining(), 0.0);
    }

    #[test]
    fn test_filter_and_killing_blows() {
        let mut h = Harness::new();
        let mut module = OnDamage::new(
            "acid",
            OnDamageConfig {
                apply_buff_on_hit: Some("rage".to_string()),
                damage_type_filter: "ACID".to_string(),
                ..Default::default()
            },
        );
        module.initialize(&owner(1), &mut h.ctx(0.0));

        hit(&mut h, 5.0, "fall", 1);
        assert_eq!(multiplier(&h), 0.0);

        let mut fatal = DamageEvent::new(5.0, "hazard_acid", 2);
        fatal.survived = false;
        h.session.damage.publish(&fatal, &mut h.actor, &mut h.requests);
        assert_eq!(multiplier(&h), 0.0);

        hit(&mut h, 5.0, "hazard_acid", 3);
        assert_eq!(multiplier(&h), 1.0);
    }

    #[test]
    fn test_duplicate_delivery_ignored() {
        let mut h = Harness::new();
        h.actor.health = 50.0;
        let mut module = OnDamage::new(
            "medic",
            OnDamageConfig {
                heal_amount: 10.0,
                ..Default::default()
            },
        );
        module.initialize(&owner(1), &mut h.ctx(0.0));

        hit(&mut h, 4.0, "fall", 7);
        hit(&mut h, 4.0, "fall", 7);
        assert_eq!(h.actor.health, 60.0);

        hit(&mut h, 4.0, "fall", 8);
        assert_eq!(h.actor.health, 70.0);
    }

    #[test]
    fn test_heal_capped_and_drop_all() {
        let mut h = Harness::new();
        h.actor.health = 95.0;
        h.actor.inventory.hands[0] = Some(item(1, "Item_Rebar"));
        h.actor.inventory.bag.push(item(2, "Item_Food"));
        let mut module = OnDamage::new(
            "butterfingers",
            OnDamageConfig {
                heal_amount: 50.0,
                drop_all_items: true,
                ..Default::default()
            },
        );
        module.initialize(&owner(1), &mut h.ctx(0.0));
        hit(&mut h, 1.0, "fall", 1);

        assert_eq!(h.actor.health, 100.0);
        assert_eq!(h.actor.inventory.all_items().count(), 0);
        let drops: Vec<_> = h.requests.drain().collect();
        assert!(matches!(&drops[..], [HostRequest::DropItems(items)] if items.len() == 2));
    }

    #[test]
    fn test_destroy_unsubscribes_and_removes_buff() {
        let mut h = Harness::new();
        let mut module = rage();
        module.initialize(&owner(1), &mut h.ctx(0.0));
        assert_eq!(h.session.damage.listener_count(), 1);

        module.on_destroy(&mut h.ctx(0.0));
        assert_eq!(h.session.damage.listener_count(), 0);
        assert!(!h.actor.buffs.contains("rage"));
        assert_eq!(hit(&mut h, 1.0, "fall", 1), 0);

        // Safe to repeat
        module.on_destroy(&mut h.ctx(0.0));
    }
}
