//! A hunger meter that drains over time and refills when the actor eats
//!
//! While the meter sits above the low threshold the `buff` graph is active;
//! below it the `debuff` graph takes over. Both run at the owner's stack
//! amount and only one of them is non-zero at a time.

use crate::params::Params;
use perkpack_core::{
    BehaviorModule, BuffGraph, HostEvent, ModuleContext, ModuleKind, PerkOwner, StackCounter,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct HungerMeterConfig {
    pub consume_buff_ids: Vec<String>,
    pub hunger_max: f32,
    /// Meter lost per second
    pub hunger_decay_rate: f32,
    /// Meter regained per consume
    pub eat_recovery: f32,
    /// Fraction of `hunger_max` below which the actor is hungry
    pub hunger_threshold: f32,
    pub buff: Option<BuffGraph>,
    pub debuff: Option<BuffGraph>,
}

impl Default for HungerMeterConfig {
    fn default() -> Self {
        Self {
            consume_buff_ids: vec!["food".to_string()],
            hunger_max: 100.0,
            hunger_decay_rate: 1.0,
            eat_recovery: 25.0,
            hunger_threshold: 0.25,
            buff: None,
            debuff: None,
        }
    }
}

impl HungerMeterConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        let ids: Vec<&str> = defaults.consume_buff_ids.iter().map(String::as_str).collect();
        Self {
            consume_buff_ids: params.string_list_or("consumeBuffIDs", &ids),
            hunger_max: params.f32_or("hungerMax", defaults.hunger_max),
            hunger_decay_rate: params.f32_or("hungerDecayRate", defaults.hunger_decay_rate),
            eat_recovery: params.f32_or("eatRecovery", defaults.eat_recovery),
            hunger_threshold: params
                .f32_or("hungerThreshold", defaults.hunger_threshold)
                .clamp(0.0, 1.0),
            buff: params.buff("buff"),
            debuff: params.buff("debuff"),
        }
    }

    fn low_mark(&self) -> f32 {
        self.hunger_max * self.hunger_threshold
    }
}

#[derive(Debug)]
pub struct HungerMeter {
    name: String,
    config: HungerMeterConfig,
    stacks: Option<StackCounter>,
    meter: f32,
    hungry: bool,
}

impl HungerMeter {
    pub fn new(name: impl Into<String>, config: HungerMeterConfig) -> Self {
        let meter = config.hunger_max;
        Self {
            name: name.into(),
            config,
            stacks: None,
            meter,
            hungry: false,
        }
    }

    pub fn config(&self) -> &HungerMeterConfig {
        &self.config
    }

    pub fn meter(&self) -> f32 {
        self.meter
    }

    pub fn is_hungry(&self) -> bool {
        self.hungry
    }

    fn apply_state(&self, ctx: &mut ModuleContext<'_>) {
        let Some(stacks) = &self.stacks else {
            return;
        };
        let (on, off) = if self.hungry {
            (&self.config.debuff, &self.config.buff)
        } else {
            (&self.config.buff, &self.config.debuff)
        };
        if let Some(graph) = on {
            ctx.actor.buffs.set_multiplier(&graph.id, stacks.amount());
        }
        if let Some(graph) = off {
            ctx.actor.buffs.set_multiplier(&graph.id, 0.0);
        }
    }

    fn sync_threshold(&mut self, ctx: &mut ModuleContext<'_>) {
        let hungry = self.meter < self.config.low_mark();
        if hungry != self.hungry {
            self.hungry = hungry;
            debug!(meter = self.meter, hungry, "hunger threshold crossed");
            self.apply_state(ctx);
        }
    }
}

impl BehaviorModule for HungerMeter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::HungerMeter
    }

    fn initialize(&mut self, owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        self.stacks = Some(owner.stacks.clone());
        self.meter = self.config.hunger_max;
        self.hungry = false;
        for graph in [&self.config.buff, &self.config.debuff].into_iter().flatten() {
            ctx.actor.buffs.add(graph.clone().held());
        }
        self.apply_state(ctx);
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.is_none() {
            return;
        }
        self.meter = (self.meter - self.config.hunger_decay_rate * ctx.dt).max(0.0);
        self.sync_threshold(ctx);
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        let HostEvent::Consumed { item, buff_id } = event else {
            return;
        };
        if self.stacks.is_none() {
            return;
        }
        let matched = self.config.consume_buff_ids.iter().any(|id| {
            buff_id.as_deref().is_some_and(|b| b.eq_ignore_ascii_case(id)) || item.has_tag(id)
        });
        if matched {
            self.meter = (self.meter + self.config.eat_recovery).min(self.config.hunger_max);
            self.sync_threshold(ctx);
        }
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.take().is_some() {
            for graph in [&self.config.buff, &self.config.debuff].into_iter().flatten() {
                ctx.actor.buffs.remove(&graph.id);
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

    fn module() -> HungerMeter {
        HungerMeter::new(
            "h",
            HungerMeterConfig {
                hunger_max: 10.0,
                hunger_decay_rate: 1.0,
                eat_recovery: 5.0,
                buff: Some(BuffGraph::new("fed").with_stat("addSpeed", 1.0)),
                debuff: Some(BuffGraph::new("starving").with_stat("addSpeed", -1.0)),
                ..Default::default()
            },
        )
    }

    fn mult(h: &Harness, id: &str) -> f32 {
        h.actor.buffs.get(id).unwrap().multiplier()
    }

    #[test]
    fn test_toggles_on_threshold() {
        let mut h = Harness::new();
        let mut hunger = module();
        hunger.initialize(&owner(2), &mut h.ctx(0.0));
        assert_eq!(mult(&h, "fed"), 2.0);
        assert_eq!(mult(&h, "starving"), 0.0);

        hunger.update(&mut h.ctx(8.0));
        assert!(hunger.is_hungry());
        assert_eq!(mult(&h, "fed"), 0.0);
        assert_eq!(mult(&h, "starving"), 2.0);

        let snack = HostEvent::Consumed {
            item: item(1, "Item_Food_Bar"),
            buff_id: Some("food".to_string()),
        };
        hunger.on_event(&snack, &mut h.ctx(0.0));
        assert_eq!(hunger.meter(), 7.0);
        assert!(!hunger.is_hungry());
        assert_eq!(mult(&h, "fed"), 2.0);
    }

    #[test]
    fn test_meter_bounded() {
        let mut h = Harness::new();
        let mut hunger = module();
        hunger.initialize(&owner(1), &mut h.ctx(0.0));
        hunger.update(&mut h.ctx(100.0));
        assert_eq!(hunger.meter(), 0.0);

        let snack = HostEvent::Consumed {
            item: item(1, "Item_Food_Bar").with_tag("food"),
            buff_id: None,
        };
        for _ in 0..5 {
            hunger.on_event(&snack, &mut h.ctx(0.0));
        }
        assert_eq!(hunger.meter(), 10.0);
    }

    #[test]
    fn test_destroy_removes_graphs() {
        let mut h = Harness::new();
        let mut hunger = module();
        hunger.initialize(&owner(1), &mut h.ctx(0.0));
        hunger.on_destroy(&mut h.ctx(0.0));
        assert!(h.actor.buffs.is_empty());
    }
}
