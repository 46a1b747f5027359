//! Rewards landings from a window of fall heights with a decaying buff

use crate::params::Params;
use perkpack_core::{
    BehaviorModule, BuffGraph, HostEvent, ModuleContext, ModuleKind, PerkOwner, StackCounter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FallBuffConfig {
    pub buff_multiplier: f32,
    pub fall_min: f32,
    pub fall_max: f32,
    pub buff_decay_rate: f32,
    pub buff: Option<BuffGraph>,
}

impl Default for FallBuffConfig {
    fn default() -> Self {
        Self {
            buff_multiplier: 1.0,
            fall_min: 5.0,
            fall_max: 30.0,
            buff_decay_rate: 0.1,
            buff: None,
        }
    }
}

impl FallBuffConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            buff_multiplier: params.f32_or("buffMultiplier", defaults.buff_multiplier),
            fall_min: params.f32_or("fallMin", defaults.fall_min),
            fall_max: params.f32_or("fallMax", defaults.fall_max),
            buff_decay_rate: params.f32_or("buffDecayRate", defaults.buff_decay_rate),
            buff: params.buff("buff"),
        }
    }

    /// Position of a fall inside the window, or `None` outside it
    pub fn window_fraction(&self, distance: f32) -> Option<f32> {
        if distance < self.fall_min || distance > self.fall_max {
            return None;
        }
        let span = self.fall_max - self.fall_min;
        if span <= f32::EPSILON {
            return Some(1.0);
        }
        Some((distance - self.fall_min) / span)
    }
}

#[derive(Debug)]
pub struct FallBuff {
    name: String,
    config: FallBuffConfig,
    stacks: Option<StackCounter>,
}

impl FallBuff {
    pub fn new(name: impl Into<String>, config: FallBuffConfig) -> Self {
        Self {
            name: name.into(),
            config,
            stacks: None,
        }
    }

    pub fn config(&self) -> &FallBuffConfig {
        &self.config
    }
}

impl BehaviorModule for FallBuff {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::FallBuff
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
        let Some(buff) = &self.config.buff else {
            return;
        };
        if let Some(graph) = ctx.actor.buffs.get_mut(&buff.id) {
            graph.set_multiplier(graph.multiplier() - self.config.buff_decay_rate * ctx.dt);
        }
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        let HostEvent::Landed { distance } = event else {
            return;
        };
        let (Some(buff), Some(stacks)) = (&self.config.buff, &self.stacks) else {
            return;
        };
        if let Some(fraction) = self.config.window_fraction(*distance) {
            let multiplier = fraction * self.config.buff_multiplier * stacks.amount();
            ctx.actor.buffs.set_multiplier(&buff.id, multiplier);
        }
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.take().is_some() {
            if let Some(buff) = &self.config.buff {
                ctx.actor.buffs.remove(&buff.id);
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
    use crate::testing::{owner, Harness};

    fn module() -> FallBuff {
        FallBuff::new(
            "f",
            FallBuffConfig {
                fall_min: 10.0,
                fall_max: 20.0,
                buff_multiplier: 2.0,
                buff_decay_rate: 0.5,
                buff: Some(BuffGraph::new("daredevil").with_stat("addSpeed", 1.0)),
            },
        )
    }

    fn multiplier(h: &Harness) -> f32 {
        h.actor.buffs.get("daredevil").unwrap().multiplier()
    }

    #[test]
    fn test_landing_in_window_scales_buff() {
        let mut h = Harness::new();
        let mut fall = module();
        fall.initialize(&owner(2), &mut h.ctx(0.0));

        fall.on_event(&HostEvent::Landed { distance: 15.0 }, &mut h.ctx(0.0));
        assert_eq!(multiplier(&h), 2.0);

        fall.update(&mut h.ctx(1.0));
        assert_eq!(multiplier(&h), 1.5);
    }

    #[test]
    fn test_landing_outside_window_ignored() {
        let mut h = Harness::new();
        let mut fall = module();
        fall.initialize(&owner(1), &mut h.ctx(0.0));
        fall.on_event(&HostEvent::Landed { distance: 4.0 }, &mut h.ctx(0.0));
        fall.on_event(&HostEvent::Landed { distance: 25.0 }, &mut h.ctx(0.0));
        assert_eq!(multiplier(&h), 0.0);
    }

    #[test]
    fn test_degenerate_window() {
        let config = FallBuffConfig {
            fall_min: 5.0,
            fall_max: 5.0,
            ..Default::default()
        };
        assert_eq!(config.window_fraction(5.0), Some(1.0));
        assert_eq!(config.window_fraction(6.0), None);
    }
}
