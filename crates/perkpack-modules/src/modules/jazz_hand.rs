//! Ramps a buff on repeated triggers and lets it drain between them

use crate::params::Params;
use perkpack_core::{
    BehaviorModule, BuffGraph, HostEvent, HostRequest, ModuleContext, ModuleKind, PerkOwner,
    StackCounter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct JazzHandConfig {
    /// Grip restored per trigger
    pub restore_grip: f32,
    pub use_buff: bool,
    pub buff_max_multiplier: f32,
    pub buff_multiplier_increase_amount: f32,
    pub buff_decay_rate: f32,
    pub jazz_volume: f32,
    pub buff: Option<BuffGraph>,
}

impl Default for JazzHandConfig {
    fn default() -> Self {
        Self {
            restore_grip: 0.1,
            use_buff: true,
            buff_max_multiplier: 3.0,
            buff_multiplier_increase_amount: 0.5,
            buff_decay_rate: 0.5,
            jazz_volume: 1.0,
            buff: None,
        }
    }
}

impl JazzHandConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            restore_grip: params.f32_or("restoreGrip", defaults.restore_grip),
            use_buff: params.bool_or("useBuff", defaults.use_buff),
            buff_max_multiplier: params.f32_or("buffMaxMultiplier", defaults.buff_max_multiplier),
            buff_multiplier_increase_amount: params.f32_or(
                "buffMultiplierIncreaseAmount",
                defaults.buff_multiplier_increase_amount,
            ),
            buff_decay_rate: params.f32_or("buffDecayRate", defaults.buff_decay_rate),
            jazz_volume: params.f32_or("jazzVolume", defaults.jazz_volume),
            buff: params.buff("buff"),
        }
    }

    fn active_buff(&self) -> Option<&BuffGraph> {
        self.buff.as_ref().filter(|_| self.use_buff)
    }
}

#[derive(Debug)]
pub struct JazzHand {
    name: String,
    config: JazzHandConfig,
    stacks: Option<StackCounter>,
    /// Ramp level before stack scaling, in [0, buff_max_multiplier]
    level: f32,
}

impl JazzHand {
    pub fn new(name: impl Into<String>, config: JazzHandConfig) -> Self {
        Self {
            name: name.into(),
            config,
            stacks: None,
            level: 0.0,
        }
    }

    pub fn config(&self) -> &JazzHandConfig {
        &self.config
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    fn write_level(&self, ctx: &mut ModuleContext<'_>) {
        if let (Some(buff), Some(stacks)) = (self.config.active_buff(), &self.stacks) {
            ctx.actor.buffs.set_multiplier(&buff.id, self.level * stacks.amount());
        }
    }
}

impl BehaviorModule for JazzHand {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::JazzHand
    }

    fn initialize(&mut self, owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        self.stacks = Some(owner.stacks.clone());
        self.level = 0.0;
        if let Some(buff) = self.config.active_buff() {
            let mut buff = buff.clone().held();
            buff.set_multiplier(0.0);
            ctx.actor.buffs.add(buff);
        }
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.is_none() || self.level <= 0.0 {
            return;
        }
        self.level = (self.level - self.config.buff_decay_rate * ctx.dt).max(0.0);
        self.write_level(ctx);
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        if *event != HostEvent::Trigger || self.stacks.is_none() {
            return;
        }
        ctx.actor.restore_grip(self.config.restore_grip);
        if self.config.use_buff {
            self.level = (self.level + self.config.buff_multiplier_increase_amount)
                .min(self.config.buff_max_multiplier);
            self.write_level(ctx);
        }
        ctx.requests.push(HostRequest::PlaySound {
            cue: "jazz".to_string(),
            volume: self.config.jazz_volume,
        });
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.take().is_some() {
            if let Some(buff) = self.config.active_buff() {
                ctx.actor.buffs.remove(&buff.id);
            }
        }
        self.level = 0.0;
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}
