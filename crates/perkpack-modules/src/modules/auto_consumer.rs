//! Eats a carried item automatically when a condition trips

use crate::params::Params;
use perkpack_core::{
    Actor, BehaviorModule, BuffGraph, HostRequest, ModuleContext, ModuleKind, PerkOwner,
    StackCounter,
};
use tracing::debug;

/// Health fraction below which `LowHealth` trips
pub const LOW_HEALTH_FRACTION: f32 = 0.25;

/// When the module eats on the actor's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsumptionReason {
    /// Grip stamina ran out
    #[default]
    GripDepleted,
    /// Health fell below a quarter of max
    LowHealth,
}

impl ConsumptionReason {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "gripdepleted" => Some(ConsumptionReason::GripDepleted),
            "lowhealth" => Some(ConsumptionReason::LowHealth),
            _ => None,
        }
    }

    pub fn is_met(&self, actor: &Actor) -> bool {
        match self {
            ConsumptionReason::GripDepleted => actor.grip <= 0.0,
            ConsumptionReason::LowHealth => actor.health < actor.max_health * LOW_HEALTH_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoConsumerConfig {
    pub reason: ConsumptionReason,
    pub item_tag: String,
    pub restore_grip: f32,
    /// Buff multiplier lost per second after a consume
    pub buff_decay_rate: f32,
    pub consume_shake: f32,
    /// Hand the item to the host's eat routine instead of consuming it here
    pub invoke_on_eat: bool,
    pub buff: Option<BuffGraph>,
}

impl Default for AutoConsumerConfig {
    fn default() -> Self {
        Self {
            reason: ConsumptionReason::default(),
            item_tag: "food".to_string(),
            restore_grip: 1.0,
            buff_decay_rate: 0.1,
            consume_shake: 0.5,
            invoke_on_eat: false,
            buff: None,
        }
    }
}

impl AutoConsumerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            reason: params
                .string("consumptionReason")
                .and_then(|tag| ConsumptionReason::parse(&tag))
                .unwrap_or(defaults.reason),
            item_tag: params.string_or("itemTag", &defaults.item_tag),
            restore_grip: params.f32_or("restoreGrip", defaults.restore_grip),
            buff_decay_rate: params.f32_or("buffDecayRate", defaults.buff_decay_rate),
            consume_shake: params.f32_or("consumeShake", defaults.consume_shake),
            invoke_on_eat: params.bool_or("invokeOnEat", defaults.invoke_on_eat),
            buff: params.buff("buff"),
        }
    }
}

#[derive(Debug)]
pub struct AutoConsumer {
    name: String,
    config: AutoConsumerConfig,
    stacks: Option<StackCounter>,
    /// Condition state on the previous frame
    tripped: bool,
    consumed: u32,
}

impl AutoConsumer {
    pub fn new(name: impl Into<String>, config: AutoConsumerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            stacks: None,
            tripped: false,
            consumed: 0,
        }
    }

    pub fn config(&self) -> &AutoConsumerConfig {
        &self.config
    }

    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    fn consume(&mut self, ctx: &mut ModuleContext<'_>) {
        let tag = &self.config.item_tag;
        let inventory = &mut ctx.actor.inventory;
        let mut eaten = inventory.take_from_bag(|item| item.has_tag(tag));
        if eaten.is_empty() {
            eaten = inventory.take_from_hands(|item| item.has_tag(tag));
        }
        let mut eaten = eaten.into_iter();
        let Some(item) = eaten.next() else {
            return;
        };
        // Only one item is eaten; the rest go back in the bag
        ctx.actor.inventory.bag.extend(eaten);

        self.consumed += 1;
        debug!(item = %item.id, reason = ?self.config.reason, "auto consumed item");
        ctx.actor.restore_grip(self.config.restore_grip);
        if let (Some(buff), Some(stacks)) = (&self.config.buff, &self.stacks) {
            ctx.actor.buffs.set_multiplier(&buff.id, stacks.amount());
        }
        if self.config.consume_shake > 0.0 {
            ctx.requests.push(HostRequest::CameraShake(self.config.consume_shake));
        }
        if self.config.invoke_on_eat {
            ctx.requests.push(HostRequest::InvokeEat(item));
        }
    }
}

impl BehaviorModule for AutoConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::AutoConsumer
    }

    fn initialize(&mut self, owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        self.stacks = Some(owner.stacks.clone());
        self.tripped = self.config.reason.is_met(ctx.actor);
        if let Some(buff) = &self.config.buff {
            let mut buff = buff.clone().held();
            buff.set_multiplier(0.0);
            ctx.actor.buffs.add(buff);
        }
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.is_none() {
            return;
        }
        if let Some(buff) = &self.config.buff {
            if let Some(graph) = ctx.actor.buffs.get_mut(&buff.id) {
                let decayed = graph.multiplier() - self.config.buff_decay_rate * ctx.dt;
                graph.set_multiplier(decayed);
            }
        }
        let met = self.config.reason.is_met(ctx.actor);
        if met && !self.tripped {
            self.consume(ctx);
        }
        self.tripped = met;
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.stacks.take().is_some() {
            if let Some(buff) = &self.config.buff {
                ctx.actor.buffs.remove(&buff.id);
            }
        }
        self.tripped = false;
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}
