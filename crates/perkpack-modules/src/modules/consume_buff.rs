//! Clears buffs and grants extra jumps when the actor eats

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostEvent, HostRequest, Item, ModuleContext, ModuleKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeBuffConfig {
    /// Buff ids (or item tags) that count as a consume
    pub consume_buff_ids: Vec<String>,
    pub extra_jumps: u32,
    /// Add jumps on each consume instead of topping up to `extra_jumps`
    pub can_stack: bool,
    pub audio_volume: f32,
}

impl Default for ConsumeBuffConfig {
    fn default() -> Self {
        Self {
            consume_buff_ids: vec!["food".to_string()],
            extra_jumps: 0,
            can_stack: false,
            audio_volume: 1.0,
        }
    }
}

impl ConsumeBuffConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        let ids: Vec<&str> = defaults.consume_buff_ids.iter().map(String::as_str).collect();
        Self {
            consume_buff_ids: params.string_list_or("consumeBuffIDs", &ids),
            extra_jumps: params.u32_or("addExtraJumpOnConsume", defaults.extra_jumps),
            can_stack: params.bool_or("canStack", defaults.can_stack),
            audio_volume: params.f32_or("audioVolume", defaults.audio_volume),
        }
    }

    fn matches(&self, item: &Item, buff_id: Option<&str>) -> bool {
        self.consume_buff_ids.iter().any(|id| {
            buff_id.is_some_and(|b| b.eq_ignore_ascii_case(id)) || item.has_tag(id)
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConsumeBuff {
    name: String,
    config: ConsumeBuffConfig,
}

impl ConsumeBuff {
    pub fn new(name: impl Into<String>, config: ConsumeBuffConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &ConsumeBuffConfig {
        &self.config
    }
}

impl BehaviorModule for ConsumeBuff {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::ConsumeBuff
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        let HostEvent::Consumed { item, buff_id } = event else {
            return;
        };
        if !self.config.matches(item, buff_id.as_deref()) {
            return;
        }
        for id in &self.config.consume_buff_ids {
            ctx.actor.buffs.remove(id);
        }
        if self.config.extra_jumps > 0 {
            let jumps = &mut ctx.actor.extra_jumps;
            *jumps = if self.config.can_stack {
                jumps.saturating_add(self.config.extra_jumps)
            } else {
                (*jumps).max(self.config.extra_jumps)
            };
        }
        ctx.requests.push(HostRequest::PlaySound {
            cue: "consume".to_string(),
            volume: self.config.audio_volume,
        });
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(self.clone())
    }
}
