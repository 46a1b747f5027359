//! Removes the owning perk after a fixed time

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostRequest, ModuleContext, ModuleKind, PerkId, PerkOwner};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalTimerConfig {
    /// Seconds from attach until removal
    pub remove_time: f32,
}

impl Default for RemovalTimerConfig {
    fn default() -> Self {
        Self { remove_time: 30.0 }
    }
}

impl RemovalTimerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        Self {
            remove_time: params.f32_or("removeTime", defaults.remove_time),
        }
    }
}

#[derive(Debug)]
pub struct RemovalTimer {
    name: String,
    config: RemovalTimerConfig,
    owner: Option<PerkId>,
    remaining: Option<f32>,
}

impl RemovalTimer {
    pub fn new(name: impl Into<String>, config: RemovalTimerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            owner: None,
            remaining: None,
        }
    }

    pub fn config(&self) -> &RemovalTimerConfig {
        &self.config
    }

    /// Seconds left, or `None` when not counting
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }
}

impl BehaviorModule for RemovalTimer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::RemovalTimer
    }

    fn initialize(&mut self, owner: &PerkOwner, _ctx: &mut ModuleContext<'_>) {
        self.owner = Some(owner.id.clone());
        self.remaining = Some(self.config.remove_time);
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        let Some(remaining) = self.remaining.as_mut() else {
            return;
        };
        *remaining -= ctx.dt;
        if *remaining > 0.0 {
            return;
        }
        // Fires once; the host removes the perk when it drains requests
        self.remaining = None;
        if let Some(owner) = self.owner.clone() {
            debug!(perk = %owner, "removal timer expired");
            ctx.requests.push(HostRequest::RemovePerk(owner));
        }
    }

    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {
        self.remaining = None;
        self.owner = None;
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}
