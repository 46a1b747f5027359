//! Scales the actor's physical mass while attached

use crate::params::Params;
use perkpack_core::{BehaviorModule, ModuleContext, ModuleKind, PerkOwner};

#[derive(Debug, Clone, PartialEq)]
pub struct MassControllerConfig {
    pub mass_mult: f32,
}

impl Default for MassControllerConfig {
    fn default() -> Self {
        Self { mass_mult: 1.0 }
    }
}

impl MassControllerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        Self {
            mass_mult: params.f32_or("massMult", Self::default().mass_mult),
        }
    }
}

#[derive(Debug)]
pub struct MassController {
    name: String,
    config: MassControllerConfig,
    applied: bool,
}

impl MassController {
    pub fn new(name: impl Into<String>, config: MassControllerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            applied: false,
        }
    }

    pub fn config(&self) -> &MassControllerConfig {
        &self.config
    }
}

impl BehaviorModule for MassController {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::MassController
    }

    fn initialize(&mut self, _owner: &PerkOwner, ctx: &mut ModuleContext<'_>) {
        // A zero factor could never be undone
        if self.applied || self.config.mass_mult <= 0.0 {
            return;
        }
        ctx.actor.mass_multiplier *= self.config.mass_mult;
        self.applied = true;
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.applied {
            ctx.actor.mass_multiplier /= self.config.mass_mult;
            self.applied = false;
        }
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}
