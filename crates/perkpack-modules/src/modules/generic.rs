//! Inert stand-in for unrecognized module types

use perkpack_core::{BehaviorModule, ModuleKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericModule {
    name: String,
}

impl GenericModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BehaviorModule for GenericModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Generic
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(self.clone())
    }
}
