//! BehaviorModule trait - the seam between a perk and its per-tick behavior
//!
//! A perk owns its modules and drives them through one lifecycle:
//! `initialize` once at attach, `update` once per frame, `on_event` for host
//! events, `on_destroy` once at detach. Modules never own the host; everything
//! they touch arrives through [`ModuleContext`].

use crate::actor::Actor;
use crate::host::{HostEvent, Requests, World};
use crate::identity::PerkId;
use crate::session::Session;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Stack count shared between a perk and the modules it owns
///
/// Event handlers run outside the perk's own update, so they read the stack
/// count through this handle rather than through the perk.
#[derive(Debug, Clone)]
pub struct StackCounter(Rc<Cell<u32>>);

impl StackCounter {
    pub fn new(initial: u32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    pub fn set(&self, value: u32) {
        self.0.set(value);
    }

    /// Stack count as a multiplier
    pub fn amount(&self) -> f32 {
        self.0.get() as f32
    }

    /// A counter with the same value but no shared state
    pub fn detached(&self) -> Self {
        Self::new(self.get())
    }
}

/// What a module knows about the perk it is attached to
#[derive(Debug, Clone)]
pub struct PerkOwner {
    pub id: PerkId,
    pub stacks: StackCounter,
}

/// Host state lent to a module for one call
pub struct ModuleContext<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    pub frame: u64,
    pub actor: &'a mut Actor,
    pub world: &'a mut dyn World,
    pub session: &'a mut Session,
    pub requests: &'a mut Requests,
}

impl<'a> ModuleContext<'a> {
    pub fn new(
        actor: &'a mut Actor,
        world: &'a mut dyn World,
        session: &'a mut Session,
        requests: &'a mut Requests,
    ) -> Self {
        Self {
            dt: 0.0,
            frame: 0,
            actor,
            world,
            session,
            requests,
        }
    }

    /// Set the frame timing for an update call
    pub fn at_frame(mut self, frame: u64, dt: f32) -> Self {
        self.frame = frame;
        self.dt = dt;
        self
    }
}

/// The closed set of module variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    RemovalTimer,
    ConsumeBuff,
    RoachBanker,
    BuffFromInventory,
    HoldDrop,
    AutoConsumer,
    FallBuff,
    HungerMeter,
    JazzHand,
    MassController,
    ObjectSpawner,
    ItemRemover,
    ItemTransformer,
    OnDamage,
    /// Inert fallback for unrecognized type tags
    Generic,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 15] = [
        ModuleKind::RemovalTimer,
        ModuleKind::ConsumeBuff,
        ModuleKind::RoachBanker,
        ModuleKind::BuffFromInventory,
        ModuleKind::HoldDrop,
        ModuleKind::AutoConsumer,
        ModuleKind::FallBuff,
        ModuleKind::HungerMeter,
        ModuleKind::JazzHand,
        ModuleKind::MassController,
        ModuleKind::ObjectSpawner,
        ModuleKind::ItemRemover,
        ModuleKind::ItemTransformer,
        ModuleKind::OnDamage,
        ModuleKind::Generic,
    ];

    /// Canonical type tag, also the default display name
    pub fn tag(&self) -> &'static str {
        match self {
            ModuleKind::RemovalTimer => "RemovalTimer",
            ModuleKind::ConsumeBuff => "ConsumeBuff",
            ModuleKind::RoachBanker => "RoachBanker",
            ModuleKind::BuffFromInventory => "BuffFromInventory",
            ModuleKind::HoldDrop => "HoldDrop",
            ModuleKind::AutoConsumer => "AutoConsumer",
            ModuleKind::FallBuff => "FallBuff",
            ModuleKind::HungerMeter => "HungerMeter",
            ModuleKind::JazzHand => "JazzHand",
            ModuleKind::MassController => "MassController",
            ModuleKind::ObjectSpawner => "ObjectSpawner",
            ModuleKind::ItemRemover => "ItemRemover",
            ModuleKind::ItemTransformer => "ItemTransformer",
            ModuleKind::OnDamage => "OnDamage",
            ModuleKind::Generic => "Generic",
        }
    }

    /// Case-insensitive lookup of a type tag; `Generic` is never matched
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|kind| *kind != ModuleKind::Generic)
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag.trim()))
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A per-tick state machine attached to one perk
pub trait BehaviorModule: fmt::Debug {
    /// Display name
    fn name(&self) -> &str;

    fn kind(&self) -> ModuleKind;

    /// Bind to the owning perk; register with session extension points here
    fn initialize(&mut self, _owner: &PerkOwner, _ctx: &mut ModuleContext<'_>) {}

    /// Advance one frame
    fn update(&mut self, _ctx: &mut ModuleContext<'_>) {}

    /// React to a host event
    fn on_event(&mut self, _event: &HostEvent, _ctx: &mut ModuleContext<'_>) {}

    /// Release everything acquired in `initialize`
    ///
    /// Must be safe to call on a module that was never initialized.
    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {}

    /// Fresh, uninitialized copy with the same configuration
    fn clone_module(&self) -> Box<dyn BehaviorModule>;
}

impl Clone for Box<dyn BehaviorModule> {
    fn clone(&self) -> Self {
        self.clone_module()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag_case_insensitive() {
        assert_eq!(ModuleKind::from_tag("ondamage"), Some(ModuleKind::OnDamage));
        assert_eq!(ModuleKind::from_tag("ITEMTRANSFORMER"), Some(ModuleKind::ItemTransformer));
        assert_eq!(ModuleKind::from_tag("generic"), None);
        assert_eq!(ModuleKind::from_tag("teleporter"), None);
    }

    #[test]
    fn test_stack_counter_shared() {
        let counter = StackCounter::new(1);
        let view = counter.clone();
        counter.set(3);
        assert_eq!(view.amount(), 3.0);

        let detached = counter.detached();
        counter.set(4);
        assert_eq!(detached.get(), 3);
    }
}
