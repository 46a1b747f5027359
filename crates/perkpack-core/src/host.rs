//! The narrow interface between perks and the host game
//!
//! Modules reach the host only through three things:
//! - [`World`]: services the host implements (item prefabs, surface probes)
//! - [`HostEvent`]: gameplay events the host forwards to a perk
//! - [`Requests`]: an outbox of [`HostRequest`]s the host drains after each call

use crate::actor::Item;
use crate::identity::PerkId;
use glam::Vec3;

/// Services the host exposes to behavior modules
pub trait World {
    /// Create a fresh item instance from a prefab id such as `Item_Rebar`
    fn instantiate_item(&mut self, prefab_id: &str) -> Option<Item>;

    /// Cast from `from` to `to`; returns the first surface point hit
    fn probe_surface(&self, from: Vec3, to: Vec3) -> Option<Vec3>;
}

/// A world with no prefabs and no geometry
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWorld;

impl World for EmptyWorld {
    fn instantiate_item(&mut self, _prefab_id: &str) -> Option<Item> {
        None
    }

    fn probe_surface(&self, _from: Vec3, _to: Vec3) -> Option<Vec3> {
        None
    }
}

/// Gameplay events the host delivers to perks
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The actor consumed an item that granted the named buff
    Consumed { item: Item, buff_id: Option<String> },
    /// An item entered the inventory
    ItemAdded { item: Item, in_bag: bool },
    /// The hold/drop input fired
    HoldDrop,
    /// The actor landed after falling `distance` units
    Landed { distance: f32 },
    /// The perk's trigger input fired (gesture, ability key)
    Trigger,
}

/// Something a module asks the host to do
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    RemovePerk(PerkId),
    PlaySound { cue: String, volume: f32 },
    CameraShake(f32),
    SpawnObject { position: Vec3 },
    InvokeEat(Item),
    DropItems(Vec<Item>),
    BankItems(Vec<Item>),
}

/// Outbox of host requests
#[derive(Debug, Default, Clone)]
pub struct Requests {
    pending: Vec<HostRequest>,
}

impl Requests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: HostRequest) {
        self.pending.push(request);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostRequest> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hand every pending request to the host
    pub fn drain(&mut self) -> impl Iterator<Item = HostRequest> + '_ {
        self.pending.drain(..)
    }
}
