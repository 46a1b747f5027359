//! Perkpack Core - Perk entities and the behavior module seam
//!
//! This crate provides the runtime side of custom perks:
//! - Dynamic value tree for loosely-typed definitions (`Value`, `ValueMap`)
//! - Buff graphs and multiplier curves
//! - The host-state model modules operate on (`Actor`, `Inventory`, `Item`)
//! - Session extension points the host calls into (damage stream, item insertion hooks)
//! - The `BehaviorModule` trait and the `Perk` that drives its modules
//! - `PerkBuilder` and catalog registration
//!
//! ## Host Boundary
//!
//! The host game stays in charge of its own subsystems. It lends state to
//! perks on every call and drains [`Requests`] afterwards:
//!
//! ```text
//! Host frame
//!  ├── session.damage.publish(hit)      → OnDamage listeners
//!  ├── session.insertion.intercept(item) → ItemTransformer hooks
//!  ├── perk.dispatch(event)             → module.on_event
//!  ├── perk.update()                    → module.update
//!  ├── actor.sync_size()                → scale from the addSize stat
//!  └── requests.drain()                 → host applies removals, sounds, spawns
//! ```

mod actor;
mod buff;
mod builder;
mod catalog;
mod curve;
mod error;
mod host;
mod identity;
mod module;
mod perk;
mod session;
mod value;

pub use actor::{Actor, Inventory, Item, ADD_SIZE_STAT};
pub use buff::{BuffGraph, BuffStat, BuffStore, DEFAULT_LOSE_RATE};
pub use builder::PerkBuilder;
pub use catalog::{register_perks, Catalog, PerkCatalog, RegistrationReport};
pub use curve::{Keyframe, MultiplierCurve};
pub use error::{BuildError, Error, Result};
pub use host::{EmptyWorld, HostEvent, HostRequest, Requests, World};
pub use identity::{ItemId, PerkId};
pub use module::{BehaviorModule, ModuleContext, ModuleKind, PerkOwner, StackCounter};
pub use perk::{AssetHandle, Perk, PerkAssets, PerkCategory, SpawnPool, UnlockRequirement};
pub use session::{
    DamageEvent, DamageEvents, DamageListener, InsertionHooks, ItemInterceptor, ListenerId, Session,
};
pub use value::{Value, ValueMap};

pub use glam::{Quat, Vec3};
