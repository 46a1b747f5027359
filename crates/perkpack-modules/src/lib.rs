//! Perkpack Modules - The behavior module catalog
//!
//! Every module variant a perk definition can name, plus the factory that
//! turns a loose [`ModuleDefinition`] into a boxed [`BehaviorModule`].
//!
//! Parameters are read leniently: a missing or mistyped value keeps that
//! field's default and never rejects the module.
//!
//! ```
//! use perkpack_modules::{create, ModuleDefinition};
//! use perkpack_core::ModuleKind;
//!
//! let def = ModuleDefinition::new("removaltimer").with_parameter("removeTime", 12.0);
//! let module = create(&def).unwrap();
//! assert_eq!(module.kind(), ModuleKind::RemovalTimer);
//! ```
//!
//! [`BehaviorModule`]: perkpack_core::BehaviorModule

mod error;
mod factory;
pub mod modules;
mod params;

#[cfg(test)]
mod testing;

pub use error::{ModuleError, Result};
pub use factory::{create, create_all, try_create, ModuleDefinition};
pub use modules::*;
pub use params::Params;
