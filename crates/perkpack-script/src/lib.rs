//! Perkpack Script - Definition schema and content-package loading
//!
//! Turns folders of perk definitions into registered perks:
//! - Loader configuration (`LoaderConfig`, stored as RON)
//! - Definition parsing (JSON or RON) into the dynamic value tree
//! - Schema mapping into single-perk and collection records
//! - Card image resolution, with built-in frame names
//! - The load pass itself (`PerkLoader`)
//!
//! ```no_run
//! use perkpack_core::Catalog;
//! use perkpack_script::{LoaderConfig, PerkLoader};
//!
//! let mut catalog = Catalog::new();
//! let report = PerkLoader::new(LoaderConfig::default()).load_into(&mut catalog);
//! println!("registered {} perks", report.registration.registered.len());
//! ```

mod assets;
mod config;
mod error;
mod loader;
pub mod schema;

pub use assets::{builtin_frame, AssetLocator, FsImageLoader, ImageLoader, BUILTIN_FRAMES};
pub use config::LoaderConfig;
pub use error::{Error, Result};
pub use loader::{ContentPackage, LoadReport, PerkLoader, SessionPerks};
pub use schema::{
    classify, DefinitionFormat, DefinitionShape, PerkCollectionDefinition, PerkDefinition,
};
