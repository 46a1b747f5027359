//! Content-package load pass
//!
//! Discovers package folders under the perks root, reads each definition
//! file once, builds every perk it describes and finally merges the session's
//! perks into a catalog. Nothing here aborts the pass: a failing package,
//! perk or module is logged and skipped.

use crate::assets::{AssetLocator, FsImageLoader, ImageLoader};
use crate::config::LoaderConfig;
use crate::error::Result;
use crate::schema::{classify, DefinitionFormat, DefinitionShape, PerkDefinition};
use perkpack_core::{register_perks, Perk, PerkBuilder, PerkCatalog, PerkId, RegistrationReport};
use perkpack_modules::create_all;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// A folder holding a definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPackage {
    pub dir: PathBuf,
    pub definition: PathBuf,
}

impl ContentPackage {
    /// Folder name, used in logs
    pub fn name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }
}

/// Outcome of one load pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Packages discovered
    pub packages: usize,
    /// Packages that could not be read, parsed or classified
    pub failed_packages: usize,
    /// Perks built this session, in load order
    pub built: Vec<PerkId>,
    /// Perk entries that failed to map or build
    pub failed_perks: usize,
    pub registration: RegistrationReport,
}

/// Perks built in one pass, with the bookkeeping the report needs
#[derive(Debug, Default)]
pub struct SessionPerks {
    pub perks: Vec<Perk>,
    pub packages: usize,
    pub failed_packages: usize,
    pub failed_perks: usize,
}

/// Loads content packages into perks
pub struct PerkLoader<L: ImageLoader = FsImageLoader> {
    config: LoaderConfig,
    images: L,
}

impl PerkLoader<FsImageLoader> {
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_image_loader(config, FsImageLoader)
    }
}

impl<L: ImageLoader> PerkLoader<L> {
    pub fn with_image_loader(config: LoaderConfig, images: L) -> Self {
        Self { config, images }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Find content packages, one level of nesting deep, in sorted order
    pub fn discover(&self) -> Result<Vec<ContentPackage>> {
        let root = &self.config.perks_root;
        if !root.is_dir() {
            if self.config.create_root {
                fs::create_dir_all(root)?;
                info!(path = %root.display(), "created perks directory");
            } else {
                info!(path = %root.display(), "perks directory not found");
            }
            return Ok(Vec::new());
        }

        let frames = self.config.frames_path();
        let mut packages = Vec::new();
        for dir in sorted_subdirs(root)? {
            if dir == frames {
                continue;
            }
            if let Some(definition) = self.config.definition_file_in(&dir) {
                packages.push(ContentPackage { dir, definition });
                continue;
            }
            for nested in sorted_subdirs(&dir)? {
                if let Some(definition) = self.config.definition_file_in(&nested) {
                    packages.push(ContentPackage {
                        dir: nested,
                        definition,
                    });
                }
            }
        }
        info!(count = packages.len(), "discovered content packages");
        Ok(packages)
    }

    /// Read, parse and build one package
    ///
    /// The outer error covers the whole package; per-perk failures come back
    /// individually so the siblings survive.
    pub fn load_package(&self, package: &ContentPackage) -> Result<Vec<Result<Perk>>> {
        let content = fs::read_to_string(&package.definition)?;
        let tree = DefinitionFormat::from_path(&package.definition).parse(&content)?;
        let definitions = match classify(&tree)? {
            DefinitionShape::Single(def) => vec![Ok(def)],
            DefinitionShape::Collection(collection) => {
                info!(
                    collection = collection.label(),
                    author = collection.author.as_deref().unwrap_or("unknown"),
                    version = collection.version.as_deref().unwrap_or("unversioned"),
                    perks = collection.perks.len(),
                    "loading perk collection"
                );
                collection.perks
            }
        };
        Ok(definitions
            .into_iter()
            .map(|def| def.and_then(|def| self.build_perk(&def, &package.dir)))
            .collect())
    }

    /// Build one perk from its definition
    pub fn build_perk(&self, def: &PerkDefinition, package_dir: &Path) -> Result<Perk> {
        let assets = AssetLocator::new(
            &self.images,
            self.config.frames_path(),
            package_dir.join(&self.config.assets_dir),
        );

        let mut builder = PerkBuilder::new()
            .with_id(&def.id)
            .with_title(&def.title)
            .with_description(&def.description)
            .competitive(def.competitive)
            .with_cost(def.cost)
            .spawn_in_endless(def.spawn_in_endless)
            .can_stack(def.can_stack)
            .with_stack_max(def.stack_max)
            .with_buff_multiplier(def.buff_multiplier)
            .with_flags(def.flags.iter().cloned())
            .with_modules(create_all(&def.modules))
            .with_unlock_xp(def.unlock_xp);

        if let Some(flavor) = &def.flavor_text {
            builder = builder.with_flavor_text(flavor);
        }
        if let Some(author) = &def.author {
            builder = builder.with_author(author);
        }
        if let Some(tag) = &def.perk_type {
            builder = builder.with_category_tag(tag);
        }
        if let Some(tag) = &def.spawn_pool {
            builder = builder.with_spawn_pool_tag(tag);
        }
        if let Some(keys) = &def.multiplier_curve_keys {
            builder = builder.with_multiplier_curve_keys(keys);
        }
        if let Some(buff) = &def.buff {
            builder = builder.with_buff(buff.clone());
        }
        if let Some(buff) = &def.base_buff {
            builder = builder.with_base_buff(buff.clone());
        }
        if let Some(handle) = def.icon.as_deref().and_then(|r| assets.resolve_icon(&def.id, r)) {
            builder = builder.with_icon(handle);
        }
        if let Some(handle) = def.perk_card.as_deref().and_then(|r| assets.resolve_card(&def.id, r)) {
            builder = builder.with_card(handle);
        }
        if let Some(handle) = def.perk_frame.as_deref().and_then(|r| assets.resolve_frame(&def.id, r)) {
            builder = builder.with_frame(handle);
        }
        if let Some(progression) = &def.unlock_progression_id {
            builder = builder.with_unlock_progression(progression);
        }

        Ok(builder.build()?)
    }

    /// Build every discovered perk into a session list
    pub fn load_session(&self) -> SessionPerks {
        let mut session = SessionPerks::default();
        let packages = match self.discover() {
            Ok(packages) => packages,
            Err(e) => {
                error!(path = %self.config.perks_root.display(), "Failed to scan perks directory: {}", e);
                return session;
            }
        };
        session.packages = packages.len();

        for package in &packages {
            let results = match self.load_package(package) {
                Ok(results) => results,
                Err(e) => {
                    error!(package = %package.name(), "Failed to load package: {}", e);
                    session.failed_packages += 1;
                    continue;
                }
            };
            for result in results {
                match result {
                    Ok(perk) => {
                        info!(package = %package.name(), perk = %perk.id(), "built perk");
                        session.perks.push(perk);
                    }
                    Err(e) => {
                        error!(package = %package.name(), "Failed to build perk: {}", e);
                        session.failed_perks += 1;
                    }
                }
            }
        }

        if session.perks.is_empty() && session.packages > 0 {
            warn!(packages = session.packages, "no perks could be built");
        }
        session
    }

    /// Full pass: build the session list, then register it
    pub fn load_into<C: PerkCatalog + ?Sized>(&self, catalog: &mut C) -> LoadReport {
        let session = self.load_session();
        let built = session.perks.iter().map(|p| p.id().clone()).collect();
        let registration = register_perks(catalog, session.perks);
        LoadReport {
            packages: session.packages,
            failed_packages: session.failed_packages,
            built,
            failed_perks: session.failed_perks,
            registration,
        }
    }
}

/// Direct child directories, sorted by path
fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perkpack_core::{Catalog, ModuleKind, PerkCategory, SpawnPool};
    use tempfile::TempDir;

    fn package(root: &Path, dir: &str, file: &str, content: &str) -> PathBuf {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
        dir
    }

    fn loader(root: &TempDir) -> PerkLoader {
        PerkLoader::new(LoaderConfig::with_perks_root(root.path()))
    }

    #[test]
    fn test_collection_with_invalid_entry() {
        let root = tempfile::tempdir().unwrap();
        package(
            root.path(),
            "pack",
            "config.json",
            r#"{
                "collectionName": "Pack",
                "perks": [
                    {"id": "grip", "title": "Grip"},
                    {"title": "Nameless"}
                ]
            }"#,
        );

        let mut catalog = Catalog::new();
        let report = loader(&root).load_into(&mut catalog);

        assert_eq!(report.packages, 1);
        assert_eq!(report.failed_perks, 1);
        assert_eq!(report.registration.registered, vec![PerkId::new("grip")]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_single_perk_fields_assets_and_modules() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Frames")).unwrap();
        fs::write(root.path().join("Frames").join("PerkCard_Frame_Timed.png"), b"png").unwrap();
        let dir = package(
            root.path(),
            "rage",
            "config.json",
            r#"{
                "id": "rage",
                "title": "Rage",
                "author": "Ana",
                "perkType": "red",
                "spawnPool": "sideways",
                "canStack": true,
                "stackMax": "3",
                "icon": "icon.png",
                "perkCard": "card.png",
                "perkFrame": "Timed",
                "modules": [
                    {"type": "OnDamage", "parameters": {"applyBuffOnHit": "rage"}},
                    {"type": "Teleporter", "name": "Blink"},
                    {"type": "", "name": "Broken"}
                ]
            }"#,
        );
        fs::create_dir_all(dir.join("Assets")).unwrap();
        fs::write(dir.join("Assets").join("icon.png"), b"png").unwrap();

        let results = loader(&root)
            .load_package(&ContentPackage {
                definition: dir.join("config.json"),
                dir: dir.clone(),
            })
            .unwrap();
        let perk = results.into_iter().next().unwrap().unwrap();

        assert_eq!(perk.category(), PerkCategory::Red);
        assert_eq!(perk.spawn_pool(), SpawnPool::Standard);
        assert_eq!(perk.stack_max(), 3);
        assert_eq!(perk.flavor_text(), Some("Created by Ana"));
        let kinds: Vec<_> = perk.modules().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![ModuleKind::OnDamage, ModuleKind::Generic]);
        assert_eq!(perk.modules()[1].name(), "Blink");
        assert_eq!(
            perk.assets().icon.as_ref().unwrap().path(),
            dir.join("Assets").join("icon.png")
        );
        assert!(perk.assets().card.is_none());
        assert_eq!(
            perk.assets().frame.as_ref().unwrap().path(),
            root.path().join("Frames").join("PerkCard_Frame_Timed.png")
        );
    }

    #[test]
    fn test_discovery_order_and_nesting() {
        let root = tempfile::tempdir().unwrap();
        package(root.path(), "b_pack", "config.json", "{}");
        package(root.path(), "a_pack", "config.ron", "{}");
        package(root.path(), "group/inner", "config.json", "{}");
        package(root.path(), "group/inner/too_deep", "config.json", "{}");
        package(root.path(), "Frames/odd", "config.json", "{}");
        fs::create_dir_all(root.path().join("empty")).unwrap();

        let names: Vec<_> = loader(&root)
            .discover()
            .unwrap()
            .iter()
            .map(ContentPackage::name)
            .collect();
        assert_eq!(names, vec!["a_pack", "b_pack", "inner"]);
    }

    #[test]
    fn test_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let perks_root = root.path().join("Perks");

        let mut config = LoaderConfig::with_perks_root(&perks_root);
        config.create_root = false;
        assert!(PerkLoader::new(config.clone()).discover().unwrap().is_empty());
        assert!(!perks_root.exists());

        config.create_root = true;
        let mut catalog = Catalog::new();
        let report = PerkLoader::new(config).load_into(&mut catalog);
        assert!(perks_root.is_dir());
        assert_eq!(report.packages, 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_bad_packages_do_not_abort() {
        let root = tempfile::tempdir().unwrap();
        package(root.path(), "1_broken", "config.json", "{ not json");
        package(root.path(), "2_shapeless", "config.json", r#"{"name": "?"}"#);
        package(root.path(), "3_empty", "config.json", r#"{"perks": []}"#);
        package(root.path(), "4_zero_stack", "config.json", r#"{"id": "z", "title": "Z", "stackMax": 0}"#);
        package(root.path(), "5_good", "config.ron", r#"{"id": "good", "title": "Good", "cost": 4}"#);

        let session = loader(&root).load_session();
        assert_eq!(session.packages, 5);
        assert_eq!(session.failed_packages, 3);
        assert_eq!(session.failed_perks, 1);
        assert_eq!(session.perks.len(), 1);
        assert_eq!(session.perks[0].cost(), 4);
    }

    #[test]
    fn test_duplicates_and_repeat_loads() {
        let root = tempfile::tempdir().unwrap();
        package(root.path(), "a", "config.json", r#"{"id": "Grip", "title": "Grip A"}"#);
        package(root.path(), "b", "config.json", r#"{"id": "grip", "title": "Grip B"}"#);

        let loader = loader(&root);
        let mut catalog = Catalog::new();
        let first = loader.load_into(&mut catalog);
        assert_eq!(first.built.len(), 2);
        assert_eq!(first.registration.skipped, vec![PerkId::new("grip")]);
        assert_eq!(catalog.get("GRIP").unwrap().title(), "Grip A");

        let second = loader.load_into(&mut catalog);
        assert!(second.registration.registered.is_empty());
        assert_eq!(catalog.len(), 1);
    }
}
