//! The host-owned perk catalog and registration into it

use crate::error::{Error, Result};
use crate::identity::PerkId;
use crate::perk::Perk;
use tracing::{debug, info};

/// What registration needs from a host catalog
///
/// The host keeps ownership of its entries; registration only reads
/// identifiers and appends.
pub trait PerkCatalog {
    /// Case-insensitive identifier lookup
    fn contains_id(&self, id: &str) -> bool;

    /// Append a perk; never called for an identifier already present
    fn append(&mut self, perk: Perk);
}

/// A vector-backed catalog
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    perks: Vec<Perk>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Perk> {
        self.perks.iter().find(|p| p.id().matches(id))
    }

    /// A detached copy of a catalog perk, ready to attach to an actor
    pub fn instantiate(&self, id: &str) -> Result<Perk> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Error::PerkNotFound(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PerkId> {
        self.perks.iter().map(Perk::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Perk> {
        self.perks.iter()
    }

    pub fn len(&self) -> usize {
        self.perks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perks.is_empty()
    }
}

impl PerkCatalog for Catalog {
    fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn append(&mut self, perk: Perk) {
        self.perks.push(perk);
    }
}

/// Outcome of one registration pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub registered: Vec<PerkId>,
    pub skipped: Vec<PerkId>,
}

/// Merge built perks into a catalog, skipping identifiers already present
///
/// Append-only: existing entries are never replaced, and running the same
/// perks through twice registers nothing the second time.
pub fn register_perks<C: PerkCatalog + ?Sized>(
    catalog: &mut C,
    perks: impl IntoIterator<Item = Perk>,
) -> RegistrationReport {
    let mut report = RegistrationReport::default();
    for perk in perks {
        let id = perk.id().clone();
        if catalog.contains_id(id.as_str()) {
            debug!(perk = %id, "perk already present, skipping");
            report.skipped.push(id);
            continue;
        }
        info!(perk = %id, title = perk.title(), "registered perk");
        catalog.append(perk);
        report.registered.push(id);
    }
    if report.registered.is_empty() && report.skipped.is_empty() {
        info!("no custom perks to register");
    } else {
        info!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            "custom perk registration finished"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PerkBuilder;

    fn perk(id: &str) -> Perk {
        PerkBuilder::new().with_id(id).with_title(id).build().unwrap()
    }

    #[test]
    fn test_register_unique_perk() {
        let mut catalog = Catalog::new();
        let report = register_perks(&mut catalog, vec![perk("grip")]);
        assert_eq!(report.registered, vec![PerkId::new("grip")]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_id("GRIP"));
    }

    #[test]
    fn test_duplicates_skipped_case_insensitively() {
        let mut catalog = Catalog::new();
        register_perks(&mut catalog, vec![perk("Grip")]);
        let report = register_perks(&mut catalog, vec![perk("grip"), perk("GRIP")]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("grip").unwrap().id().as_str(), "Grip");
    }

    #[test]
    fn test_registration_idempotent() {
        let mut catalog = Catalog::new();
        let batch = vec![perk("a"), perk("b")];
        register_perks(&mut catalog, batch.clone());
        let again = register_perks(&mut catalog, batch);
        assert!(again.registered.is_empty());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_instantiate() {
        let mut catalog = Catalog::new();
        register_perks(&mut catalog, vec![perk("grip")]);
        assert!(catalog.instantiate("Grip").is_ok());
        assert!(matches!(catalog.instantiate("nope"), Err(Error::PerkNotFound(_))));
    }
}
