//! Host-side actor state lent to behavior modules
//!
//! The host owns these values and syncs them with its own subsystems; the
//! modules only read and write the fields below.

use crate::buff::BuffStore;
use crate::identity::ItemId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stat whose combined amount grows the actor's scale
pub const ADD_SIZE_STAT: &str = "addSize";

/// A carried item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub tags: Vec<String>,
    /// Placement inside the bag
    pub bag_position: Vec3,
    pub bag_rotation: Quat,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: Vec::new(),
            bag_position: Vec3::ZERO,
            bag_rotation: Quat::IDENTITY,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Case-insensitive tag check
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive substring match on the item name
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name
            .to_ascii_lowercase()
            .contains(&needle.to_ascii_lowercase())
    }
}

/// Hand slots plus bag storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub hands: Vec<Option<Item>>,
    pub bag: Vec<Item>,
}

impl Inventory {
    /// Inventory with the given number of empty hands
    pub fn with_hands(count: usize) -> Self {
        Self {
            hands: vec![None; count],
            bag: Vec::new(),
        }
    }

    pub fn held_items(&self) -> impl Iterator<Item = &Item> {
        self.hands.iter().flatten()
    }

    /// Every carried item, hands first
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.held_items().chain(self.bag.iter())
    }

    pub fn all_items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.hands.iter_mut().flatten().chain(self.bag.iter_mut())
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.all_items().any(|item| item.id == id)
    }

    /// Put an item in the first free hand; hands it back when both are full
    pub fn add_to_hand(&mut self, item: Item) -> Result<usize, Item> {
        match self.hands.iter().position(Option::is_none) {
            Some(slot) => {
                self.hands[slot] = Some(item);
                Ok(slot)
            }
            None => Err(item),
        }
    }

    /// Remove held items matching a predicate
    pub fn take_from_hands(&mut self, mut pred: impl FnMut(&Item) -> bool) -> Vec<Item> {
        let mut taken = Vec::new();
        for slot in self.hands.iter_mut() {
            if slot.as_ref().map(&mut pred).unwrap_or(false) {
                taken.extend(slot.take());
            }
        }
        taken
    }

    /// Remove bag items matching a predicate
    pub fn take_from_bag(&mut self, mut pred: impl FnMut(&Item) -> bool) -> Vec<Item> {
        let (taken, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.bag)
            .into_iter()
            .partition(|item| pred(item));
        self.bag = kept;
        taken
    }

    /// Remove one item by instance id from anywhere
    pub fn take(&mut self, id: ItemId) -> Option<Item> {
        if let Some(slot) = self
            .hands
            .iter_mut()
            .find(|slot| slot.as_ref().map(|i| i.id == id).unwrap_or(false))
        {
            return slot.take();
        }
        let index = self.bag.iter().position(|i| i.id == id)?;
        Some(self.bag.remove(index))
    }

    /// Empty hands and bag
    pub fn drop_all(&mut self) -> Vec<Item> {
        let mut dropped: Vec<Item> = self.hands.iter_mut().filter_map(Option::take).collect();
        dropped.append(&mut self.bag);
        dropped
    }
}

/// The player actor as seen by perks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub health: f32,
    pub max_health: f32,
    /// Grip stamina in [0, 1]
    pub grip: f32,
    pub extra_jumps: u32,
    pub mass_multiplier: f32,
    pub position: Vec3,
    pub facing: Vec3,
    /// Local scale the host mirrors onto the actor transform
    pub scale: Vec3,
    pub buffs: BuffStore,
    pub inventory: Inventory,
    /// Scale captured when a size buff first took effect
    base_scale: Option<Vec3>,
}

impl Actor {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            grip: 1.0,
            extra_jumps: 0,
            mass_multiplier: 1.0,
            position: Vec3::ZERO,
            facing: Vec3::Z,
            scale: Vec3::ONE,
            buffs: BuffStore::new(),
            inventory: Inventory::with_hands(2),
            base_scale: None,
        }
    }

    /// Heal without exceeding max health
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Restore grip without exceeding full grip
    pub fn restore_grip(&mut self, amount: f32) {
        self.grip = (self.grip + amount).clamp(0.0, 1.0);
    }

    /// Apply the combined `addSize` stat to the actor's scale
    ///
    /// Called by the host once per frame after buffs have been updated.
    /// While the stat is positive the scale is `base * (1 + size)`, where
    /// `base` is the scale held when the stat first became positive. Once
    /// the stat drops back to zero the base scale is restored. Returns the
    /// scale after the call.
    pub fn sync_size(&mut self) -> Vec3 {
        let size = self.buffs.stat(ADD_SIZE_STAT);
        if size > 0.0 {
            let base = *self.base_scale.get_or_insert(self.scale);
            self.scale = base * (1.0 + size);
        } else if let Some(base) = self.base_scale.take() {
            self.scale = base;
        }
        self.scale
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffGraph;

    fn item(id: u64, name: &str) -> Item {
        Item::new(ItemId::new(id), name)
    }

    #[test]
    fn test_add_to_hand_fills_free_slots() {
        let mut inv = Inventory::with_hands(2);
        assert_eq!(inv.add_to_hand(item(1, "Item_Rebar")), Ok(0));
        assert_eq!(inv.add_to_hand(item(2, "Item_Piton")), Ok(1));
        let rejected = inv.add_to_hand(item(3, "Item_Food")).unwrap_err();
        assert_eq!(rejected.id, ItemId::new(3));
    }

    #[test]
    fn test_take_and_drop_all() {
        let mut inv = Inventory::with_hands(2);
        inv.add_to_hand(item(1, "Item_Rebar")).unwrap();
        inv.bag.push(item(2, "Item_Food").with_tag("food"));
        inv.bag.push(item(3, "Item_Roach").with_tag("roach"));

        let food = inv.take_from_bag(|i| i.has_tag("FOOD"));
        assert_eq!(food.len(), 1);
        assert!(inv.take(ItemId::new(1)).is_some());
        assert!(!inv.contains(ItemId::new(1)));

        let dropped = inv.drop_all();
        assert_eq!(dropped.len(), 1);
        assert_eq!(inv.all_items().count(), 0);
    }

    #[test]
    fn test_heal_is_capped() {
        let mut actor = Actor::new(50.0);
        actor.health = 10.0;
        actor.heal(100.0);
        assert_eq!(actor.health, 50.0);
    }

    #[test]
    fn test_size_buff_scales_and_restores() {
        let mut actor = Actor::default();
        actor.scale = Vec3::splat(2.0);
        assert_eq!(actor.sync_size(), Vec3::splat(2.0));

        actor
            .buffs
            .add(BuffGraph::new("giant").with_stat(ADD_SIZE_STAT, 0.5).held());
        assert_eq!(actor.sync_size(), Vec3::splat(3.0));
        // Repeated frames scale from the captured base, not the grown scale
        assert_eq!(actor.sync_size(), Vec3::splat(3.0));

        actor.buffs.set_multiplier("giant", 2.0);
        assert_eq!(actor.sync_size(), Vec3::splat(4.0));

        actor.buffs.set_multiplier("giant", 0.0);
        assert_eq!(actor.sync_size(), Vec3::splat(2.0));
        assert_eq!(actor.scale, Vec3::splat(2.0));
    }
}
