//! Shared fixtures for module tests

use perkpack_core::{
    Actor, Item, ItemId, ModuleContext, PerkId, PerkOwner, Requests, Session, StackCounter, Vec3,
    World,
};

/// A world with a prefab counter and axis-aligned walls at fixed z planes
#[derive(Debug, Default)]
pub struct TestWorld {
    next_item: u64,
    pub walls_z: Vec<f32>,
}

impl World for TestWorld {
    fn instantiate_item(&mut self, prefab_id: &str) -> Option<Item> {
        if prefab_id.is_empty() || prefab_id.eq_ignore_ascii_case("Item_Missing") {
            return None;
        }
        self.next_item += 1;
        Some(Item::new(ItemId::new(1_000 + self.next_item), prefab_id))
    }

    fn probe_surface(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let (lo, hi) = if from.z <= to.z { (from.z, to.z) } else { (to.z, from.z) };
        self.walls_z
            .iter()
            .copied()
            .filter(|z| *z > lo && *z <= hi)
            .fold(None, |best: Option<f32>, z| Some(best.map_or(z, |b| b.min(z))))
            .map(|z| Vec3::new(from.x, from.y, z))
    }
}

pub struct Harness {
    pub actor: Actor,
    pub world: TestWorld,
    pub session: Session,
    pub requests: Requests,
    pub frame: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            actor: Actor::default(),
            world: TestWorld::default(),
            session: Session::new(),
            requests: Requests::new(),
            frame: 0,
        }
    }

    /// Context for one call, `dt` seconds after the previous frame
    pub fn ctx(&mut self, dt: f32) -> ModuleContext<'_> {
        self.frame += 1;
        ModuleContext::new(
            &mut self.actor,
            &mut self.world,
            &mut self.session,
            &mut self.requests,
        )
        .at_frame(self.frame, dt)
    }
}

pub fn owner(stacks: u32) -> PerkOwner {
    PerkOwner {
        id: PerkId::new("test_perk"),
        stacks: StackCounter::new(stacks),
    }
}

pub fn item(id: u64, name: &str) -> Item {
    Item::new(ItemId::new(id), name)
}
