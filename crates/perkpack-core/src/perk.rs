//! The runtime perk entity

use crate::actor::Actor;
use crate::buff::BuffGraph;
use crate::curve::MultiplierCurve;
use crate::host::HostEvent;
use crate::identity::PerkId;
use crate::module::{BehaviorModule, ModuleContext, PerkOwner, StackCounter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Perk category shown on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PerkCategory {
    #[default]
    Standard,
    Orange,
    Red,
    Unstable,
    Peripheral,
    Delta,
    Rho,
}

impl PerkCategory {
    /// Parse a category tag; unknown tags fall back to `Standard`
    pub fn parse_or_default(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "orange" => PerkCategory::Orange,
            "red" => PerkCategory::Red,
            "unstable" => PerkCategory::Unstable,
            "peripheral" => PerkCategory::Peripheral,
            "delta" => PerkCategory::Delta,
            "rho" => PerkCategory::Rho,
            _ => PerkCategory::Standard,
        }
    }
}

/// Which draw pool offers the perk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpawnPool {
    #[default]
    Standard,
    Unstable,
    Never,
}

impl SpawnPool {
    /// Parse a pool tag; unknown tags fall back to `Standard`
    pub fn parse_or_default(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "unstable" => SpawnPool::Unstable,
            "never" => SpawnPool::Never,
            _ => SpawnPool::Standard,
        }
    }
}

/// A resolved image, opaque to the core
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle {
    path: PathBuf,
}

impl AssetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Card imagery
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerkAssets {
    pub icon: Option<AssetHandle>,
    pub card: Option<AssetHandle>,
    pub frame: Option<AssetHandle>,
}

/// Progression gate for unlocking the perk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    pub progression_id: Option<String>,
    pub xp: i64,
}

/// A gameplay modifier: static metadata, buff graphs and behavior modules
///
/// Everything but the stack count and module state is fixed at build time.
pub struct Perk {
    pub(crate) id: PerkId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) flavor_text: Option<String>,
    pub(crate) category: PerkCategory,
    pub(crate) competitive: bool,
    pub(crate) cost: i64,
    pub(crate) spawn_pool: SpawnPool,
    pub(crate) spawn_in_endless: bool,
    pub(crate) can_stack: bool,
    pub(crate) stack_max: u32,
    pub(crate) stacks: StackCounter,
    pub(crate) multiplier_curve: MultiplierCurve,
    pub(crate) buff: Option<BuffGraph>,
    pub(crate) base_buff: Option<BuffGraph>,
    pub(crate) buff_multiplier: f32,
    pub(crate) flags: Vec<String>,
    pub(crate) modules: Vec<Box<dyn BehaviorModule>>,
    pub(crate) assets: PerkAssets,
    pub(crate) unlock: UnlockRequirement,
    pub(crate) attached: bool,
}

impl Perk {
    pub fn id(&self) -> &PerkId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_text.as_deref()
    }

    pub fn category(&self) -> PerkCategory {
        self.category
    }

    pub fn is_competitive(&self) -> bool {
        self.competitive
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn spawn_pool(&self) -> SpawnPool {
        self.spawn_pool
    }

    pub fn spawn_in_endless(&self) -> bool {
        self.spawn_in_endless
    }

    pub fn can_stack(&self) -> bool {
        self.can_stack
    }

    pub fn stack_max(&self) -> u32 {
        self.stack_max
    }

    pub fn stack_count(&self) -> u32 {
        self.stacks.get()
    }

    pub fn multiplier_curve(&self) -> &MultiplierCurve {
        &self.multiplier_curve
    }

    pub fn buff(&self) -> Option<&BuffGraph> {
        self.buff.as_ref()
    }

    pub fn base_buff(&self) -> Option<&BuffGraph> {
        self.base_buff.as_ref()
    }

    pub fn buff_multiplier(&self) -> f32 {
        self.buff_multiplier
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f.eq_ignore_ascii_case(flag))
    }

    pub fn modules(&self) -> &[Box<dyn BehaviorModule>] {
        &self.modules
    }

    pub fn assets(&self) -> &PerkAssets {
        &self.assets
    }

    pub fn unlock(&self) -> &UnlockRequirement {
        &self.unlock
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Multiplier applied to the perk's buff at the current stack count
    pub fn buff_scale(&self) -> f32 {
        let fraction = self.stacks.amount() / self.stack_max.max(1) as f32;
        self.buff_multiplier * self.stacks.amount() * self.multiplier_curve.evaluate(fraction)
    }

    /// Add one stack if stacking is allowed and the cap is not reached
    pub fn add_stack(&mut self, actor: &mut Actor) -> bool {
        if !self.can_stack || self.stacks.get() >= self.stack_max {
            return false;
        }
        self.stacks.set(self.stacks.get() + 1);
        if self.attached {
            if let Some(buff) = &self.buff {
                actor.buffs.set_multiplier(&buff.id, self.buff_scale());
            }
        }
        true
    }

    fn owner(&self) -> PerkOwner {
        PerkOwner {
            id: self.id.clone(),
            stacks: self.stacks.clone(),
        }
    }

    /// Install buffs and initialize every module
    pub fn attach(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.attached {
            return;
        }
        if let Some(base) = &self.base_buff {
            let mut base = base.clone();
            base.set_multiplier(self.buff_multiplier);
            ctx.actor.buffs.add(base);
        }
        if let Some(buff) = &self.buff {
            let mut buff = buff.clone();
            buff.set_multiplier(self.buff_scale());
            ctx.actor.buffs.add(buff);
        }
        let owner = self.owner();
        for module in self.modules.iter_mut() {
            module.initialize(&owner, ctx);
        }
        self.attached = true;
        debug!(perk = %self.id, modules = self.modules.len(), "perk attached");
    }

    /// Advance every module one frame
    pub fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if !self.attached {
            return;
        }
        for module in self.modules.iter_mut() {
            module.update(ctx);
        }
    }

    /// Forward a host event to every module
    pub fn dispatch(&mut self, event: &HostEvent, ctx: &mut ModuleContext<'_>) {
        if !self.attached {
            return;
        }
        for module in self.modules.iter_mut() {
            module.on_event(event, ctx);
        }
    }

    /// Destroy every module and remove installed buffs
    pub fn detach(&mut self, ctx: &mut ModuleContext<'_>) {
        for module in self.modules.iter_mut() {
            module.on_destroy(ctx);
        }
        if self.attached {
            if let Some(buff) = &self.buff {
                ctx.actor.buffs.remove(&buff.id);
            }
            if let Some(base) = &self.base_buff {
                ctx.actor.buffs.remove(&base.id);
            }
        }
        self.attached = false;
        debug!(perk = %self.id, "perk detached");
    }
}

impl Clone for Perk {
    /// Clones start detached, with their own stack count and fresh modules
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            flavor_text: self.flavor_text.clone(),
            category: self.category,
            competitive: self.competitive,
            cost: self.cost,
            spawn_pool: self.spawn_pool,
            spawn_in_endless: self.spawn_in_endless,
            can_stack: self.can_stack,
            stack_max: self.stack_max,
            stacks: self.stacks.detached(),
            multiplier_curve: self.multiplier_curve.clone(),
            buff: self.buff.clone(),
            base_buff: self.base_buff.clone(),
            buff_multiplier: self.buff_multiplier,
            flags: self.flags.clone(),
            modules: self.modules.clone(),
            assets: self.assets.clone(),
            unlock: self.unlock.clone(),
            attached: false,
        }
    }
}

impl fmt::Debug for Perk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perk")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("cost", &self.cost)
            .field("stacks", &self.stacks.get())
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(PerkCategory::parse_or_default("RHO"), PerkCategory::Rho);
        assert_eq!(PerkCategory::parse_or_default("purple"), PerkCategory::Standard);
        assert_eq!(SpawnPool::parse_or_default("Never"), SpawnPool::Never);
        assert_eq!(SpawnPool::parse_or_default(""), SpawnPool::Standard);
    }
}
