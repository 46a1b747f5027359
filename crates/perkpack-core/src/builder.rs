//! Fluent assembler for [`Perk`]

use crate::buff::BuffGraph;
use crate::curve::MultiplierCurve;
use crate::error::BuildError;
use crate::identity::PerkId;
use crate::module::{BehaviorModule, StackCounter};
use crate::perk::{AssetHandle, Perk, PerkAssets, PerkCategory, SpawnPool, UnlockRequirement};

/// Accumulates perk fields and validates them in [`PerkBuilder::build`]
///
/// # Example
///
/// ```
/// use perkpack_core::{PerkBuilder, PerkCategory};
///
/// let perk = PerkBuilder::new()
///     .with_id("iron_grip")
///     .with_title("Iron Grip")
///     .with_cost(2)
///     .with_category_tag("orange")
///     .build()
///     .unwrap();
/// assert_eq!(perk.category(), PerkCategory::Orange);
/// ```
#[derive(Debug, Clone)]
pub struct PerkBuilder {
    id: Option<String>,
    title: Option<String>,
    description: String,
    flavor_text: Option<String>,
    author: Option<String>,
    category: PerkCategory,
    competitive: bool,
    cost: i64,
    spawn_pool: SpawnPool,
    spawn_in_endless: bool,
    can_stack: bool,
    stack_max: i64,
    multiplier_curve: MultiplierCurve,
    buff: Option<BuffGraph>,
    base_buff: Option<BuffGraph>,
    buff_multiplier: f32,
    flags: Vec<String>,
    modules: Vec<Box<dyn BehaviorModule>>,
    assets: PerkAssets,
    unlock: UnlockRequirement,
}

impl PerkBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            description: String::new(),
            flavor_text: None,
            author: None,
            category: PerkCategory::Standard,
            competitive: true,
            cost: 0,
            spawn_pool: SpawnPool::Standard,
            spawn_in_endless: true,
            can_stack: false,
            stack_max: 1,
            multiplier_curve: MultiplierCurve::flat(),
            buff: None,
            base_buff: None,
            buff_multiplier: 1.0,
            flags: Vec::new(),
            modules: Vec::new(),
            assets: PerkAssets::default(),
            unlock: UnlockRequirement::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_flavor_text(mut self, flavor_text: impl Into<String>) -> Self {
        self.flavor_text = Some(flavor_text.into());
        self
    }

    /// Author credited in the flavor text
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_category(mut self, category: PerkCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_category_tag(self, tag: &str) -> Self {
        self.with_category(PerkCategory::parse_or_default(tag))
    }

    pub fn competitive(mut self, competitive: bool) -> Self {
        self.competitive = competitive;
        self
    }

    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_spawn_pool(mut self, pool: SpawnPool) -> Self {
        self.spawn_pool = pool;
        self
    }

    pub fn with_spawn_pool_tag(self, tag: &str) -> Self {
        self.with_spawn_pool(SpawnPool::parse_or_default(tag))
    }

    pub fn spawn_in_endless(mut self, spawn: bool) -> Self {
        self.spawn_in_endless = spawn;
        self
    }

    pub fn can_stack(mut self, can_stack: bool) -> Self {
        self.can_stack = can_stack;
        self
    }

    pub fn with_stack_max(mut self, stack_max: i64) -> Self {
        self.stack_max = stack_max;
        self
    }

    pub fn with_multiplier_curve(mut self, curve: MultiplierCurve) -> Self {
        self.multiplier_curve = curve;
        self
    }

    /// Control points spread evenly over [0, 1]; fewer than two gives a flat curve
    pub fn with_multiplier_curve_keys(self, keys: &[f32]) -> Self {
        self.with_multiplier_curve(MultiplierCurve::from_values(keys))
    }

    pub fn with_buff(mut self, buff: BuffGraph) -> Self {
        self.buff = Some(buff);
        self
    }

    pub fn with_base_buff(mut self, buff: BuffGraph) -> Self {
        self.base_buff = Some(buff);
        self
    }

    pub fn with_buff_multiplier(mut self, multiplier: f32) -> Self {
        self.buff_multiplier = multiplier;
        self
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.flags.extend(flags);
        self
    }

    pub fn with_module(mut self, module: Box<dyn BehaviorModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = Box<dyn BehaviorModule>>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn with_icon(mut self, icon: AssetHandle) -> Self {
        self.assets.icon = Some(icon);
        self
    }

    pub fn with_card(mut self, card: AssetHandle) -> Self {
        self.assets.card = Some(card);
        self
    }

    pub fn with_frame(mut self, frame: AssetHandle) -> Self {
        self.assets.frame = Some(frame);
        self
    }

    pub fn with_unlock_progression(mut self, progression_id: impl Into<String>) -> Self {
        self.unlock.progression_id = Some(progression_id.into());
        self
    }

    pub fn with_unlock_xp(mut self, xp: i64) -> Self {
        self.unlock.xp = xp;
        self
    }

    /// Flavor text with the author credit appended
    fn composed_flavor_text(&self) -> Option<String> {
        let flavor = self.flavor_text.as_deref().filter(|s| !s.is_empty());
        let author = self.author.as_deref().filter(|s| !s.is_empty());
        match (flavor, author) {
            (Some(flavor), Some(author)) => Some(format!("{flavor}\n\nCreated by {author}")),
            (Some(flavor), None) => Some(flavor.to_string()),
            (None, Some(author)) => Some(format!("Created by {author}")),
            (None, None) => None,
        }
    }

    /// Validate and assemble the perk
    pub fn build(self) -> Result<Perk, BuildError> {
        let flavor_text = self.composed_flavor_text();

        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(BuildError::MissingField("id"))?;
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(BuildError::MissingField("title"))?;
        let stack_max = u32::try_from(self.stack_max)
            .ok()
            .filter(|max| *max >= 1)
            .ok_or(BuildError::InvalidStackMax(self.stack_max))?;

        Ok(Perk {
            id: PerkId::new(id),
            title,
            description: self.description,
            flavor_text,
            category: self.category,
            competitive: self.competitive,
            cost: self.cost,
            spawn_pool: self.spawn_pool,
            spawn_in_endless: self.spawn_in_endless,
            can_stack: self.can_stack,
            stack_max,
            stacks: StackCounter::new(1),
            multiplier_curve: self.multiplier_curve,
            buff: self.buff,
            base_buff: self.base_buff,
            buff_multiplier: self.buff_multiplier,
            flags: self.flags,
            modules: self.modules,
            assets: self.assets,
            unlock: self.unlock,
            attached: false,
        })
    }
}

impl Default for PerkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
