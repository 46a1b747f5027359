//! Buff graphs and the actor-side buff store

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default decay per unit time for a buff graph
pub const DEFAULT_LOSE_RATE: f32 = 0.1;

/// One stat a buff graph raises, capped at `max_amount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffStat {
    pub stat: String,
    pub max_amount: f32,
}

impl BuffStat {
    pub fn new(stat: impl Into<String>, max_amount: f32) -> Self {
        Self {
            stat: stat.into(),
            max_amount,
        }
    }
}

/// A named bundle of stat caps with a decay policy
///
/// The runtime `multiplier` scales every stat; stat contribution is
/// `max_amount * multiplier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffGraph {
    pub id: String,
    pub description: String,
    pub stats: Vec<BuffStat>,
    /// Multiplier lost per second while decaying
    pub lose_rate: f32,
    /// Whether other perks may scale `lose_rate`
    pub lose_rate_affected_by_perks: bool,
    /// Whether the multiplier decays at all
    pub lose_over_time: bool,
    multiplier: f32,
}

impl BuffGraph {
    /// Create an empty buff graph with default decay policy and a unit multiplier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            stats: Vec::new(),
            lose_rate: DEFAULT_LOSE_RATE,
            lose_rate_affected_by_perks: true,
            lose_over_time: true,
            multiplier: 1.0,
        }
    }

    /// Add a stat cap
    pub fn with_stat(mut self, stat: impl Into<String>, max_amount: f32) -> Self {
        self.stats.push(BuffStat::new(stat, max_amount));
        self
    }

    /// Map a definition tree node onto a buff graph
    ///
    /// Returns `None` when the node is not a map. Every field is optional:
    /// mistyped fields keep their defaults, and stat entries that are not
    /// maps are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_map()?;
        let mut buff = BuffGraph::new(
            map.get("id")
                .and_then(Value::coerce_string)
                .unwrap_or_default(),
        );
        if let Some(desc) = map.get("desc").and_then(Value::coerce_string) {
            buff.description = desc;
        }
        if let Some(rate) = map.get("loseRate").and_then(Value::coerce_f64) {
            buff.lose_rate = rate as f32;
        }
        if let Some(affected) = map
            .get("loseRateEffectedByPerks")
            .or_else(|| map.get("loseRateAffectedByPerks"))
            .and_then(Value::coerce_bool)
        {
            buff.lose_rate_affected_by_perks = affected;
        }
        if let Some(over_time) = map.get("loseOverTime").and_then(Value::coerce_bool) {
            buff.lose_over_time = over_time;
        }
        if let Some(stats) = map.get("buffs").and_then(Value::as_list) {
            buff.stats = stats
                .iter()
                .filter_map(Value::as_map)
                .map(|stat| BuffStat {
                    stat: stat
                        .get("id")
                        .and_then(Value::coerce_string)
                        .unwrap_or_default(),
                    max_amount: stat
                        .get("maxAmount")
                        .and_then(Value::coerce_f64)
                        .unwrap_or(0.0) as f32,
                })
                .collect();
        }
        Some(buff)
    }

    /// Disable decay; the owner drives the multiplier
    pub fn held(mut self) -> Self {
        self.lose_over_time = false;
        self
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier.max(0.0);
    }

    /// Contribution of this graph to one stat
    pub fn amount(&self, stat: &str) -> f32 {
        self.stats
            .iter()
            .filter(|s| s.stat == stat)
            .map(|s| s.max_amount * self.multiplier)
            .sum()
    }

    /// Apply one step of decay
    pub fn decay(&mut self, dt: f32, rate_scale: f32) {
        if !self.lose_over_time {
            return;
        }
        let scale = if self.lose_rate_affected_by_perks {
            rate_scale
        } else {
            1.0
        };
        self.set_multiplier(self.multiplier - self.lose_rate * scale * dt);
    }
}

/// The buffs currently applied to an actor, keyed by buff id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffStore {
    buffs: IndexMap<String, BuffGraph>,
    /// Factor applied to decay of perk-modifiable buffs
    pub lose_rate_scale: f32,
}

impl BuffStore {
    pub fn new() -> Self {
        Self {
            buffs: IndexMap::new(),
            lose_rate_scale: 1.0,
        }
    }

    /// Insert a buff graph, replacing any graph with the same id
    pub fn add(&mut self, buff: BuffGraph) {
        self.buffs.insert(buff.id.clone(), buff);
    }

    /// Insert the graph only if its id is free; returns the stored graph
    pub fn get_or_add(&mut self, buff: BuffGraph) -> &mut BuffGraph {
        self.buffs.entry(buff.id.clone()).or_insert(buff)
    }

    pub fn get(&self, id: &str) -> Option<&BuffGraph> {
        self.buffs.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut BuffGraph> {
        self.buffs.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.buffs.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<BuffGraph> {
        self.buffs.shift_remove(id)
    }

    /// Set a graph's multiplier; returns false when the graph is absent
    pub fn set_multiplier(&mut self, id: &str, multiplier: f32) -> bool {
        match self.buffs.get_mut(id) {
            Some(buff) => {
                buff.set_multiplier(multiplier);
                true
            }
            None => false,
        }
    }

    /// Total of a stat across all graphs
    pub fn stat(&self, stat: &str) -> f32 {
        self.buffs.values().map(|b| b.amount(stat)).sum()
    }

    /// Decay every graph that loses value over time
    pub fn tick(&mut self, dt: f32) {
        let scale = self.lose_rate_scale;
        for buff in self.buffs.values_mut() {
            buff.decay(dt, scale);
        }
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuffGraph> {
        self.buffs.values()
    }
}

impl Default for BuffStore {
    fn default() -> Self {
        Self::new()
    }
}
