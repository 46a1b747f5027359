//! Periodically places objects on surfaces ahead of the actor

use crate::params::Params;
use perkpack_core::{BehaviorModule, HostRequest, ModuleContext, ModuleKind, PerkOwner, Vec3};
use tracing::trace;

/// Upper bound on surface probes per spawn attempt
pub const MAX_PROBE_STEPS: u32 = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpawnerConfig {
    /// Seconds between spawn attempts
    pub spawn_frequency: f32,
    /// Upper bound on objects placed per attempt
    pub number_to_spawn: u32,
    /// Minimum separation between placed objects
    pub minimum_distance: f32,
    pub check_step_distance: f32,
    /// Pull-back from the surface hit toward the actor
    pub hit_offset: f32,
    pub max_check_distance: f32,
}

impl Default for ObjectSpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_frequency: 10.0,
            number_to_spawn: 1,
            minimum_distance: 5.0,
            check_step_distance: 1.0,
            hit_offset: 0.1,
            max_check_distance: 20.0,
        }
    }
}

impl ObjectSpawnerConfig {
    pub fn from_params(params: &Params<'_>) -> Self {
        let defaults = Self::default();
        let step = params.f32_or("checkStepDistance", defaults.check_step_distance);
        Self {
            spawn_frequency: params.f32_or("spawnFrequency", defaults.spawn_frequency),
            number_to_spawn: params.u32_or("numberToSpawn", defaults.number_to_spawn),
            minimum_distance: params.f32_or("minimumDistance", defaults.minimum_distance),
            check_step_distance: if step > 0.0 {
                step
            } else {
                defaults.check_step_distance
            },
            hit_offset: params.f32_or("hitOffset", defaults.hit_offset),
            max_check_distance: params.f32_or("maxCheckDistance", defaults.max_check_distance),
        }
    }
}

#[derive(Debug)]
pub struct ObjectSpawner {
    name: String,
    config: ObjectSpawnerConfig,
    active: bool,
    elapsed: f32,
    placed: Vec<Vec3>,
}

impl ObjectSpawner {
    pub fn new(name: impl Into<String>, config: ObjectSpawnerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            active: false,
            elapsed: 0.0,
            placed: Vec::new(),
        }
    }

    pub fn config(&self) -> &ObjectSpawnerConfig {
        &self.config
    }

    /// Positions placed since attach
    pub fn placed(&self) -> &[Vec3] {
        &self.placed
    }

    /// Forget positions no candidate from `origin` can come near
    fn prune_placed(&mut self, origin: Vec3) {
        let reach = self.config.max_check_distance.max(0.0) + self.config.minimum_distance;
        self.placed.retain(|p| p.distance(origin) <= reach);
    }

    fn is_clear(&self, candidate: Vec3) -> bool {
        self.placed
            .iter()
            .all(|p| p.distance(candidate) >= self.config.minimum_distance)
    }

    /// Walk forward in fixed steps and place up to `number_to_spawn` objects
    ///
    /// The walk is split into at most [`MAX_PROBE_STEPS`] segments; a step
    /// too small for that budget is widened to fit.
    fn spawn_burst(&mut self, ctx: &mut ModuleContext<'_>) -> u32 {
        let dir = ctx.actor.facing.normalize_or_zero();
        let max_distance = self.config.max_check_distance;
        if dir == Vec3::ZERO || !(max_distance > 0.0 && max_distance.is_finite()) {
            return 0;
        }
        let origin = ctx.actor.position;
        self.prune_placed(origin);

        let step = self
            .config
            .check_step_distance
            .max(max_distance / MAX_PROBE_STEPS as f32);
        let steps = (max_distance / step).ceil().clamp(1.0, MAX_PROBE_STEPS as f32) as u32;
        let mut spawned = 0;
        for i in 0..steps {
            if spawned >= self.config.number_to_spawn {
                break;
            }
            let from = step * i as f32;
            let to = if i + 1 == steps {
                max_distance
            } else {
                (step * (i + 1) as f32).min(max_distance)
            };
            let Some(hit) = ctx.world.probe_surface(origin + dir * from, origin + dir * to) else {
                continue;
            };
            let candidate = hit - dir * self.config.hit_offset;
            if !self.is_clear(candidate) {
                trace!(?candidate, "spawn point too close to a placed object");
                continue;
            }
            self.placed.push(candidate);
            ctx.requests.push(HostRequest::SpawnObject { position: candidate });
            spawned += 1;
        }
        spawned
    }
}

impl BehaviorModule for ObjectSpawner {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::ObjectSpawner
    }

    fn initialize(&mut self, _owner: &PerkOwner, _ctx: &mut ModuleContext<'_>) {
        self.active = true;
        self.elapsed = 0.0;
    }

    fn update(&mut self, ctx: &mut ModuleContext<'_>) {
        if !self.active || self.config.spawn_frequency <= 0.0 {
            return;
        }
        self.elapsed += ctx.dt;
        if self.elapsed < self.config.spawn_frequency {
            return;
        }
        self.elapsed -= self.config.spawn_frequency;
        self.spawn_burst(ctx);
    }

    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {
        self.active = false;
        self.placed.clear();
    }

    fn clone_module(&self) -> Box<dyn BehaviorModule> {
        Box::new(Self::new(self.name.clone(), self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{owner, Harness};

    fn spawner() -> ObjectSpawner {
        ObjectSpawner::new(
            "s",
            ObjectSpawnerConfig {
                spawn_frequency: 1.0,
                number_to_spawn: 3,
                minimum_distance: 2.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_spawns_on_period_with_separation() {
        let mut h = Harness::new();
        h.world.walls_z = vec![3.0, 6.0, 6.5];
        let mut module = spawner();
        module.initialize(&owner(1), &mut h.ctx(0.0));

        module.update(&mut h.ctx(0.5));
        assert!(h.requests.is_empty());

        module.update(&mut h.ctx(0.5));
        let z: Vec<f32> = module.placed().iter().map(|p| p.z).collect();
        assert_eq!(z.len(), 2);
        assert!((z[0] - 2.9).abs() < 1e-5);
        assert!((z[1] - 5.9).abs() < 1e-5);
        assert_eq!(h.requests.len(), 2);

        // Same geometry, every point already taken
        module.update(&mut h.ctx(1.0));
        assert_eq!(h.requests.len(), 2);
    }

    #[test]
    fn test_nothing_in_range() {
        let mut h = Harness::new();
        h.world.walls_z = vec![25.0];
        let mut module = spawner();
        module.initialize(&owner(1), &mut h.ctx(0.0));
        module.update(&mut h.ctx(1.0));
        assert!(module.placed().is_empty());
    }

    #[test]
    fn test_idle_until_initialized() {
        let mut h = Harness::new();
        h.world.walls_z = vec![3.0];
        let mut module = spawner();
        module.update(&mut h.ctx(5.0));
        assert!(h.requests.is_empty());
    }

    #[test]
    fn test_tiny_step_is_bounded() {
        let mut h = Harness::new();
        h.world.walls_z = vec![15.0];
        let mut module = ObjectSpawner::new(
            "s",
            ObjectSpawnerConfig {
                spawn_frequency: 1.0,
                check_step_distance: 1e-7,
                ..Default::default()
            },
        );
        module.initialize(&owner(1), &mut h.ctx(0.0));
        module.update(&mut h.ctx(1.0));
        assert_eq!(module.placed().len(), 1);
        assert!((module.placed()[0].z - 14.9).abs() < 1e-4);
    }

    #[test]
    fn test_far_positions_are_forgotten() {
        let mut h = Harness::new();
        h.world.walls_z = vec![3.0];
        let mut module = spawner();
        module.initialize(&owner(1), &mut h.ctx(0.0));
        module.update(&mut h.ctx(1.0));
        assert_eq!(module.placed().len(), 1);

        // Well past max_check_distance + minimum_distance from the first spot
        h.actor.position = Vec3::new(0.0, 0.0, -100.0);
        h.world.walls_z = vec![-95.0];
        module.update(&mut h.ctx(1.0));
        assert_eq!(module.placed().len(), 1);
        assert!((module.placed()[0].z + 95.1).abs() < 1e-4);
    }
}
