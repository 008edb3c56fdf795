//! Entity and component storage.
//!
//! [`World`] wraps a `hecs::World` and adds the simulation-specific pieces:
//! world bounds, configuration, a seeded RNG and the spawn/despawn paths that
//! keep graphics buffers in step with entity lifetimes.

use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::spatial_hash::SpatialHash;
use ecosim_data::{Living, Species};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod spawn;

/// Current goal of a seeking organism, written by the targeting system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Idle,
    Food(hecs::Entity),
    Mate(hecs::Entity),
}

impl Target {
    pub fn entity(&self) -> Option<hecs::Entity> {
        match *self {
            Target::Idle => None,
            Target::Food(e) | Target::Mate(e) => Some(e),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Target::Idle)
    }
}

/// Living organisms per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub grass: usize,
    pub lemmings: usize,
    pub foxes: usize,
}

impl PopulationStats {
    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Grass => self.grass,
            Species::Lemming => self.lemmings,
            Species::Fox => self.foxes,
        }
    }

    pub fn total(&self) -> usize {
        self.grass + self.lemmings + self.foxes
    }

    fn add(&mut self, species: Species) {
        match species {
            Species::Grass => self.grass += 1,
            Species::Lemming => self.lemmings += 1,
            Species::Fox => self.foxes += 1,
        }
    }
}

pub struct World {
    pub ecs: hecs::World,
    pub width: f32,
    pub height: f32,
    pub tick: u64,
    pub config: AppConfig,
    pub rng: ChaCha8Rng,
    pub(crate) spatial_hash: SpatialHash,
}

impl World {
    pub fn new(config: AppConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            ecs: hecs::World::new(),
            width: config.world.width,
            height: config.world.height,
            tick: 0,
            spatial_hash: SpatialHash::new(
                config.world.cell_size,
                config.world.width,
                config.world.height,
            ),
            config,
            rng,
        })
    }

    pub fn len(&self) -> usize {
        self.ecs.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.ecs.is_empty()
    }

    pub fn contains(&self, entity: hecs::Entity) -> bool {
        self.ecs.contains(entity)
    }

    pub fn component<C: hecs::Component>(&self, entity: hecs::Entity) -> Result<hecs::Ref<'_, C>> {
        self.ecs.get::<&C>(entity).map_err(SimError::from_hecs::<C>)
    }

    pub fn component_mut<C: hecs::Component>(
        &self,
        entity: hecs::Entity,
    ) -> Result<hecs::RefMut<'_, C>> {
        self.ecs
            .get::<&mut C>(entity)
            .map_err(SimError::from_hecs::<C>)
    }

    pub fn population(&self) -> PopulationStats {
        let mut stats = PopulationStats::default();
        for living in self.ecs.query::<&Living>().iter().map(|(_, l)| l) {
            stats.add(living.species());
        }
        stats
    }

    pub fn count_species(&self, species: Species) -> usize {
        self.population().count(species)
    }

    /// Uniformly random point inside the world bounds.
    pub fn random_position(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..self.width),
            self.rng.gen_range(0.0..self.height),
        )
    }

    /// Clamps a point into the world bounds.
    pub fn clamp_to_bounds(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    pub(crate) fn has_room(&self, pending: usize) -> bool {
        self.population().total() + pending < self.config.ecology.max_population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::HeadlessWindow;
    use ecosim_data::{Physical, Sprite};

    fn seeded_world() -> World {
        let mut config = AppConfig::default();
        config.world.seed = Some(7);
        World::new(config).expect("valid config")
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.world.height = -1.0;
        assert!(matches!(World::new(config), Err(SimError::Config(_))));
    }

    #[test]
    fn test_component_lookup_errors() {
        let mut world = seeded_world();
        let e = world.ecs.spawn((Sprite::new(ecosim_data::Texture::Placeholder),));
        assert!(world.component::<Sprite>(e).is_ok());
        assert!(matches!(
            world.component::<Physical>(e),
            Err(SimError::MissingComponent("Physical"))
        ));
        world.ecs.despawn(e).expect("despawn");
        assert!(matches!(
            world.component::<Sprite>(e),
            Err(SimError::NoSuchEntity)
        ));
    }

    #[test]
    fn test_component_mut_writes_through() {
        let mut world = seeded_world();
        let mut window = HeadlessWindow::new();
        let e = world
            .spawn_organism(&mut window, Species::Fox, Vec2::new(5.0, 5.0), 0.0)
            .expect("spawn");
        world.component_mut::<Living>(e).expect("living").energy = 3.0;
        assert_eq!(world.component::<Living>(e).expect("living").energy, 3.0);
    }

    #[test]
    fn test_population_counts_species() {
        let mut world = seeded_world();
        let mut window = HeadlessWindow::new();
        for species in [Species::Grass, Species::Grass, Species::Fox] {
            world
                .spawn_organism(&mut window, species, Vec2::ZERO, 0.0)
                .expect("spawn");
        }
        let stats = world.population();
        assert_eq!(stats.grass, 2);
        assert_eq!(stats.lemmings, 0);
        assert_eq!(stats.foxes, 1);
        assert_eq!(stats.total(), 3);
        assert_eq!(world.count_species(Species::Grass), 2);
    }

    #[test]
    fn test_random_position_in_bounds() {
        let mut world = seeded_world();
        for _ in 0..100 {
            let p = world.random_position();
            assert!(p.x >= 0.0 && p.x < world.width);
            assert!(p.y >= 0.0 && p.y < world.height);
        }
    }

    #[test]
    fn test_seeded_worlds_share_rng_stream() {
        let mut a = seeded_world();
        let mut b = seeded_world();
        assert_eq!(a.random_position(), b.random_position());
    }

    #[test]
    fn test_target_entity() {
        let mut ecs = hecs::World::new();
        let e = ecs.spawn((1u8,));
        assert_eq!(Target::Food(e).entity(), Some(e));
        assert_eq!(Target::Mate(e).entity(), Some(e));
        assert!(Target::Idle.entity().is_none());
        assert!(Target::default().is_idle());
    }
}
