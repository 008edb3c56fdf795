//! Energy bookkeeping: consumers burn energy, producers grow and seed.

use super::Birth;
use crate::world::World;
use ecosim_data::{Behaviour, Living, Physical, Species};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetabolismOutcome {
    /// Consumers that ran out of energy, to be despawned by the caller.
    pub starved: Vec<hecs::Entity>,
    /// New producers dropped by saturated parents.
    pub seeds: Vec<Birth>,
}

/// Energy a consumer burns per second at the given speed.
pub fn consumer_cost(base_cost: f32, movement_cost: f32, velocity: f32) -> f32 {
    base_cost + movement_cost * velocity.abs()
}

pub fn apply_metabolism(world: &mut World, dt: f32) -> MetabolismOutcome {
    let eco = world.config.ecology.clone();
    let mut room = eco
        .max_population
        .saturating_sub(world.population().total());

    let World {
        ecs,
        rng,
        width,
        height,
        ..
    } = world;
    let bounds = Vec2::new(*width, *height);
    let mut outcome = MetabolismOutcome::default();

    for (entity, (physical, living, behaviour)) in
        ecs.query_mut::<(&Physical, &mut Living, Option<&Behaviour>)>()
    {
        if !living.species().is_producer() {
            let cost = consumer_cost(eco.base_metabolic_cost, eco.movement_cost, physical.velocity);
            living.energy = (living.energy - cost * dt).max(0.0);
            if living.energy <= 0.0 {
                outcome.starved.push(entity);
            }
            continue;
        }

        living.energy =
            (living.energy + eco.producer_growth_rate * dt).min(eco.producer_max_energy);

        let Some(behaviour) = behaviour else {
            continue;
        };
        if room == 0 || living.energy < behaviour.saturated || living.energy < eco.seed_energy {
            continue;
        }
        living.energy -= eco.seed_energy;
        room -= 1;

        let angle = rng.gen_range(0.0..TAU);
        let distance = eco.seed_radius * rng.gen_range(0.0f32..=1.0).sqrt();
        let offset = Vec2::from_angle(angle) * distance;
        outcome.seeds.push(Birth {
            species: Species::Grass,
            pos: (physical.pos + offset).clamp(Vec2::ZERO, bounds),
            rotation: 0.0,
            energy: eco.seed_energy,
        });
    }

    outcome.starved.sort_by_key(|e| e.to_bits());
    outcome
}
