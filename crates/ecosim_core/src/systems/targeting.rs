//! Food and mate selection.
//!
//! Every consumer with a [`Behaviour`] picks one goal per frame. Hungry
//! organisms (energy below `saturated`) look for their direct prey species;
//! satiated ones look for a satiated partner of their own species. Only
//! organisms inside the seeker's detection range and field of view qualify.
//! The nearest one wins, and distance ties go to the lower entity id so
//! repeated runs pick the same target.

use crate::spatial_hash::SpatialHash;
use crate::systems::movement::{angle_difference, bearing};
use crate::world::{Target, World};
use ecosim_data::{Behaviour, Living, Physical, Species};
use glam::Vec2;

/// Read-only view of a potential target, captured before targets are written.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    entity: hecs::Entity,
    pos: Vec2,
    species: Species,
    /// Satiated, and therefore willing to breed.
    willing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Desire {
    Food,
    Mate,
}

/// Whether `point` lies inside the observer's detection range and field of view.
pub fn can_see(observer: &Physical, behaviour: &Behaviour, point: Vec2) -> bool {
    let dist_sq = observer.pos.distance_squared(point);
    if dist_sq > behaviour.range * behaviour.range {
        return false;
    }
    if behaviour.fov >= 360.0 || dist_sq == 0.0 {
        return true;
    }
    let to_point = bearing(observer.pos, point);
    angle_difference(observer.rotation, to_point).abs() <= behaviour.fov / 2.0
}

fn select_target(
    seeker: hecs::Entity,
    physical: &Physical,
    living: &Living,
    behaviour: &Behaviour,
    candidates: &[Candidate],
    spatial_hash: &SpatialHash,
    nearby: &mut Vec<usize>,
) -> Target {
    let species = living.species();
    if species.is_producer() {
        return Target::Idle;
    }
    let desire = if living.energy >= behaviour.saturated {
        Desire::Mate
    } else {
        Desire::Food
    };

    spatial_hash.query_into(physical.pos.x, physical.pos.y, behaviour.range, nearby);

    let mut best: Option<(f32, u64, hecs::Entity)> = None;
    for &idx in nearby.iter() {
        let c = &candidates[idx];
        if c.entity == seeker {
            continue;
        }
        let wanted = match desire {
            Desire::Food => species.can_eat(c.species),
            Desire::Mate => species.can_breed_with(c.species) && c.willing,
        };
        if !wanted || !can_see(physical, behaviour, c.pos) {
            continue;
        }
        let key = (physical.pos.distance_squared(c.pos), c.entity.to_bits().get());
        if best.map_or(true, |(d, bits, _)| key < (d, bits)) {
            best = Some((key.0, key.1, c.entity));
        }
    }

    match (best, desire) {
        (None, _) => Target::Idle,
        (Some((_, _, e)), Desire::Food) => Target::Food(e),
        (Some((_, _, e)), Desire::Mate) => Target::Mate(e),
    }
}

pub fn update_targets(world: &mut World) {
    let mut candidates: Vec<Candidate> = world
        .ecs
        .query::<(&Physical, &Living, Option<&Behaviour>)>()
        .iter()
        .map(|(entity, (physical, living, behaviour))| Candidate {
            entity,
            pos: physical.pos,
            species: living.species(),
            willing: behaviour.is_some_and(|b| living.energy >= b.saturated),
        })
        .collect();
    candidates.sort_by_key(|c| c.entity.to_bits());

    let positions: Vec<(f32, f32)> = candidates.iter().map(|c| (c.pos.x, c.pos.y)).collect();
    world.spatial_hash.build(&positions);

    let World {
        ecs, spatial_hash, ..
    } = world;
    let mut nearby = Vec::new();
    let mut acquired = 0usize;
    for (entity, (physical, living, behaviour, target)) in
        ecs.query_mut::<(&Physical, &Living, &Behaviour, &mut Target)>()
    {
        *target = select_target(
            entity,
            physical,
            living,
            behaviour,
            &candidates,
            spatial_hash,
            &mut nearby,
        );
        if !target.is_idle() {
            acquired += 1;
        }
    }
    tracing::trace!(acquired, candidates = candidates.len(), "Updated targets");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::graphics::HeadlessWindow;

    fn world() -> World {
        let mut config = AppConfig::default();
        config.world.seed = Some(5);
        World::new(config).expect("valid config")
    }

    fn spawn(
        world: &mut World,
        window: &mut HeadlessWindow,
        species: Species,
        x: f32,
        y: f32,
        rotation: f32,
    ) -> hecs::Entity {
        world
            .spawn_organism(window, species, Vec2::new(x, y), rotation)
            .expect("spawn")
    }

    fn set_energy(world: &World, e: hecs::Entity, energy: f32) {
        world.component_mut::<Living>(e).expect("living").energy = energy;
    }

    fn target_of(world: &World, e: hecs::Entity) -> Target {
        *world.component::<Target>(e).expect("target")
    }

    #[test]
    fn test_can_see_respects_range_and_fov() {
        let observer = Physical::new(Vec2::ZERO, 0.0, 1.0, 8.0, 8.0);
        let behaviour = Behaviour::new(10.0, 50.0, 90.0);
        assert!(can_see(&observer, &behaviour, Vec2::new(40.0, 0.0)));
        assert!(can_see(&observer, &behaviour, Vec2::new(30.0, 29.0)));
        assert!(!can_see(&observer, &behaviour, Vec2::new(60.0, 0.0)));
        assert!(!can_see(&observer, &behaviour, Vec2::new(0.0, 40.0)));
        assert!(!can_see(&observer, &behaviour, Vec2::new(-40.0, 0.0)));
    }

    #[test]
    fn test_full_circle_fov_sees_behind() {
        let observer = Physical::new(Vec2::ZERO, 0.0, 1.0, 8.0, 8.0);
        let behaviour = Behaviour::new(10.0, 50.0, 360.0);
        assert!(can_see(&observer, &behaviour, Vec2::new(-40.0, 0.0)));
    }

    #[test]
    fn test_hungry_lemming_targets_nearest_grass() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let lemming = spawn(&mut world, &mut window, Species::Lemming, 100.0, 100.0, 0.0);
        set_energy(&world, lemming, 10.0);
        let _far = spawn(&mut world, &mut window, Species::Grass, 200.0, 100.0, 0.0);
        let near = spawn(&mut world, &mut window, Species::Grass, 130.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, lemming), Target::Food(near));
    }

    #[test]
    fn test_predator_ignores_non_prey() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let fox = spawn(&mut world, &mut window, Species::Fox, 100.0, 100.0, 0.0);
        set_energy(&world, fox, 10.0);
        spawn(&mut world, &mut window, Species::Grass, 110.0, 100.0, 0.0);
        spawn(&mut world, &mut window, Species::Fox, 120.0, 100.0, 0.0);
        let lemming = spawn(&mut world, &mut window, Species::Lemming, 180.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, fox), Target::Food(lemming));
    }

    #[test]
    fn test_prey_behind_predator_is_invisible() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let fox = spawn(&mut world, &mut window, Species::Fox, 100.0, 100.0, 0.0);
        set_energy(&world, fox, 10.0);
        spawn(&mut world, &mut window, Species::Lemming, 50.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, fox), Target::Idle);
    }

    #[test]
    fn test_out_of_range_prey_is_ignored() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let fox = spawn(&mut world, &mut window, Species::Fox, 100.0, 100.0, 0.0);
        set_energy(&world, fox, 10.0);
        let range = world.config.species.fox.range;
        spawn(&mut world, &mut window, Species::Lemming, 100.0 + range + 1.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, fox), Target::Idle);
    }

    #[test]
    fn test_satiated_organism_seeks_willing_mate() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let saturated = world.config.species.lemming.saturated;
        let seeker = spawn(&mut world, &mut window, Species::Lemming, 100.0, 100.0, 0.0);
        set_energy(&world, seeker, saturated);
        let hungry = spawn(&mut world, &mut window, Species::Lemming, 110.0, 100.0, 0.0);
        set_energy(&world, hungry, 1.0);
        let willing = spawn(&mut world, &mut window, Species::Lemming, 140.0, 100.0, 0.0);
        set_energy(&world, willing, saturated + 5.0);
        spawn(&mut world, &mut window, Species::Grass, 105.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, seeker), Target::Mate(willing));
        assert_eq!(target_of(&world, hungry), Target::Idle);
    }

    #[test]
    fn test_distance_tie_prefers_lower_entity_id() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let fox = spawn(&mut world, &mut window, Species::Fox, 100.0, 100.0, 90.0);
        set_energy(&world, fox, 10.0);
        let first = spawn(&mut world, &mut window, Species::Lemming, 130.0, 130.0, 0.0);
        let second = spawn(&mut world, &mut window, Species::Lemming, 70.0, 130.0, 0.0);
        assert!(first.to_bits() < second.to_bits());

        update_targets(&mut world);
        assert_eq!(target_of(&world, fox), Target::Food(first));
    }

    #[test]
    fn test_producers_never_target() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let grass = spawn(&mut world, &mut window, Species::Grass, 100.0, 100.0, 0.0);
        spawn(&mut world, &mut window, Species::Grass, 101.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, grass), Target::Idle);
    }

    #[test]
    fn test_target_is_cleared_when_nothing_remains() {
        let mut world = world();
        let mut window = HeadlessWindow::new();
        let lemming = spawn(&mut world, &mut window, Species::Lemming, 100.0, 100.0, 0.0);
        set_energy(&world, lemming, 10.0);
        let grass = spawn(&mut world, &mut window, Species::Grass, 120.0, 100.0, 0.0);

        update_targets(&mut world);
        assert_eq!(target_of(&world, lemming), Target::Food(grass));

        world.despawn(&mut window, grass).expect("despawn");
        update_targets(&mut world);
        assert_eq!(target_of(&world, lemming), Target::Idle);
    }
}
