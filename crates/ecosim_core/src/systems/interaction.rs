//! Collision handling between seekers and their targets: feeding and breeding.

use super::Birth;
use crate::world::{Target, World};
use ecosim_data::{Behaviour, Living, Physical};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InteractionOutcome {
    /// Prey consumed this frame, to be despawned by the caller.
    pub eaten: Vec<hecs::Entity>,
    pub births: Vec<Birth>,
}

/// Two sprites touch when their centres are no farther apart than their mean width.
pub fn in_contact(a: &Physical, b: &Physical) -> bool {
    a.pos.distance(b.pos) <= (a.width + b.width) / 2.0
}

fn is_satiated(world: &World, entity: hecs::Entity) -> bool {
    match (
        world.ecs.get::<&Living>(entity),
        world.ecs.get::<&Behaviour>(entity),
    ) {
        (Ok(living), Ok(behaviour)) => living.energy >= behaviour.saturated,
        _ => false,
    }
}

fn clear_target(world: &World, entity: hecs::Entity) {
    if let Ok(mut target) = world.ecs.get::<&mut Target>(entity) {
        *target = Target::Idle;
    }
}

/// Resolves every seeker that touches its target.
///
/// Seekers act in entity-id order. A prey is eaten at most once, an eaten
/// organism does nothing further, and each organism breeds at most once per
/// frame. Entities are not removed here; see [`InteractionOutcome`].
pub fn resolve_interactions(world: &mut World) -> InteractionOutcome {
    let mut seekers: Vec<(hecs::Entity, Target)> = world
        .ecs
        .query::<&Target>()
        .iter()
        .filter(|(_, t)| !t.is_idle())
        .map(|(e, t)| (e, *t))
        .collect();
    seekers.sort_by_key(|(e, _)| e.to_bits());

    let efficiency = world.config.ecology.predation_efficiency;
    let cost_fraction = world.config.ecology.breeding_cost_fraction;

    let mut eaten: HashSet<hecs::Entity> = HashSet::new();
    let mut bred: HashSet<hecs::Entity> = HashSet::new();
    let mut outcome = InteractionOutcome::default();

    for (seeker, target) in seekers {
        if eaten.contains(&seeker) {
            continue;
        }
        let Some(other) = target.entity() else {
            continue;
        };
        if eaten.contains(&other) || !world.contains(other) {
            clear_target(world, seeker);
            continue;
        }
        let (Ok(seeker_body), Ok(other_body)) = (
            world.ecs.get::<&Physical>(seeker).map(|p| *p),
            world.ecs.get::<&Physical>(other).map(|p| *p),
        ) else {
            continue;
        };
        if !in_contact(&seeker_body, &other_body) {
            continue;
        }
        let (Ok(seeker_life), Ok(other_life)) = (
            world.ecs.get::<&Living>(seeker).map(|l| *l),
            world.ecs.get::<&Living>(other).map(|l| *l),
        ) else {
            continue;
        };

        match target {
            Target::Food(prey) => {
                if !seeker_life.species().can_eat(other_life.species()) {
                    clear_target(world, seeker);
                    continue;
                }
                let gain = other_life.energy * efficiency;
                if let Ok(mut living) = world.ecs.get::<&mut Living>(seeker) {
                    living.energy += gain;
                }
                eaten.insert(prey);
                outcome.eaten.push(prey);
                clear_target(world, seeker);
                tracing::debug!(?seeker, ?prey, gain, "Predation");
            }
            Target::Mate(mate) => {
                if bred.contains(&seeker) || bred.contains(&mate) {
                    continue;
                }
                if !seeker_life.species().can_breed_with(other_life.species())
                    || !is_satiated(world, seeker)
                    || !is_satiated(world, mate)
                {
                    continue;
                }
                if !world.has_room(outcome.births.len()) {
                    continue;
                }

                let mut paid = 0.0;
                for parent in [seeker, mate] {
                    if let Ok(mut living) = world.ecs.get::<&mut Living>(parent) {
                        let cost = living.energy * cost_fraction;
                        living.energy -= cost;
                        paid += cost;
                    }
                }
                bred.insert(seeker);
                bred.insert(mate);
                clear_target(world, seeker);
                clear_target(world, mate);

                let pos = (seeker_body.pos + other_body.pos) / 2.0;
                let rotation = world.rng.gen_range(0.0..360.0);
                outcome.births.push(Birth {
                    species: seeker_life.species(),
                    pos,
                    rotation,
                    energy: paid,
                });
                tracing::debug!(?seeker, ?mate, energy = paid, "Breeding");
            }
            Target::Idle => {}
        }
    }

    outcome
}
