//! Steering and integration of [`Physical`] state.
//!
//! Angles are in degrees; 0° points along +x and angles grow counter-clockwise.
//! Organisms with a live target turn toward it at a bounded rate, idle
//! consumers wander, and everyone advances along their heading. The world edge
//! reflects headings back inward.

use crate::world::{Target, World};
use ecosim_data::{Living, Physical};
use glam::Vec2;
use rand::Rng;
use std::collections::HashMap;

/// Unit vector for a heading.
pub fn heading(rotation: f32) -> Vec2 {
    let (sin, cos) = rotation.to_radians().sin_cos();
    Vec2::new(cos, sin)
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Heading that points from `from` to `to`.
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_degrees(d.y.atan2(d.x).to_degrees())
}

/// Signed shortest turn from heading `from` to heading `to`, in `(-180, 180]`.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let d = normalize_degrees(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Rotates `rotation` toward `desired` by at most `max_turn` degrees.
pub fn turn_toward(rotation: f32, desired: f32, max_turn: f32) -> f32 {
    let diff = angle_difference(rotation, desired);
    normalize_degrees(rotation + diff.clamp(-max_turn, max_turn))
}

/// Keeps a body inside `[0, width] x [0, height]`, mirroring its heading on
/// the axis it crossed.
fn bounce(physical: &mut Physical, width: f32, height: f32) {
    if physical.pos.x < 0.0 || physical.pos.x > width {
        physical.pos.x = physical.pos.x.clamp(0.0, width);
        physical.rotation = 180.0 - physical.rotation;
    }
    if physical.pos.y < 0.0 || physical.pos.y > height {
        physical.pos.y = physical.pos.y.clamp(0.0, height);
        physical.rotation = -physical.rotation;
    }
}

pub fn move_entities(world: &mut World, dt: f32) {
    let max_turn = world.config.ecology.max_turn_rate * dt;
    let jitter = world.config.ecology.wander_jitter;

    // Target positions are read before the mutable pass.
    let goals: HashMap<hecs::Entity, Vec2> = world
        .ecs
        .query::<&Target>()
        .iter()
        .filter_map(|(entity, target)| {
            let goal = target.entity()?;
            let pos = world.ecs.get::<&Physical>(goal).ok()?.pos;
            Some((entity, pos))
        })
        .collect();

    let World {
        ecs,
        rng,
        width,
        height,
        ..
    } = world;

    for (entity, (physical, living)) in ecs.query_mut::<(&mut Physical, Option<&Living>)>() {
        let wanders = living.is_some_and(|l| !l.species().is_producer());

        if let Some(goal) = goals.get(&entity) {
            if *goal != physical.pos {
                let desired = bearing(physical.pos, *goal);
                physical.rotation = turn_toward(physical.rotation, desired, max_turn);
            }
        } else if wanders && physical.velocity > 0.0 && jitter > 0.0 {
            physical.rotation += rng.gen_range(-jitter..=jitter);
        }

        physical.pos += heading(physical.rotation) * physical.velocity * dt;
        bounce(physical, *width, *height);
        physical.rotation = normalize_degrees(physical.rotation);
    }
}
