//! Per-frame systems.
//!
//! Each system is a free function over the [`World`](crate::world::World).
//! Systems that create or destroy entities return an outcome, which the
//! caller applies through its graphics backend.

pub mod interaction;
pub mod metabolism;
pub mod movement;
pub mod render;
pub mod targeting;

use ecosim_data::Species;
use glam::Vec2;

/// A new organism requested by a system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Birth {
    pub species: Species,
    pub pos: Vec2,
    pub rotation: f32,
    pub energy: f32,
}
