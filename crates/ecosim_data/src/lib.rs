//! Core data structures for the ecology simulator.
//!
//! Everything in this crate is plain data: components carry no behaviour
//! beyond their constructors. Systems in `ecosim_core` read and write them.

pub mod data;

pub use data::entity::{ArrayId, Behaviour, BufferId, Physical, Sprite, Texture, Vertex};
pub use data::living::{ComponentError, Living, Species};
