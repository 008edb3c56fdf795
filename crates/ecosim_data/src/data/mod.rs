//! Component definitions attached to simulated organisms.

pub mod entity;
pub mod living;
