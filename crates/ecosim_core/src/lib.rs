//! # Ecosim Core
//!
//! The simulation engine for Ecosim, a small predator/prey ecology on a
//! bounded 2D plane.
//!
//! This crate contains:
//! - The ECS world wrapper and organism spawning
//! - Per-frame systems: targeting, movement, feeding and breeding, metabolism
//! - A spatial hash used for neighbour lookups
//! - The graphics seam (`GraphicsBackend`, `Window`) and a headless window
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use ecosim_core::config::AppConfig;
//! use ecosim_core::graphics::HeadlessWindow;
//! use ecosim_core::simulation::Simulation;
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(42);
//!
//! let mut sim = Simulation::new(config, HeadlessWindow::with_frame_limit(10)).unwrap();
//! sim.populate().unwrap();
//! assert_eq!(sim.run().unwrap(), 10);
//! assert_eq!(sim.window().live_buffers(), sim.world().len());
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Error types shared by the world and the graphics seam
pub mod error;
/// Graphics and window abstraction
pub mod graphics;
/// Frame metrics and logging setup
pub mod metrics;
/// The frame loop
pub mod simulation;
/// Spatial hashing for efficient neighbour queries
pub mod spatial_hash;
/// Per-frame ECS systems
pub mod systems;
/// The ECS world and entity management
pub mod world;

pub use config::AppConfig;
pub use error::{Result, SimError};
pub use graphics::{DrawCall, GraphicsBackend, HeadlessWindow, Window};
pub use metrics::{init_file_logging, init_logging, Metrics};
pub use simulation::{FrameReport, Simulation};
pub use world::{PopulationStats, Target, World};
