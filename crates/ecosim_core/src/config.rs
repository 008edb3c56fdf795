//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures mapped to `config.toml`. Every
//! section has defaults, so a file only needs the keys it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1280.0
//! height = 720.0
//! seed = 42
//! initial_foxes = 8
//!
//! [species.fox]
//! energy = 150.0
//! saturated = 220.0
//! range = 300.0
//! fov = 160.0
//! speed = 60.0
//! size = 16.0
//!
//! [ecology]
//! predation_efficiency = 0.5
//! ```

use ecosim_data::Species;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// World bounds, seeding and initial population.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub seed: Option<u64>,
    pub initial_grass: usize,
    pub initial_lemmings: usize,
    pub initial_foxes: usize,
    /// Cell size of the spatial hash used for proximity queries.
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            seed: None,
            initial_grass: 60,
            initial_lemmings: 20,
            initial_foxes: 5,
            cell_size: 64.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ecology Simulator".to_string(),
            target_fps: 60,
        }
    }
}

/// Spawn parameters shared by every organism of one species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    pub energy: f32,
    pub saturated: f32,
    pub range: f32,
    pub fov: f32,
    pub speed: f32,
    pub size: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeciesConfig {
    pub grass: SpeciesProfile,
    pub lemming: SpeciesProfile,
    pub fox: SpeciesProfile,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            grass: SpeciesProfile {
                energy: 20.0,
                saturated: 40.0,
                range: 0.0,
                fov: 0.0,
                speed: 0.0,
                size: 8.0,
            },
            lemming: SpeciesProfile {
                energy: 50.0,
                saturated: 80.0,
                range: 150.0,
                fov: 270.0,
                speed: 40.0,
                size: 8.0,
            },
            fox: SpeciesProfile {
                energy: 120.0,
                saturated: 200.0,
                range: 250.0,
                fov: 180.0,
                speed: 55.0,
                size: 16.0,
            },
        }
    }
}

impl SpeciesConfig {
    pub fn profile(&self, species: Species) -> &SpeciesProfile {
        match species {
            Species::Grass => &self.grass,
            Species::Lemming => &self.lemming,
            Species::Fox => &self.fox,
        }
    }
}

/// Energy flow between organisms and their surroundings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EcologyConfig {
    /// Energy burned per second by every consumer.
    pub base_metabolic_cost: f32,
    /// Extra energy burned per second per unit of velocity.
    pub movement_cost: f32,
    pub producer_growth_rate: f32,
    pub producer_max_energy: f32,
    /// Energy a producer hands to each seed it drops.
    pub seed_energy: f32,
    pub seed_radius: f32,
    /// Fraction of the prey's energy gained by the predator.
    pub predation_efficiency: f32,
    /// Fraction of each parent's energy passed on to its offspring.
    pub breeding_cost_fraction: f32,
    /// Degrees per second.
    pub max_turn_rate: f32,
    /// Degrees per frame.
    pub wander_jitter: f32,
    pub max_population: usize,
}

impl Default for EcologyConfig {
    fn default() -> Self {
        Self {
            base_metabolic_cost: 1.0,
            movement_cost: 0.05,
            producer_growth_rate: 2.0,
            producer_max_energy: 60.0,
            seed_energy: 15.0,
            seed_radius: 40.0,
            predation_efficiency: 0.6,
            breeding_cost_fraction: 0.4,
            max_turn_rate: 180.0,
            wander_jitter: 5.0,
            max_population: 2000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub window: WindowConfig,
    pub species: SpeciesConfig,
    pub ecology: EcologyConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns the first violated rule as an error.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.width.is_finite() && self.world.width > 0.0,
            "World width must be positive"
        );
        anyhow::ensure!(
            self.world.height.is_finite() && self.world.height > 0.0,
            "World height must be positive"
        );
        anyhow::ensure!(
            self.world.cell_size.is_finite() && self.world.cell_size > 0.0,
            "Spatial cell size must be positive"
        );

        anyhow::ensure!(self.window.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(
            self.window.target_fps <= 240,
            "Target FPS too high (max 240)"
        );

        for species in Species::ALL {
            let p = self.species.profile(species);
            let name = species.name();
            anyhow::ensure!(
                p.energy.is_finite() && p.energy >= 0.0,
                "{name}: starting energy must be non-negative"
            );
            anyhow::ensure!(p.saturated.is_finite() && p.saturated >= 0.0, "{name}: saturation must be non-negative");
            anyhow::ensure!(p.range.is_finite() && p.range >= 0.0, "{name}: range must be non-negative");
            anyhow::ensure!(
                (0.0..=360.0).contains(&p.fov),
                "{name}: field of view must be in [0, 360]"
            );
            anyhow::ensure!(p.speed.is_finite() && p.speed >= 0.0, "{name}: speed must be non-negative");
            anyhow::ensure!(p.size.is_finite() && p.size > 0.0, "{name}: sprite size must be positive");
        }

        let eco = &self.ecology;
        anyhow::ensure!(
            eco.base_metabolic_cost.is_finite() && eco.base_metabolic_cost >= 0.0,
            "Base metabolic cost must be non-negative"
        );
        anyhow::ensure!(eco.movement_cost.is_finite() && eco.movement_cost >= 0.0, "Movement cost must be non-negative");
        anyhow::ensure!(
            eco.producer_growth_rate.is_finite() && eco.producer_growth_rate >= 0.0,
            "Producer growth rate must be non-negative"
        );
        anyhow::ensure!(
            eco.producer_max_energy.is_finite() && eco.producer_max_energy > 0.0,
            "Producer max energy must be positive"
        );
        anyhow::ensure!(eco.seed_energy.is_finite() && eco.seed_energy > 0.0, "Seed energy must be positive");
        anyhow::ensure!(eco.seed_radius.is_finite() && eco.seed_radius >= 0.0, "Seed radius must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&eco.predation_efficiency),
            "Predation efficiency must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            eco.breeding_cost_fraction > 0.0 && eco.breeding_cost_fraction < 1.0,
            "Breeding cost fraction must be in (0.0, 1.0)"
        );
        anyhow::ensure!(eco.max_turn_rate.is_finite() && eco.max_turn_rate >= 0.0, "Max turn rate must be non-negative");
        anyhow::ensure!(eco.wander_jitter.is_finite() && eco.wander_jitter >= 0.0, "Wander jitter must be non-negative");
        anyhow::ensure!(eco.max_population > 0, "Max population must be positive");
        anyhow::ensure!(
            self.initial_population() <= eco.max_population,
            "Initial population exceeds max population"
        );

        Ok(())
    }

    pub fn initial_population(&self) -> usize {
        self.world.initial_grass + self.world.initial_lemmings + self.world.initial_foxes
    }

    /// Fixed simulation step derived from the target frame rate.
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.window.target_fps.max(1)))
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Loads `config.toml` from the working directory.
    ///
    /// Falls back to defaults when the file is missing or invalid.
    pub fn load() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid config.toml, using defaults");
                Self::default()
            }
        }
    }
}
