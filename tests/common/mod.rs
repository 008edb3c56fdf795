use ecosim_core::config::AppConfig;
use ecosim_core::graphics::HeadlessWindow;
use ecosim_core::simulation::Simulation;
use ecosim_data::Species;
use glam::Vec2;

struct Organism {
    species: Species,
    pos: Vec2,
    rotation: f32,
    energy: Option<f32>,
}

/// Builds a headless simulation with an empty starting population unless
/// `with_population` is called.
#[allow(dead_code)]
pub struct SimBuilder {
    config: AppConfig,
    organisms: Vec<Organism>,
    frame_limit: Option<u64>,
    populate: bool,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_grass = 0;
        config.world.initial_lemmings = 0;
        config.world.initial_foxes = 0;
        config.world.seed = Some(0);
        Self {
            config,
            organisms: Vec::new(),
            frame_limit: None,
            populate: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Spawns the configured starting population on build.
    pub fn with_population(mut self, grass: usize, lemmings: usize, foxes: usize) -> Self {
        self.config.world.initial_grass = grass;
        self.config.world.initial_lemmings = lemmings;
        self.config.world.initial_foxes = foxes;
        self.populate = true;
        self
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn with_organism(mut self, species: Species, x: f32, y: f32, rotation: f32) -> Self {
        self.organisms.push(Organism {
            species,
            pos: Vec2::new(x, y),
            rotation,
            energy: None,
        });
        self
    }

    pub fn with_organism_energy(
        mut self,
        species: Species,
        x: f32,
        y: f32,
        rotation: f32,
        energy: f32,
    ) -> Self {
        self.organisms.push(Organism {
            species,
            pos: Vec2::new(x, y),
            rotation,
            energy: Some(energy),
        });
        self
    }

    pub fn build(self) -> (Simulation<HeadlessWindow>, Vec<hecs::Entity>) {
        let window = match self.frame_limit {
            Some(frames) => HeadlessWindow::with_frame_limit(frames),
            None => HeadlessWindow::new(),
        };
        let mut sim =
            Simulation::new(self.config, window).expect("Failed to create simulation in test builder");
        if self.populate {
            sim.populate().expect("Failed to populate");
        }
        let entities = self
            .organisms
            .into_iter()
            .map(|o| match o.energy {
                Some(energy) => sim.spawn_with_energy(o.species, o.pos, o.rotation, energy),
                None => sim.spawn(o.species, o.pos, o.rotation),
            })
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to spawn organism");
        (sim, entities)
    }
}
