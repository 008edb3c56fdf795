//! Frame driver tying the world, its systems and a window together.

use crate::config::AppConfig;
use crate::error::Result;
use crate::graphics::Window;
use crate::metrics::{self, Metrics};
use crate::systems::render::RenderStats;
use crate::systems::{interaction, metabolism, movement, render, targeting, Birth};
use crate::world::{PopulationStats, World};
use ecosim_data::Species;
use glam::Vec2;
use std::time::Instant;

/// What happened during one call to [`Simulation::frame`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub eaten: usize,
    pub starved: usize,
    pub births: usize,
    pub seeds: usize,
    pub render: RenderStats,
    pub population: PopulationStats,
}

pub struct Simulation<W: Window> {
    world: World,
    window: W,
    metrics: Metrics,
    dt: f32,
}

impl<W: Window> Simulation<W> {
    pub fn new(config: AppConfig, window: W) -> Result<Self> {
        let dt = config.frame_time().as_secs_f32();
        let world = World::new(config)?;
        Ok(Self {
            world,
            window,
            metrics: Metrics::new(),
            dt,
        })
    }

    /// Spawns the configured starting population.
    pub fn populate(&mut self) -> Result<()> {
        self.world.populate(&mut self.window)?;
        Ok(())
    }

    pub fn spawn_test_sprite(
        &mut self,
        x: f32,
        y: f32,
        rotation: f32,
        velocity: f32,
    ) -> Result<hecs::Entity> {
        self.world
            .generate_test_sprite(&mut self.window, x, y, rotation, velocity)
    }

    /// Runs one frame: targets, movement, feeding and breeding, metabolism,
    /// rendering, then window events.
    pub fn frame(&mut self) -> Result<FrameReport> {
        let started = Instant::now();
        self.world.tick += 1;

        targeting::update_targets(&mut self.world);
        movement::move_entities(&mut self.world, self.dt);

        let interactions = interaction::resolve_interactions(&mut self.world);
        for &prey in &interactions.eaten {
            self.world.despawn(&mut self.window, prey)?;
        }
        self.spawn_all(&interactions.births)?;

        let upkeep = metabolism::apply_metabolism(&mut self.world, self.dt);
        for &dead in &upkeep.starved {
            self.world.despawn(&mut self.window, dead)?;
        }
        self.spawn_all(&upkeep.seeds)?;

        let render = render::render_entities(&self.world, &mut self.window)?;
        self.window.poll_events()?;

        let population = self.world.population();
        self.metrics
            .increment_counter(metrics::PREDATIONS, interactions.eaten.len() as u64);
        self.metrics
            .increment_counter(metrics::BIRTHS, interactions.births.len() as u64);
        self.metrics
            .increment_counter(metrics::STARVATIONS, upkeep.starved.len() as u64);
        self.metrics
            .increment_counter(metrics::SEEDS, upkeep.seeds.len() as u64);
        self.metrics.record_frame(started.elapsed(), population);

        Ok(FrameReport {
            frame: self.world.tick,
            eaten: interactions.eaten.len(),
            starved: upkeep.starved.len(),
            births: interactions.births.len(),
            seeds: upkeep.seeds.len(),
            render,
            population,
        })
    }

    /// Runs frames until the window asks to close. Returns the number of frames run.
    pub fn run(&mut self) -> Result<u64> {
        let mut frames = 0;
        while !self.window.should_close() {
            self.frame()?;
            frames += 1;
        }
        self.metrics.log_summary();
        Ok(frames)
    }

    pub fn spawn(&mut self, species: Species, pos: Vec2, rotation: f32) -> Result<hecs::Entity> {
        self.world
            .spawn_organism(&mut self.window, species, pos, rotation)
    }

    pub fn spawn_with_energy(
        &mut self,
        species: Species,
        pos: Vec2,
        rotation: f32,
        energy: f32,
    ) -> Result<hecs::Entity> {
        self.world
            .spawn_organism_with_energy(&mut self.window, species, pos, rotation, energy)
    }

    /// Removes an entity and frees its graphics buffers.
    pub fn despawn(&mut self, entity: hecs::Entity) -> Result<()> {
        self.world.despawn(&mut self.window, entity)
    }

    fn spawn_all(&mut self, births: &[Birth]) -> Result<()> {
        for birth in births {
            self.spawn_with_energy(birth.species, birth.pos, birth.rotation, birth.energy)?;
        }
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn into_window(self) -> W {
        self.window
    }
}
