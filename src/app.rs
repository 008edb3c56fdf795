use anyhow::{Context, Result};
use ecosim_core::config::AppConfig;
use ecosim_core::graphics::{HeadlessWindow, Window};
use ecosim_core::simulation::Simulation;
use ecosim_core::world::PopulationStats;
use ecosim_tui::TerminalWindow;
use std::time::{Duration, Instant};

/// Sprites every run starts with on top of the configured population,
/// as `(x, y, rotation, velocity)`.
pub const TEST_SPRITES: [(f32, f32, f32, f32); 2] =
    [(100.0, 300.0, 15.0, 8.0), (400.0, 200.0, 250.0, 8.0)];

/// Frames a headless run lasts when no limit is given.
pub const DEFAULT_HEADLESS_FRAMES: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub population: PopulationStats,
}

pub struct App<W: Window> {
    sim: Simulation<W>,
    frame_time: Duration,
    paced: bool,
}

impl<W: Window> App<W> {
    pub fn new(config: AppConfig, window: W) -> Result<Self> {
        let frame_time = config.frame_time();
        let sim = Simulation::new(config, window).context("Failed to create simulation")?;
        Ok(Self {
            sim,
            frame_time,
            paced: false,
        })
    }

    /// Sleeps out the rest of each frame so the loop holds the target FPS.
    #[must_use]
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Spawns the configured population and the fixed test sprites.
    ///
    /// Test sprites that would push the world past `max_population` are skipped.
    pub fn setup(&mut self) -> Result<Vec<hecs::Entity>> {
        self.sim
            .populate()
            .context("Failed to spawn initial population")?;
        let cap = self.sim.world().config.ecology.max_population;
        let mut sprites = Vec::with_capacity(TEST_SPRITES.len());
        for (x, y, rotation, velocity) in TEST_SPRITES {
            if self.sim.world().len() >= cap {
                tracing::warn!(max_population = cap, "No room for test sprite, skipping");
                continue;
            }
            let entity = self
                .sim
                .spawn_test_sprite(x, y, rotation, velocity)
                .context("Failed to spawn test sprite")?;
            sprites.push(entity);
        }
        tracing::info!(
            entities = self.sim.world().len(),
            "Simulation ready"
        );
        Ok(sprites)
    }

    /// Runs until the window closes or every organism has died.
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut frames = 0;
        while !self.sim.window().should_close() {
            let started = Instant::now();
            self.sim
                .frame()
                .with_context(|| format!("Frame {} failed", frames + 1))?;
            frames += 1;

            if self.sim.world().is_empty() {
                tracing::info!(frame = frames, "Population extinct, stopping");
                break;
            }
            if self.paced {
                if let Some(rest) = self.frame_time.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
        self.sim.metrics().log_summary();
        Ok(RunSummary {
            frames,
            population: self.sim.world().population(),
        })
    }

    pub fn simulation(&self) -> &Simulation<W> {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<W> {
        &mut self.sim
    }

    pub fn into_simulation(self) -> Simulation<W> {
        self.sim
    }
}

/// Runs without a display for `frames` frames, as fast as possible.
pub fn run_headless(config: AppConfig, frames: u64) -> Result<RunSummary> {
    let mut app = App::new(config, HeadlessWindow::with_frame_limit(frames))?;
    app.setup()?;
    app.run()
}

/// Runs in the terminal at the configured frame rate until the user quits.
pub fn run_terminal(config: AppConfig) -> Result<RunSummary> {
    let window = TerminalWindow::new(config.world.width, config.world.height)
        .context("Failed to initialise terminal")?;
    let mut app = App::new(config, window)?.paced(true);
    let result = app.setup().and_then(|_| app.run());
    app.into_simulation().into_window().shutdown()?;
    result
}
