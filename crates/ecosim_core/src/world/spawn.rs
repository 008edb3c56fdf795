use super::{Target, World};
use crate::error::Result;
use crate::graphics::GraphicsBackend;
use ecosim_data::{Behaviour, Living, Physical, Species, Sprite, Texture, Vertex};
use glam::Vec2;
use rand::Rng;

impl World {
    /// Spawns an organism with the starting energy of its species profile.
    pub fn spawn_organism(
        &mut self,
        graphics: &mut dyn GraphicsBackend,
        species: Species,
        pos: Vec2,
        rotation: f32,
    ) -> Result<hecs::Entity> {
        let energy = self.config.species.profile(species).energy;
        self.spawn_organism_with_energy(graphics, species, pos, rotation, energy)
    }

    pub fn spawn_organism_with_energy(
        &mut self,
        graphics: &mut dyn GraphicsBackend,
        species: Species,
        pos: Vec2,
        rotation: f32,
        energy: f32,
    ) -> Result<hecs::Entity> {
        let profile = *self.config.species.profile(species);
        let living = Living::new(species, energy)?;
        let vertex = graphics.create_quad(profile.size, profile.size)?;

        let entity = self.ecs.spawn((
            Physical::new(pos, rotation, profile.speed, profile.size, profile.size),
            vertex,
            Sprite::new(Texture::for_species(species)),
            living,
            Behaviour::new(profile.saturated, profile.range, profile.fov),
            Target::Idle,
        ));
        tracing::debug!(?entity, species = species.name(), x = pos.x, y = pos.y, energy, "Spawned organism");
        Ok(entity)
    }

    /// Spawns a lemming-profile organism with an explicit heading and speed.
    pub fn generate_test_sprite(
        &mut self,
        graphics: &mut dyn GraphicsBackend,
        x: f32,
        y: f32,
        rotation: f32,
        velocity: f32,
    ) -> Result<hecs::Entity> {
        let pos = self.clamp_to_bounds(Vec2::new(x, y));
        let entity = self.spawn_organism(graphics, Species::Lemming, pos, rotation)?;
        self.component_mut::<Physical>(entity)?.velocity = velocity;
        Ok(entity)
    }

    /// Spawns the configured starting population at random positions and headings.
    pub fn populate(&mut self, graphics: &mut dyn GraphicsBackend) -> Result<Vec<hecs::Entity>> {
        let counts = [
            (Species::Grass, self.config.world.initial_grass),
            (Species::Lemming, self.config.world.initial_lemmings),
            (Species::Fox, self.config.world.initial_foxes),
        ];
        let mut spawned = Vec::with_capacity(counts.iter().map(|(_, n)| n).sum());
        for (species, count) in counts {
            for _ in 0..count {
                let pos = self.random_position();
                let rotation = self.rng.gen_range(0.0..360.0);
                spawned.push(self.spawn_organism(graphics, species, pos, rotation)?);
            }
        }
        tracing::info!(
            grass = counts[0].1,
            lemmings = counts[1].1,
            foxes = counts[2].1,
            "Populated world"
        );
        Ok(spawned)
    }

    /// Removes an entity and hands its buffers back to the backend.
    pub fn despawn(
        &mut self,
        graphics: &mut dyn GraphicsBackend,
        entity: hecs::Entity,
    ) -> Result<()> {
        let vertex = self.ecs.get::<&Vertex>(entity).ok().map(|v| *v);
        self.ecs.despawn(entity)?;
        if let Some(vertex) = vertex {
            graphics.release(&vertex);
        }
        tracing::debug!(?entity, "Despawned entity");
        Ok(())
    }
}
