use crate::error::Result;
use crate::graphics::{DrawCall, GraphicsBackend};
use crate::world::World;
use ecosim_data::{Living, Physical, Sprite, Vertex};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub vertices: u64,
}

/// Submits one draw call per renderable entity.
///
/// Producers are drawn first and predators last so higher trophic ranks end
/// up on top; entities without a [`Living`] component go underneath everything.
pub fn render_entities(world: &World, graphics: &mut dyn GraphicsBackend) -> Result<RenderStats> {
    let mut calls: Vec<(Option<u8>, u64, DrawCall)> = world
        .ecs
        .query::<(&Physical, &Vertex, &Sprite, Option<&Living>)>()
        .iter()
        .map(|(entity, (physical, vertex, sprite, living))| {
            let call = DrawCall {
                entity,
                vao: vertex.vao,
                vertex_count: vertex.vertex_count,
                texture: sprite.texture,
                pos: physical.pos,
                rotation: physical.rotation,
                width: physical.width,
                height: physical.height,
            };
            (
                living.map(|l| l.species().trophic_rank()),
                entity.to_bits().get(),
                call,
            )
        })
        .collect();
    calls.sort_by_key(|(rank, bits, _)| (*rank, *bits));

    graphics.begin_frame()?;
    let mut stats = RenderStats::default();
    for (_, _, call) in &calls {
        graphics.draw(call);
        stats.draw_calls += 1;
        stats.vertices += u64::from(call.vertex_count);
    }
    graphics.end_frame()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::graphics::{HeadlessWindow, QUAD_VERTEX_COUNT};
    use ecosim_data::{Species, Texture};
    use glam::Vec2;

    #[test]
    fn test_draw_order_follows_trophic_rank() {
        let mut config = AppConfig::default();
        config.world.seed = Some(2);
        let mut world = World::new(config).expect("valid config");
        let mut window = HeadlessWindow::new();
        let fox = world
            .spawn_organism(&mut window, Species::Fox, Vec2::new(1.0, 1.0), 0.0)
            .expect("spawn");
        let grass = world
            .spawn_organism(&mut window, Species::Grass, Vec2::new(2.0, 2.0), 0.0)
            .expect("spawn");
        let lemming = world
            .spawn_organism(&mut window, Species::Lemming, Vec2::new(3.0, 3.0), 0.0)
            .expect("spawn");
        let vertex = window.create_quad(4.0, 4.0).expect("quad");
        let marker = world.ecs.spawn((
            Physical::new(Vec2::new(4.0, 4.0), 0.0, 0.0, 4.0, 4.0),
            vertex,
            Sprite::new(Texture::Placeholder),
        ));

        let stats = render_entities(&world, &mut window).expect("render");
        assert_eq!(stats.draw_calls, 4);
        assert_eq!(stats.vertices, 4 * u64::from(QUAD_VERTEX_COUNT));

        let order: Vec<hecs::Entity> = window.last_frame().iter().map(|c| c.entity).collect();
        assert_eq!(order, vec![marker, grass, lemming, fox]);
        assert_eq!(window.last_frame()[3].texture, Texture::Fox);
        assert_eq!(window.last_frame()[3].pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_entities_without_sprite_are_skipped() {
        let mut world = World::new(AppConfig::default()).expect("valid config");
        world
            .ecs
            .spawn((Physical::new(Vec2::ZERO, 0.0, 0.0, 1.0, 1.0),));
        let mut window = HeadlessWindow::new();
        let stats = render_entities(&world, &mut window).expect("render");
        assert_eq!(stats, RenderStats::default());
        assert!(window.last_frame().is_empty());
    }
}
