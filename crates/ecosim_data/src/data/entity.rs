use super::living::Species;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Placement of an entity on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physical {
    pub pos: Vec2,
    /// Heading in degrees, 0 pointing along +x and growing counter-clockwise.
    pub rotation: f32,
    /// Scalar speed along the heading, in world units per second.
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
}

impl Physical {
    pub fn new(pos: Vec2, rotation: f32, velocity: f32, width: f32, height: f32) -> Self {
        Self {
            pos,
            rotation,
            velocity,
            width,
            height,
        }
    }
}

/// Identifier of a vertex buffer owned by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub u32);

/// Identifier of a vertex array owned by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArrayId(pub u32);

/// GPU-side geometry of an entity.
///
/// The handles are opaque; only the backend that issued them can release them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub vertex_count: u32,
    pub vbo: BufferId,
    pub vao: ArrayId,
}

impl Vertex {
    pub fn new(vertex_count: u32, vbo: BufferId, vao: ArrayId) -> Self {
        Self {
            vertex_count,
            vbo,
            vao,
        }
    }
}

/// Sprite textures known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Texture {
    Grass,
    Lemming,
    Fox,
    Placeholder,
}

impl Texture {
    pub fn for_species(species: Species) -> Self {
        match species {
            Species::Grass => Texture::Grass,
            Species::Lemming => Texture::Lemming,
            Species::Fox => Texture::Fox,
        }
    }
}

/// Texture used to draw an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: Texture,
}

impl Sprite {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }
}

/// Parameters consumed by the targeting system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behaviour {
    /// Energy at which hunger is satisfied and the organism looks for a mate instead.
    pub saturated: f32,
    /// Detection distance in world units.
    pub range: f32,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Behaviour {
    pub fn new(saturated: f32, range: f32, fov: f32) -> Self {
        Self {
            saturated,
            range,
            fov,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_keeps_constructor_arguments() {
        let p = Physical::new(Vec2::new(100.0, 300.0), 15.0, 8.0, 16.0, 12.0);
        assert_eq!(p.pos, Vec2::new(100.0, 300.0));
        assert_eq!(p.rotation, 15.0);
        assert_eq!(p.velocity, 8.0);
        assert_eq!(p.width, 16.0);
        assert_eq!(p.height, 12.0);
    }

    #[test]
    fn test_vertex_keeps_handles() {
        let v = Vertex::new(6, BufferId(3), ArrayId(7));
        assert_eq!(v.vertex_count, 6);
        assert_eq!(v.vbo, BufferId(3));
        assert_eq!(v.vao, ArrayId(7));
    }

    #[test]
    fn test_sprite_and_behaviour_keep_arguments() {
        assert_eq!(Sprite::new(Texture::Fox).texture, Texture::Fox);

        let b = Behaviour::new(80.0, 120.0, 270.0);
        assert_eq!(b.saturated, 80.0);
        assert_eq!(b.range, 120.0);
        assert_eq!(b.fov, 270.0);
    }

    #[test]
    fn test_texture_for_species() {
        assert_eq!(Texture::for_species(Species::Grass), Texture::Grass);
        assert_eq!(Texture::for_species(Species::Lemming), Texture::Lemming);
        assert_eq!(Texture::for_species(Species::Fox), Texture::Fox);
    }

    #[test]
    fn test_physical_serde_shape() {
        let p = Physical::new(Vec2::new(1.0, 2.0), 90.0, 0.5, 4.0, 4.0);
        let json = serde_json::to_value(p).expect("serialize");
        assert_eq!(json["rotation"], 90.0);
        assert_eq!(json["pos"][0], 1.0);
    }
}
