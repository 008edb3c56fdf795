use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders, Widget};

use ecosim_core::graphics::DrawCall;
use ecosim_data::Texture;
use glam::Vec2;

/// Draws one frame of submitted sprites, scaling world coordinates down to
/// terminal cells.
pub struct WorldWidget<'a> {
    calls: &'a [DrawCall],
    world_size: Vec2,
    frame: u64,
}

impl<'a> WorldWidget<'a> {
    pub fn new(calls: &'a [DrawCall], world_size: Vec2, frame: u64) -> Self {
        Self {
            calls,
            world_size,
            frame,
        }
    }

    pub fn get_inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn symbol_for_texture(texture: Texture) -> char {
        match texture {
            Texture::Grass => '"',
            Texture::Lemming => 'o',
            Texture::Fox => 'F',
            Texture::Placeholder => '?',
        }
    }

    pub fn color_for_texture(texture: Texture) -> Color {
        match texture {
            Texture::Grass => Color::Rgb(34, 139, 34),
            Texture::Lemming => Color::Rgb(210, 180, 140),
            Texture::Fox => Color::Rgb(255, 69, 0),
            Texture::Placeholder => Color::Magenta,
        }
    }

    /// Maps a world position onto a cell inside the bordered area.
    pub fn world_to_screen(pos: Vec2, world_size: Vec2, area: Rect) -> Option<(u16, u16)> {
        let inner = Self::get_inner_area(area);
        if inner.width == 0 || inner.height == 0 || world_size.x <= 0.0 || world_size.y <= 0.0 {
            return None;
        }
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > world_size.x || pos.y > world_size.y {
            return None;
        }
        let cols = f32::from(inner.width);
        let rows = f32::from(inner.height);
        let cx = ((pos.x / world_size.x) * cols).min(cols - 1.0) as u16;
        let cy = ((pos.y / world_size.y) * rows).min(rows - 1.0) as u16;
        Some((inner.x + cx, inner.y + cy))
    }
}

impl<'a> Widget for WorldWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(
                "Ecosim (Frame: {}, Sprites: {})",
                self.frame,
                self.calls.len()
            ))
            .borders(Borders::ALL);
        block.render(area, buf);

        // Calls arrive back to front, so later sprites overwrite earlier ones.
        for call in self.calls {
            if let Some((x, y)) = Self::world_to_screen(call.pos, self.world_size, area) {
                let cell = &mut buf[(x, y)];
                cell.set_symbol(&Self::symbol_for_texture(call.texture).to_string());
                cell.set_fg(Self::color_for_texture(call.texture));
            }
        }
    }
}
