pub mod renderer;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ecosim_core::error::SimError;
use ecosim_core::graphics::{DrawCall, GraphicsBackend, Window, QUAD_VERTEX_COUNT};
use ecosim_data::{ArrayId, BufferId, Vertex};
use glam::Vec2;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use renderer::WorldWidget;
use std::collections::HashSet;
use std::io::{self, Stdout};
use std::time::Duration;

pub struct Tui {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn init(&mut self) -> Result<()> {
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        enable_raw_mode()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

fn graphics_err(err: impl std::fmt::Display) -> SimError {
    SimError::graphics(err.to_string())
}

/// True for the keys that close the window: `q`, `Esc` and `Ctrl-C`.
pub fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// A [`Window`] that draws sprites as coloured glyphs in the terminal.
///
/// Buffer handles are bookkeeping only; each frame is redrawn from the
/// submitted draw calls.
pub struct TerminalWindow {
    tui: Tui,
    world_size: Vec2,
    next_id: u32,
    live: HashSet<ArrayId>,
    pending: Vec<DrawCall>,
    in_frame: bool,
    frames: u64,
    close_requested: bool,
}

impl TerminalWindow {
    /// Enters the alternate screen. The terminal is restored on drop.
    pub fn new(world_width: f32, world_height: f32) -> Result<Self> {
        let mut tui = Tui::new()?;
        tui.init()?;
        Ok(Self {
            tui,
            world_size: Vec2::new(world_width, world_height),
            next_id: 0,
            live: HashSet::new(),
            pending: Vec::new(),
            in_frame: false,
            frames: 0,
            close_requested: false,
        })
    }

    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Leaves the alternate screen explicitly so errors can be reported.
    pub fn shutdown(mut self) -> Result<()> {
        self.tui.exit()
    }

    fn next_handle(&mut self) -> ecosim_core::Result<u32> {
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| SimError::graphics("buffer ids exhausted"))?;
        Ok(self.next_id)
    }
}

impl GraphicsBackend for TerminalWindow {
    fn create_quad(&mut self, width: f32, height: f32) -> ecosim_core::Result<Vertex> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SimError::graphics(format!(
                "invalid quad size {width}x{height}"
            )));
        }
        let vbo = BufferId(self.next_handle()?);
        let vao = ArrayId(self.next_handle()?);
        self.live.insert(vao);
        Ok(Vertex::new(QUAD_VERTEX_COUNT, vbo, vao))
    }

    fn release(&mut self, vertex: &Vertex) {
        if !self.live.remove(&vertex.vao) {
            tracing::warn!(vao = vertex.vao.0, "Releasing unknown vertex array");
        }
    }

    fn begin_frame(&mut self) -> ecosim_core::Result<()> {
        if self.in_frame {
            return Err(SimError::graphics("begin_frame called twice"));
        }
        self.in_frame = true;
        self.pending.clear();
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) {
        self.pending.push(*call);
    }

    fn end_frame(&mut self) -> ecosim_core::Result<()> {
        if !self.in_frame {
            return Err(SimError::graphics("end_frame without begin_frame"));
        }
        self.in_frame = false;
        self.frames += 1;

        let calls = &self.pending;
        let world_size = self.world_size;
        let frame = self.frames;
        self.tui
            .terminal
            .draw(|f| {
                f.render_widget(WorldWidget::new(calls, world_size, frame), f.area());
            })
            .map_err(graphics_err)?;
        Ok(())
    }
}

impl Window for TerminalWindow {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn poll_events(&mut self) -> ecosim_core::Result<()> {
        while event::poll(Duration::ZERO).map_err(graphics_err)? {
            if let Event::Key(key) = event::read().map_err(graphics_err)? {
                if key.kind == KeyEventKind::Press && is_quit_key(key.code, key.modifiers) {
                    tracing::info!("Quit requested from terminal");
                    self.close_requested = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_quit_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_quit_key(KeyCode::Enter, KeyModifiers::NONE));
    }
}
