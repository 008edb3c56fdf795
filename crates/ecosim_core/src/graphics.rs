//! Seam between the simulation and the windowing/graphics collaborator.
//!
//! The simulation never touches pixels. It asks a [`GraphicsBackend`] for
//! opaque buffer handles when an organism is spawned, hands them back on
//! despawn, and submits one [`DrawCall`] per visible entity each frame.

use crate::error::{Result, SimError};
use ecosim_data::{ArrayId, BufferId, Texture, Vertex};
use glam::Vec2;
use std::collections::HashSet;

/// Two triangles per sprite quad.
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Everything a backend needs to draw one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub entity: hecs::Entity,
    pub vao: ArrayId,
    pub vertex_count: u32,
    pub texture: Texture,
    pub pos: Vec2,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
}

pub trait GraphicsBackend {
    /// Allocates the buffers for a sprite quad of the given size.
    fn create_quad(&mut self, width: f32, height: f32) -> Result<Vertex>;

    /// Releases buffers previously returned by [`GraphicsBackend::create_quad`].
    fn release(&mut self, vertex: &Vertex);

    fn begin_frame(&mut self) -> Result<()>;

    fn draw(&mut self, call: &DrawCall);

    fn end_frame(&mut self) -> Result<()>;
}

/// A window that owns a graphics context and an event queue.
pub trait Window: GraphicsBackend {
    fn should_close(&self) -> bool;

    fn poll_events(&mut self) -> Result<()>;
}

/// Window without a display, for tests and batch runs.
///
/// Closes after `frame_limit` polls when a limit is set.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    next_id: u32,
    live: HashSet<ArrayId>,
    pending: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    in_frame: bool,
    frames_polled: u64,
    frame_limit: Option<u64>,
    close_requested: bool,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_limit(frames: u64) -> Self {
        Self {
            frame_limit: Some(frames),
            ..Self::default()
        }
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Number of quads currently allocated and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, vao: ArrayId) -> bool {
        self.live.contains(&vao)
    }

    /// Draw calls submitted during the last completed frame, in submission order.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames_polled(&self) -> u64 {
        self.frames_polled
    }

    fn next_handle(&mut self) -> Result<u32> {
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| SimError::graphics("buffer ids exhausted"))?;
        Ok(self.next_id)
    }
}

impl GraphicsBackend for HeadlessWindow {
    fn create_quad(&mut self, width: f32, height: f32) -> Result<Vertex> {
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

    fn begin_frame(&mut self) -> Result<()> {
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

    fn end_frame(&mut self) -> Result<()> {
        if !self.in_frame {
            return Err(SimError::graphics("end_frame without begin_frame"));
        }
        self.in_frame = false;
        std::mem::swap(&mut self.pending, &mut self.last_frame);
        self.pending.clear();
        Ok(())
    }
}

impl Window for HeadlessWindow {
    fn should_close(&self) -> bool {
        self.close_requested
            || self
                .frame_limit
                .is_some_and(|limit| self.frames_polled >= limit)
    }

    fn poll_events(&mut self) -> Result<()> {
        self.frames_polled += 1;
        Ok(())
    }
}
