//! Platform abstraction layer
//!
//! The simulation only talks to the host through these seams:
//! - `Surface`: where entities draw themselves each frame
//! - `InputSource`: keyboard/mouse state, polled once per frame
//!
//! `FrameInput` is the per-frame snapshot the simulation actually reads.

use glam::Vec2;
use thiserror::Error;

use crate::renderer::Rgba;
use crate::sim::{ImageId, Tint};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no image loaded for {0:?}")]
    UnknownImage(ImageId),
    #[error("surface backend failed: {0}")]
    Backend(String),
}

/// A fixed-size drawing target (320x240 logical pixels)
pub trait Surface {
    /// Draw `image` with its top-left corner at `top_left`
    fn draw_image(&mut self, image: ImageId, top_left: Vec2, tint: Option<Tint>) -> Result<(), SurfaceError>;

    /// Fill the entire surface with a solid color
    fn fill(&mut self, color: Rgba) -> Result<(), SurfaceError>;

    /// Raw text overlay for status messages
    fn debug_print(&mut self, text: &str) -> Result<(), SurfaceError>;
}

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
}

/// Live input state exposed by the host
pub trait InputSource {
    fn is_key_held(&self, key: Key) -> bool;
    fn is_pointer_held(&self) -> bool;
    /// Pointer position in logical canvas coordinates
    fn pointer_position(&self) -> Vec2;
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Start key (space) held
    pub start: bool,
    /// Primary pointer button held
    pub pointer_held: bool,
    /// Pointer position in logical canvas coordinates
    pub pointer: Vec2,
}

impl FrameInput {
    pub fn poll(source: &dyn InputSource) -> Self {
        Self {
            start: source.is_key_held(Key::Space),
            pointer_held: source.is_pointer_held(),
            pointer: source.pointer_position(),
        }
    }

    /// Pointer pressed at `x` (convenience for tests and the autopilot)
    pub fn click_at(x: f32) -> Self {
        Self {
            pointer_held: true,
            pointer: Vec2::new(x, 0.0),
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Default::default()
        }
    }
}

/// Input state that hosts update from their event callbacks
#[derive(Debug, Clone, Default)]
pub struct HeldInput {
    pub space: bool,
    pub pointer_held: bool,
    pub pointer: Vec2,
}

impl InputSource for HeldInput {
    fn is_key_held(&self, key: Key) -> bool {
        match key {
            Key::Space => self.space,
        }
    }

    fn is_pointer_held(&self) -> bool {
        self.pointer_held
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_snapshots_source() {
        let held = HeldInput {
            space: true,
            pointer_held: true,
            pointer: Vec2::new(100.0, 50.0),
        };
        let input = FrameInput::poll(&held);
        assert!(input.start);
        assert!(input.pointer_held);
        assert_eq!(input.pointer, Vec2::new(100.0, 50.0));

        assert_eq!(FrameInput::poll(&HeldInput::default()), FrameInput::default());
    }
}
