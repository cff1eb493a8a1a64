//! Entity model shared by every drawable/updatable thing on screen
//!
//! Positions are screen-space centers: an entity's image is drawn (and its
//! collision box placed) with its top-left at `pos - size / 2`.

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::ROD_FALL_SPEED;
use crate::platform::{Surface, SurfaceError};

/// Logical image names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageId {
    Fuel,
    Neutron,
    Rod,
    Background,
    Intro,
}

impl ImageId {
    pub const ALL: [ImageId; 5] = [
        ImageId::Fuel,
        ImageId::Neutron,
        ImageId::Rod,
        ImageId::Background,
        ImageId::Intro,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ImageId::Fuel => "fuel",
            ImageId::Neutron => "neutron",
            ImageId::Rod => "rod",
            ImageId::Background => "background",
            ImageId::Intro => "intro",
        }
    }
}

/// Horizontal travel direction of a neutron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    pub fn step(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }
}

/// Per-frame behavior attached to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Nothing happens on update
    Static,
    /// Moves one pixel per frame
    NeutronMoving(Direction),
    /// Control rod dropping through the core
    RodFalling,
    /// Intro banner scrolling upward
    IntroScroll,
    /// Random full-screen color every frame
    MeltdownFlicker,
    /// Failure text with delayed retry prompt
    MeltdownMessage,
}

/// Color transform applied when drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    /// Hue rotation in radians
    pub hue: f32,
}

/// Integer pixel rectangle, half-open on the max edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub fn new(min: IVec2, size: UVec2) -> Self {
        Self {
            min,
            max: min + size.as_ivec2(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// True when the rectangles share at least one pixel (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A drawable/updatable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    /// `None` means the entity takes part in logic only
    pub image: Option<ImageId>,
    pub tint: Option<Tint>,
    pub behavior: Behavior,
}

impl Entity {
    pub fn new(image: Option<ImageId>, pos: Vec2, behavior: Behavior) -> Self {
        Self {
            pos,
            image,
            tint: None,
            behavior,
        }
    }

    pub fn sprite(image: ImageId, pos: Vec2) -> Self {
        Self::new(Some(image), pos, Behavior::Static)
    }

    /// Apply one frame of motion for the movement behaviors
    pub fn advance(&mut self) {
        match self.behavior {
            Behavior::NeutronMoving(dir) => self.pos.x += dir.step(),
            Behavior::RodFalling => self.pos.y += ROD_FALL_SPEED,
            Behavior::Static
            | Behavior::IntroScroll
            | Behavior::MeltdownFlicker
            | Behavior::MeltdownMessage => {}
        }
    }

    /// Top-left corner for an image of `size` centered on `pos`
    pub fn top_left(&self, size: UVec2) -> Vec2 {
        self.pos - size.as_vec2() / 2.0
    }

    /// Collision box for an image of `size` centered on `pos`
    pub fn bounds(&self, size: UVec2) -> Rect {
        // `as i32` truncates toward zero, matching integer pixel conversion
        let tl = self.top_left(size);
        Rect::new(IVec2::new(tl.x as i32, tl.y as i32), size)
    }

    /// Draw centered on `pos`; image-less entities draw nothing
    pub fn draw(&self, surface: &mut dyn Surface, size: UVec2) -> Result<(), SurfaceError> {
        match self.image {
            Some(image) => surface.draw_image(image, self.top_left(size), self.tint),
            None => Ok(()),
        }
    }
}
