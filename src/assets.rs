//! Image assets
//!
//! Everything is generated procedurally at startup - no files or network
//! fetches. Building the set is the only place asset errors can occur, and
//! the hosts treat them as fatal before the first frame runs.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::{UVec2, Vec2};
use thiserror::Error;

use crate::consts::{HEIGHT_PX, WIDTH_PX};
use crate::renderer::Rgba;
use crate::sim::ImageId;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{0}` is missing")]
    Missing(&'static str),
    #[error("asset `{name}` could not be decoded: {reason}")]
    Decode { name: &'static str, reason: String },
    #[error("asset `{0}` has no pixels")]
    EmptyImage(&'static str),
}

/// A decoded, ready-to-draw RGBA image
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self, String> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(format!("expected {expected} pixels, got {}", pixels.len()));
        }
        Ok(Self { width, height, pixels })
    }

    /// Decode a tightly packed RGBA8 buffer supplied by the host
    pub fn from_rgba_bytes(name: &'static str, width: u32, height: u32, bytes: &[u8]) -> Result<Self, AssetError> {
        let pixels: &[Rgba] = bytemuck::try_cast_slice(bytes).map_err(|e| AssetError::Decode {
            name,
            reason: e.to_string(),
        })?;
        Self::new(width, height, pixels.to_vec()).map_err(|reason| AssetError::Decode { name, reason })
    }

    /// Build an image by evaluating `f` at every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Supplies images by logical id
pub trait AssetProvider {
    fn image(&self, id: ImageId) -> Result<&Image, AssetError>;

    fn image_size(&self, id: ImageId) -> Result<UVec2, AssetError> {
        self.image(id).map(Image::size)
    }
}

/// The resolved image set
#[derive(Debug, Clone, Default)]
pub struct Assets {
    images: HashMap<ImageId, Image>,
}

impl Assets {
    /// Assemble an asset set, rejecting empty images and missing ids
    pub fn from_images(images: impl IntoIterator<Item = (ImageId, Image)>) -> Result<Self, AssetError> {
        let images: HashMap<_, _> = images.into_iter().collect();
        for id in ImageId::ALL {
            match images.get(&id) {
                None => return Err(AssetError::Missing(id.name())),
                Some(img) if img.is_empty() => return Err(AssetError::EmptyImage(id.name())),
                Some(_) => {}
            }
        }
        Ok(Self { images })
    }

    /// Generate the built-in art
    pub fn builtin() -> Result<Self, AssetError> {
        let assets = Self::from_images([
            (ImageId::Neutron, neutron()),
            (ImageId::Rod, rod()),
            (ImageId::Fuel, fuel()),
            (ImageId::Background, background()),
            (ImageId::Intro, intro()),
        ])?;
        log::info!("Generated {} built-in images", assets.images.len());
        Ok(assets)
    }
}

impl AssetProvider for Assets {
    fn image(&self, id: ImageId) -> Result<&Image, AssetError> {
        self.images.get(&id).ok_or(AssetError::Missing(id.name()))
    }
}

// === Procedural art ===

fn neutron() -> Image {
    let center = Vec2::splat(4.0);
    Image::from_fn(8, 8, |x, y| {
        let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center).length();
        if d < 2.0 {
            Rgba::WHITE
        } else if d < 3.8 {
            Rgba::opaque(90, 170, 255)
        } else {
            Rgba::TRANSPARENT
        }
    })
}

fn rod() -> Image {
    Image::from_fn(8, 48, |x, y| {
        let edge = x == 0 || x == 7 || y == 0 || y == 47;
        match (edge, y % 8 == 4) {
            (true, _) => Rgba::opaque(40, 40, 48),
            (false, true) => Rgba::opaque(110, 110, 125),
            (false, false) => Rgba::opaque(170, 170, 185),
        }
    })
}

fn fuel() -> Image {
    Image::from_fn(32, 240, |x, y| {
        let cladding = x < 2 || x > 29;
        let pellet_gap = y % 20 == 0;
        if cladding {
            Rgba::opaque(60, 70, 60)
        } else if pellet_gap {
            Rgba::opaque(20, 90, 30)
        } else {
            // brighter toward the core of the rod
            let glow = 1.0 - ((x as f32 - 15.5).abs() / 16.0);
            Rgba::opaque(30, (120.0 + 120.0 * glow) as u8, 50)
        }
    })
}

fn background() -> Image {
    Image::from_fn(WIDTH_PX as u32, HEIGHT_PX as u32, |x, y| {
        if x % 32 == 0 || y % 32 == 0 {
            Rgba::opaque(18, 26, 40)
        } else {
            let shade = (8.0 + 16.0 * (y as f32 / HEIGHT_PX as f32)) as u8;
            Rgba::opaque(shade / 2, shade / 2, shade)
        }
    })
}

/// Radiation trefoil banner
fn intro() -> Image {
    let center = Vec2::new(WIDTH_PX as f32 / 2.0, HEIGHT_PX as f32 / 2.0);
    let yellow = Rgba::opaque(250, 210, 20);
    Image::from_fn(WIDTH_PX as u32, HEIGHT_PX as u32, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
        let r = p.length();
        let blade = (p.y.atan2(p.x).rem_euclid(TAU) / TAU * 6.0) as u32 % 2 == 0;
        if r < 14.0 || (blade && (22.0..80.0).contains(&r)) {
            yellow
        } else {
            Rgba::TRANSPARENT
        }
    })
}
