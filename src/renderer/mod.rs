//! Software rendering
//!
//! The game draws into a 320x240 RGBA canvas; hosts blit the finished frame.

pub mod color;

pub use color::{Rgba, hue_rotation};

use glam::Vec2;

use crate::assets::{AssetProvider, Assets};
use crate::consts::{HEIGHT_PX, WIDTH_PX};
use crate::platform::{Surface, SurfaceError};
use crate::sim::{ImageId, Tint};

/// CPU framebuffer plus a text overlay for status messages
pub struct Canvas {
    assets: Assets,
    pixels: Vec<Rgba>,
    overlay: Vec<String>,
}

impl Canvas {
    pub fn new(assets: Assets) -> Self {
        Self {
            assets,
            pixels: vec![Rgba::BLACK; WIDTH_PX * HEIGHT_PX],
            overlay: Vec::new(),
        }
    }

    /// Clear pixels and overlay text
    pub fn begin_frame(&mut self) {
        self.pixels.fill(Rgba::BLACK);
        self.overlay.clear();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * WIDTH_PX + x]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Frame as RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Text printed this frame, in draw order
    pub fn overlay(&self) -> &[String] {
        &self.overlay
    }
}

impl Surface for Canvas {
    fn draw_image(&mut self, image: ImageId, top_left: Vec2, tint: Option<Tint>) -> Result<(), SurfaceError> {
        let img = self
            .assets
            .image(image)
            .map_err(|_| SurfaceError::UnknownImage(image))?;
        let matrix = tint.map(|t| hue_rotation(t.hue));

        // Integer placement, like a translate-only geometry matrix with nearest filtering
        let ox = top_left.x.floor() as i64;
        let oy = top_left.y.floor() as i64;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + img.width() as i64).min(WIDTH_PX as i64);
        let y1 = (oy + img.height() as i64).min(HEIGHT_PX as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let mut src = img.pixel((x - ox) as u32, (y - oy) as u32);
                if src.a == 0 {
                    continue;
                }
                if let Some(m) = &matrix {
                    src = src.transform(m);
                }
                let dst = &mut self.pixels[y as usize * WIDTH_PX + x as usize];
                *dst = dst.blend(src);
            }
        }
        Ok(())
    }

    fn fill(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        self.pixels.fill(color);
        Ok(())
    }

    fn debug_print(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.overlay.push(text.to_owned());
        Ok(())
    }
}
