//! Pixel color type and color-matrix helpers

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA pixel, laid out exactly as the host expects its frame bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    fn rgb(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    fn from_rgb(rgb: Vec3, a: u8) -> Self {
        let c = rgb.clamp(Vec3::ZERO, Vec3::splat(255.0)).round();
        Self::new(c.x as u8, c.y as u8, c.z as u8, a)
    }

    /// Apply a 3x3 color matrix to the color channels, alpha untouched
    pub fn transform(self, m: &Mat3) -> Self {
        Self::from_rgb(*m * self.rgb(), self.a)
    }

    /// Source-over composite of `src` onto `self`
    pub fn blend(self, src: Rgba) -> Self {
        match src.a {
            0 => self,
            255 => src,
            a => {
                let t = a as f32 / 255.0;
                let rgb = src.rgb() * t + self.rgb() * (1.0 - t);
                let out_a = a as f32 + self.a as f32 * (1.0 - t);
                Self::from_rgb(rgb, out_a.round().min(255.0) as u8)
            }
        }
    }
}

// BT.601 full-range RGB <-> YCbCr, rows written out for readability
const RGB_TO_YCBCR: [f32; 9] = [
    0.299, 0.587, 0.114, //
    -0.168_736, -0.331_264, 0.5, //
    0.5, -0.418_688, -0.081_312,
];
const YCBCR_TO_RGB: [f32; 9] = [
    1.0, 0.0, 1.402, //
    1.0, -0.344_136, -0.714_136, //
    1.0, 1.772, 0.0,
];

fn row_major(m: &[f32; 9]) -> Mat3 {
    Mat3::from_cols_array(m).transpose()
}

/// Color matrix that rotates hue by `theta` radians while preserving luma
pub fn hue_rotation(theta: f32) -> Mat3 {
    let (s, c) = theta.sin_cos();
    let rotate = row_major(&[
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    ]);
    row_major(&YCBCR_TO_RGB) * rotate * row_major(&RGB_TO_YCBCR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_zero_rotation_is_identity() {
        let c = Rgba::opaque(200, 40, 90);
        assert_eq!(c.transform(&hue_rotation(0.0)), c);
    }

    #[test]
    fn test_rotation_keeps_grey_and_alpha() {
        let grey = Rgba::new(128, 128, 128, 77);
        assert_eq!(grey.transform(&hue_rotation(PI * 0.45)), grey);
    }

    #[test]
    fn test_half_turn_shifts_green_toward_magenta() {
        let green = Rgba::opaque(0, 200, 0);
        let out = green.transform(&hue_rotation(PI));
        assert!(out.r > out.g);
        assert!(out.b > out.g);
    }

    #[test]
    fn test_blend() {
        let dst = Rgba::BLACK;
        assert_eq!(dst.blend(Rgba::TRANSPARENT), dst);
        assert_eq!(dst.blend(Rgba::WHITE), Rgba::WHITE);

        let half = dst.blend(Rgba::new(255, 255, 255, 128));
        assert!((126..=130).contains(&half.r));
        assert_eq!(half.a, 255);
    }

    #[test]
    fn test_pod_layout() {
        let px = [Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)];
        let bytes: &[u8] = bytemuck::cast_slice(&px);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
