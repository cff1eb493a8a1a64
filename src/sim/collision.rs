//! Neutron collision resolution
//!
//! Checked once per live neutron after it moves. Order matters: touching the
//! control rod wins over crossing an edge in the same frame.

use glam::UVec2;

use super::entity::{Entity, Rect};
use super::fuel::Side;
use crate::consts::{EDGE_MARGIN, WIDTH};

/// What happens to a neutron this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Absorbed by the control rod
    Caught,
    /// Left the core on `Side`, striking that fuel rod
    Escaped(Side),
    /// Still in flight
    Active,
}

/// Edge test on the raw center x. Strict comparisons: a neutron sitting
/// exactly on the margin is still inside.
pub fn edge_exit(x: f32) -> Option<Side> {
    if x > WIDTH - EDGE_MARGIN {
        Some(Side::Right)
    } else if x < EDGE_MARGIN {
        Some(Side::Left)
    } else {
        None
    }
}

pub fn resolve(neutron: &Entity, neutron_size: UVec2, rod_box: &Rect) -> Fate {
    if neutron.bounds(neutron_size).intersects(rod_box) {
        return Fate::Caught;
    }
    match edge_exit(neutron.pos.x) {
        Some(side) => Fate::Escaped(side),
        None => Fate::Active,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::entity::ImageId;

    const NEUTRON: UVec2 = UVec2::new(8, 8);
    const ROD: UVec2 = UVec2::new(8, 48);

    fn at(x: f32, y: f32) -> Entity {
        Entity::sprite(ImageId::Neutron, Vec2::new(x, y))
    }

    fn rod_at(x: f32, y: f32) -> Rect {
        Entity::sprite(ImageId::Rod, Vec2::new(x, y)).bounds(ROD)
    }

    #[test]
    fn test_edge_comparators_are_strict() {
        assert_eq!(edge_exit(272.0), None);
        assert_eq!(edge_exit(273.0), Some(Side::Right));
        assert_eq!(edge_exit(48.0), None);
        assert_eq!(edge_exit(47.0), Some(Side::Left));
        assert_eq!(edge_exit(160.0), None);
    }

    #[test]
    fn test_active_in_open_space() {
        let parked = rod_at(-320.0, -240.0);
        assert_eq!(resolve(&at(160.0, 100.0), NEUTRON, &parked), Fate::Active);
    }

    #[test]
    fn test_escape_sides() {
        let parked = rod_at(-320.0, -240.0);
        assert_eq!(resolve(&at(273.0, 32.0), NEUTRON, &parked), Fate::Escaped(Side::Right));
        assert_eq!(resolve(&at(47.0, 64.0), NEUTRON, &parked), Fate::Escaped(Side::Left));
    }

    #[test]
    fn test_rod_beats_edge() {
        // Neutron just past the right margin, rod covering the same pixels
        let rod = rod_at(273.0, 32.0);
        assert_eq!(resolve(&at(273.0, 32.0), NEUTRON, &rod), Fate::Caught);
    }

    #[test]
    fn test_rod_overlap_uses_centered_boxes() {
        // Neutron box 100..108, rod box 108..116: touching, not overlapping
        let rod = rod_at(112.0, 100.0);
        assert_eq!(resolve(&at(104.0, 100.0), NEUTRON, &rod), Fate::Active);
        // One pixel closer overlaps
        assert_eq!(resolve(&at(105.0, 100.0), NEUTRON, &rod), Fate::Caught);
        // Vertically clear of the rod's 48px body
        assert_eq!(resolve(&at(112.0, 140.0), NEUTRON, &rod), Fate::Active);
    }
}
