//! Fuel rods: hit counters that overheat and trigger the meltdown

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, ImageId, Tint};
use crate::consts::*;

/// Which edge of the core a fuel rod guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Result of a fuel rod's per-frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelStatus {
    Stable,
    /// Took more hits than it can survive
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRod {
    pub side: Side,
    pub entity: Entity,
    pub hits: u32,
}

impl FuelRod {
    pub fn new(side: Side) -> Self {
        let x = match side {
            Side::Left => FUEL_INSET,
            Side::Right => WIDTH - FUEL_INSET,
        };
        Self {
            side,
            entity: Entity::sprite(ImageId::Fuel, Vec2::new(x, HEIGHT / 2.0)),
            hits: 0,
        }
    }

    /// A neutron escaped past this rod's edge
    pub fn record_hit(&mut self) {
        self.hits += 1;
        log::debug!("{:?} fuel rod hit ({} total)", self.side, self.hits);
    }

    pub fn reset(&mut self) {
        self.hits = 0;
        self.entity.tint = None;
    }

    pub fn is_critical(&self) -> bool {
        self.hits > FUEL_HIT_LIMIT
    }

    /// Heat tint as a pure function of the hit count
    pub fn tint(&self) -> Tint {
        Tint {
            hue: PI * (self.hits as f32 * FUEL_HUE_STEP),
        }
    }

    /// Refresh the heat tint, or report that the rod has gone critical
    pub fn update(&mut self) -> FuelStatus {
        if self.is_critical() {
            return FuelStatus::Critical;
        }
        self.entity.tint = Some(self.tint());
        FuelStatus::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        assert_eq!(FuelRod::new(Side::Left).entity.pos, Vec2::new(16.0, 120.0));
        assert_eq!(FuelRod::new(Side::Right).entity.pos, Vec2::new(304.0, 120.0));
    }

    #[test]
    fn test_critical_after_ten_hits() {
        let mut fuel = FuelRod::new(Side::Left);
        for _ in 0..9 {
            fuel.record_hit();
        }
        assert_eq!(fuel.update(), FuelStatus::Stable);
        fuel.record_hit();
        assert_eq!(fuel.hits, 10);
        assert_eq!(fuel.update(), FuelStatus::Critical);

        fuel.reset();
        assert_eq!(fuel.hits, 0);
        assert_eq!(fuel.update(), FuelStatus::Stable);
    }

    #[test]
    fn test_tint_depends_only_on_hits() {
        let mut fuel = FuelRod::new(Side::Right);
        fuel.update();
        assert_eq!(fuel.entity.tint, Some(Tint { hue: 0.0 }));

        fuel.hits = 4;
        fuel.update();
        let first = fuel.entity.tint;
        fuel.update();
        assert_eq!(fuel.entity.tint, first);
        assert!((fuel.tint().hue - 0.2 * PI).abs() < 1e-6);
    }
}
