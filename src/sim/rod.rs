//! The player's control rod
//!
//! Two states: Parked (off-screen at the park position) and Falling (dropped
//! at the pointer's x, sinking 2px per frame until it leaves the bottom).

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{Behavior, Entity, ImageId, Rect};
use crate::consts::*;
use crate::platform::FrameInput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRod {
    pub entity: Entity,
}

impl Default for ControlRod {
    fn default() -> Self {
        Self {
            entity: Entity::sprite(ImageId::Rod, Self::park_position()),
        }
    }
}

impl ControlRod {
    pub fn park_position() -> Vec2 {
        Vec2::new(ROD_PARK_X, ROD_PARK_Y)
    }

    pub fn is_parked(&self) -> bool {
        self.entity.pos.y == ROD_PARK_Y
    }

    pub fn is_falling(&self) -> bool {
        self.entity.behavior == Behavior::RodFalling
    }

    pub fn park(&mut self) {
        self.entity.pos = Self::park_position();
        self.entity.behavior = Behavior::Static;
    }

    /// Start a drop at `x` if the rod is parked. Returns false while falling.
    pub fn drop_at(&mut self, x: f32) -> bool {
        if !self.is_parked() {
            return false;
        }
        self.entity.pos = Vec2::new(x, ROD_DROP_Y);
        self.entity.behavior = Behavior::RodFalling;
        log::debug!("Control rod dropped at x={x}");
        true
    }

    /// Per-frame update: pointer press drops a parked rod, then gravity applies
    pub fn update(&mut self, input: &FrameInput) {
        if input.pointer_held {
            self.drop_at(input.pointer.x);
        }
        if self.is_falling() {
            self.entity.advance();
            if self.entity.pos.y > HEIGHT + ROD_EXIT_MARGIN {
                self.park();
            }
        }
    }

    pub fn bounds(&self, size: UVec2) -> Rect {
        self.entity.bounds(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_and_fall() {
        let mut rod = ControlRod::default();
        assert!(rod.is_parked());

        rod.update(&FrameInput::click_at(100.0));
        assert!(rod.is_falling());
        // Drop and first fall step happen in the same frame
        assert_eq!(rod.entity.pos, Vec2::new(100.0, ROD_DROP_Y + ROD_FALL_SPEED));

        rod.update(&FrameInput::default());
        assert_eq!(rod.entity.pos.y, ROD_DROP_Y + 2.0 * ROD_FALL_SPEED);
    }

    #[test]
    fn test_press_while_falling_is_ignored() {
        let mut rod = ControlRod::default();
        rod.update(&FrameInput::click_at(100.0));
        let mut expected = rod.entity.pos;

        for x in [10.0, 200.0, 300.0] {
            rod.update(&FrameInput::click_at(x));
            expected.y += ROD_FALL_SPEED;
            assert_eq!(rod.entity.pos, expected);
        }
    }

    #[test]
    fn test_parks_after_leaving_bottom() {
        let mut rod = ControlRod::default();
        rod.update(&FrameInput::click_at(50.0));

        let mut frames = 1;
        while rod.is_falling() {
            rod.update(&FrameInput::default());
            frames += 1;
        }
        assert!(rod.is_parked());
        assert_eq!(rod.entity.pos, ControlRod::park_position());
        // -32 -> 274 in 2px steps
        assert_eq!(frames, 153);

        // Droppable again once parked
        assert!(rod.drop_at(70.0));
    }
}
