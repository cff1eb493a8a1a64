//! Neutrons and the slot pool that spawns them
//!
//! The pool is a growable list of optional slots. An empty slot is free for a
//! spawn on the next frame divisible by `SPAWN_INTERVAL`; a new slot (lane) is
//! appended every `EPOCH_FRAMES`. Slots are only removed by `reset`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Behavior, Direction, Entity, ImageId};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neutron {
    pub entity: Entity,
}

impl Neutron {
    pub fn new(pos: Vec2, direction: Direction) -> Self {
        Self {
            entity: Entity::new(Some(ImageId::Neutron), pos, Behavior::NeutronMoving(direction)),
        }
    }

    /// The opening neutron of every run
    pub fn forced() -> Self {
        Self::new(Vec2::new(FORCED_SPAWN_X, FORCED_SPAWN_Y), Direction::Right)
    }

    /// Spawn for slot `index`: even slots enter from the left, odd from the right
    pub fn for_slot(index: usize) -> Self {
        let lane = (LANE_SPACING as usize * (index + 1)) % HEIGHT_PX;
        if index % 2 == 0 {
            Self::new(Vec2::new(EDGE_MARGIN, lane as f32), Direction::Right)
        } else {
            Self::new(Vec2::new(WIDTH - EDGE_MARGIN, lane as f32), Direction::Left)
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.entity.behavior {
            Behavior::NeutronMoving(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }
}

/// What the pool did at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStep {
    /// Frame 0: slot 0 was (re)seeded and nothing else runs this frame
    Seeded,
    /// Normal frame, after any epoch growth
    Run,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutronPool {
    slots: Vec<Option<Neutron>>,
}

impl Default for NeutronPool {
    fn default() -> Self {
        let mut slots = Vec::with_capacity(POOL_HEADROOM);
        slots.push(None);
        Self { slots }
    }
}

impl NeutronPool {
    /// Back to a single slot holding the opening neutron
    pub fn reset(&mut self) {
        self.slots.truncate(1);
        if self.slots.is_empty() {
            self.slots.push(None);
        }
        self.slots[0] = Some(Neutron::forced());
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<Neutron>] {
        &self.slots
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<Neutron>> {
        self.slots.get_mut(index)
    }

    /// Live neutrons in slot order
    pub fn active(&self) -> impl Iterator<Item = &Neutron> {
        self.slots.iter().flatten()
    }

    /// Frame-start bookkeeping: forced seed on frame 0, growth on epochs
    pub fn begin_frame(&mut self, frame: u32) -> PoolStep {
        if frame == 0 {
            match self.slots.first_mut() {
                Some(slot) => *slot = Some(Neutron::forced()),
                None => self.slots.push(Some(Neutron::forced())),
            }
            return PoolStep::Seeded;
        }
        if frame % EPOCH_FRAMES == 0 {
            self.slots.push(None);
            log::debug!("Neutron pool grew to {} slots at frame {frame}", self.slots.len());
        }
        PoolStep::Run
    }

    /// Fill slot `index` if it is empty and the frame is on the spawn cadence.
    /// Returns true when a neutron was created.
    pub fn try_spawn(&mut self, index: usize, frame: u32) -> bool {
        if frame % SPAWN_INTERVAL != 0 {
            return false;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        let neutron = Neutron::for_slot(index);
        log::trace!("Spawned neutron in slot {index} at {:?}", neutron.pos());
        *slot = Some(neutron);
        true
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_empty_slot() {
        let pool = NeutronPool::default();
        assert_eq!(pool.len(), 1);
        assert!(pool.slots()[0].is_none());
        assert!(pool.slots.capacity() >= POOL_HEADROOM);
    }

    #[test]
    fn test_slot_lanes_and_sides() {
        let n0 = Neutron::for_slot(0);
        assert_eq!(n0.pos(), Vec2::new(48.0, 32.0));
        assert_eq!(n0.direction(), Some(Direction::Right));

        let n1 = Neutron::for_slot(1);
        assert_eq!(n1.pos(), Vec2::new(272.0, 64.0));
        assert_eq!(n1.direction(), Some(Direction::Left));

        // Lane wraps at the screen height: 32 * 8 = 256 -> 16
        assert_eq!(Neutron::for_slot(7).pos().y, 16.0);
        // 32 * 15 = 480 -> 0
        assert_eq!(Neutron::for_slot(14).pos().y, 0.0);
    }

    #[test]
    fn test_frame_zero_seeds_without_growth() {
        let mut pool = NeutronPool::default();
        assert_eq!(pool.begin_frame(0), PoolStep::Seeded);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.slots()[0], Some(Neutron::forced()));
    }

    #[test]
    fn test_growth_on_epochs() {
        let mut pool = NeutronPool::default();
        assert_eq!(pool.begin_frame(599), PoolStep::Run);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.begin_frame(600), PoolStep::Run);
        assert_eq!(pool.len(), 2);
        pool.begin_frame(1200);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_growth_past_headroom() {
        let mut pool = NeutronPool::default();
        for epoch in 1..=20 {
            pool.begin_frame(epoch * EPOCH_FRAMES);
        }
        assert_eq!(pool.len(), 21);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut pool = NeutronPool::default();
        assert!(!pool.try_spawn(0, 59));
        assert!(pool.try_spawn(0, 60));
        // Occupied slot never respawns
        assert!(!pool.try_spawn(0, 120));
        // Out of range
        assert!(!pool.try_spawn(5, 120));

        pool.clear(0);
        assert!(pool.try_spawn(0, 120));
    }

    #[test]
    fn test_reset_truncates() {
        let mut pool = NeutronPool::default();
        pool.begin_frame(600);
        pool.begin_frame(1200);
        pool.try_spawn(1, 1200);
        pool.reset();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.active().count(), 1);
        assert_eq!(pool.slots()[0], Some(Neutron::forced()));
    }
}
