//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Frame-stepped only (one call per display refresh, no wall clock)
//! - Seeded RNG only
//! - Fixed update order (the active actor list)
//! - Drawing goes through the `platform::Surface` seam

pub mod collision;
pub mod entity;
pub mod fuel;
pub mod neutron;
pub mod rod;
pub mod state;
pub mod tick;

pub use collision::{Fate, edge_exit, resolve};
pub use entity::{Behavior, Direction, Entity, ImageId, Rect, Tint};
pub use fuel::{FuelRod, FuelStatus, Side};
pub use neutron::{Neutron, NeutronPool, PoolStep};
pub use rod::ControlRod;
pub use state::{Actor, Extents, GamePhase, SimError, SimOptions, SimulationState, Snapshot, SoundCue};
pub use tick::frame;
