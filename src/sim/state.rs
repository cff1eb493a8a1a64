//! Simulation state and core types
//!
//! Everything that used to be process-wide (frame counter, pool, rod, fuel
//! rods) is a field here and is threaded through the frame driver.

use glam::{UVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Behavior, Entity, ImageId};
use super::fuel::{FuelRod, Side};
use super::neutron::{Neutron, NeutronPool};
use super::rod::ControlRod;
use crate::assets::{AssetError, AssetProvider};
use crate::consts::*;
use crate::platform::SurfaceError;
use crate::renderer::Rgba;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("drawing failed: {0}")]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("neutron pool has no slots")]
    EmptyPool,
}

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scrolling banner, waiting for the start key
    Intro,
    /// Reactor running
    Playing,
    /// Failure screen
    Meltdown,
}

/// Sound cues raised during a frame, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Neutron absorbed by the control rod
    GoodHit,
    /// Neutron struck a fuel rod
    BadHit,
    /// Meltdown began
    Explode,
}

/// One entry in the active update list
#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    /// Owned entity driven purely by its behavior tag
    Scenery(Entity),
    ControlRod,
    Fuel(Side),
    Neutrons,
}

/// Image sizes the simulation needs for geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extents {
    pub neutron: UVec2,
    pub rod: UVec2,
    pub fuel: UVec2,
    pub background: UVec2,
    pub intro: UVec2,
}

impl Extents {
    pub fn from_assets(assets: &dyn AssetProvider) -> Result<Self, AssetError> {
        Ok(Self {
            neutron: assets.image_size(ImageId::Neutron)?,
            rod: assets.image_size(ImageId::Rod)?,
            fuel: assets.image_size(ImageId::Fuel)?,
            background: assets.image_size(ImageId::Background)?,
            intro: assets.image_size(ImageId::Intro)?,
        })
    }

    pub fn of(&self, image: ImageId) -> UVec2 {
        match image {
            ImageId::Neutron => self.neutron,
            ImageId::Rod => self.rod,
            ImageId::Fuel => self.fuel,
            ImageId::Background => self.background,
            ImageId::Intro => self.intro,
        }
    }
}

/// Simulation options taken from `Settings`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimOptions {
    pub reduced_motion: bool,
    pub show_status: bool,
}

/// Serializable view of the simulation for logs and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub frame: u32,
    pub slots: Vec<Option<Neutron>>,
    pub rod: Vec2,
    pub rod_falling: bool,
    pub left_hits: u32,
    pub right_hits: u32,
    pub caught: u32,
}

/// Complete game state
pub struct SimulationState {
    /// Current phase
    pub phase: GamePhase,
    /// Frames since the current phase was entered
    pub frame: u32,
    /// Update list for the current phase, in update order
    pub actors: Vec<Actor>,
    pub pool: NeutronPool,
    pub rod: ControlRod,
    pub left: FuelRod,
    pub right: FuelRod,
    /// Neutrons absorbed by the rod this run
    pub caught: u32,
    pub extents: Extents,
    pub options: SimOptions,
    /// Cues raised since the host last drained them
    pub(crate) cues: Vec<SoundCue>,
    /// Phase change requested by an actor this frame
    pub(crate) pending: Option<GamePhase>,
    /// Failure text, grows the retry hint after the delay
    pub(crate) meltdown_text: String,
    pub(crate) flicker_color: Rgba,
    pub(crate) rng: Pcg32,
}

impl SimulationState {
    pub fn new(assets: &dyn AssetProvider, settings: &Settings) -> Result<Self, SimError> {
        let rng = match settings.flicker_seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        let mut state = Self {
            phase: GamePhase::Intro,
            frame: 0,
            actors: Vec::new(),
            pool: NeutronPool::default(),
            rod: ControlRod::default(),
            left: FuelRod::new(Side::Left),
            right: FuelRod::new(Side::Right),
            caught: 0,
            extents: Extents::from_assets(assets)?,
            options: SimOptions {
                reduced_motion: settings.reduced_motion,
                show_status: settings.show_status,
            },
            cues: Vec::new(),
            pending: None,
            meltdown_text: String::new(),
            flicker_color: Rgba::WHITE,
            rng,
        };
        state.enter(GamePhase::Intro);
        Ok(state)
    }

    pub fn fuel(&self, side: Side) -> &FuelRod {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn fuel_mut(&mut self, side: Side) -> &mut FuelRod {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Ask for a phase change; applied by the frame driver after the current actor
    pub fn request(&mut self, phase: GamePhase) {
        self.pending.get_or_insert(phase);
    }

    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Take the sound cues raised since the last call
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn meltdown_text(&self) -> &str {
        &self.meltdown_text
    }

    /// Enter `phase`: reset the frame counter, run entry actions, rebuild the list
    pub fn enter(&mut self, phase: GamePhase) {
        log::info!("Entering {phase:?} after {} frames of {:?}", self.frame, self.phase);
        self.phase = phase;
        self.frame = 0;
        self.pending = None;
        self.actors = match phase {
            GamePhase::Intro => vec![Actor::Scenery(Entity::new(
                Some(ImageId::Intro),
                Vec2::new(WIDTH / 2.0, HEIGHT * 2.0),
                Behavior::IntroScroll,
            ))],
            GamePhase::Playing => {
                self.pool.reset();
                self.rod.park();
                self.left.reset();
                self.right.reset();
                self.caught = 0;
                vec![
                    Actor::Scenery(Entity::sprite(
                        ImageId::Background,
                        Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
                    )),
                    Actor::ControlRod,
                    Actor::Fuel(Side::Left),
                    Actor::Fuel(Side::Right),
                    Actor::Neutrons,
                ]
            }
            GamePhase::Meltdown => {
                log::warn!(
                    "Meltdown! left={} right={} caught={}",
                    self.left.hits,
                    self.right.hits,
                    self.caught
                );
                self.cue(SoundCue::Explode);
                self.meltdown_text = MELTDOWN_TEXT.to_owned();
                vec![
                    Actor::Scenery(Entity::new(None, Vec2::ZERO, Behavior::MeltdownFlicker)),
                    Actor::Scenery(Entity::new(None, Vec2::ZERO, Behavior::MeltdownMessage)),
                ]
            }
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            frame: self.frame,
            slots: self.pool.slots().to_vec(),
            rod: self.rod.entity.pos,
            rod_falling: self.rod.is_falling(),
            left_hits: self.left.hits,
            right_hits: self.right.hits,
            caught: self.caught,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;

    fn state() -> SimulationState {
        let settings = Settings {
            flicker_seed: Some(7),
            ..Default::default()
        };
        SimulationState::new(&Assets::builtin().unwrap(), &settings).unwrap()
    }

    #[test]
    fn test_starts_in_intro() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Intro);
        assert_eq!(s.frame, 0);
        assert_eq!(s.actors.len(), 1);
        assert!(matches!(
            &s.actors[0],
            Actor::Scenery(Entity { behavior: Behavior::IntroScroll, .. })
        ));
    }

    #[test]
    fn test_enter_playing_resets_singletons() {
        let mut s = state();
        s.left.hits = 7;
        s.right.hits = 3;
        s.rod.drop_at(100.0);
        s.caught = 4;
        s.frame = 99;

        s.enter(GamePhase::Playing);
        assert_eq!(s.frame, 0);
        assert_eq!((s.left.hits, s.right.hits, s.caught), (0, 0, 0));
        assert!(s.rod.is_parked());
        assert_eq!(s.pool.len(), 1);
        assert_eq!(
            s.actors[1..],
            [Actor::ControlRod, Actor::Fuel(Side::Left), Actor::Fuel(Side::Right), Actor::Neutrons]
        );
    }

    #[test]
    fn test_enter_meltdown_cues_explosion_once() {
        let mut s = state();
        s.enter(GamePhase::Meltdown);
        assert_eq!(s.drain_cues(), [SoundCue::Explode]);
        assert!(s.drain_cues().is_empty());
        assert_eq!(s.meltdown_text(), MELTDOWN_TEXT);
        assert_eq!(s.actors.len(), 2);
    }

    #[test]
    fn test_first_request_wins() {
        let mut s = state();
        s.request(GamePhase::Meltdown);
        s.request(GamePhase::Intro);
        assert_eq!(s.pending, Some(GamePhase::Meltdown));
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let mut s = state();
        s.enter(GamePhase::Playing);
        let snap = s.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.slots.len(), 1);
    }
}
