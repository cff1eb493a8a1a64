//! Fast Fission Reactor Simulator - a tiny reactor arcade game
//!
//! Core modules:
//! - `sim`: Deterministic frame-stepped simulation (neutrons, rod, fuel, phases)
//! - `platform`: Host boundary (drawing surface, input polling)
//! - `assets`: Built-in procedural images
//! - `renderer`: Software canvas implementing the drawing surface
//! - `audio`: Sound cue playback
//! - `settings`: Player preferences

pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetProvider, Assets, Image};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Window title
    pub const TITLE: &str = "Fast Fission Reactor Simulator";

    /// Logical canvas size in pixels
    pub const WIDTH: f32 = 320.0;
    pub const HEIGHT: f32 = 240.0;
    pub const WIDTH_PX: usize = 320;
    pub const HEIGHT_PX: usize = 240;

    /// Frames per second the simulation is tuned for
    pub const FPS: u32 = 60;

    /// Horizontal distance from either screen edge where neutrons exit
    pub const EDGE_MARGIN: f32 = 48.0;

    /// Neutron pool cadence
    pub const SPAWN_INTERVAL: u32 = 60;
    pub const EPOCH_FRAMES: u32 = 600;
    pub const POOL_HEADROOM: usize = 16;
    pub const LANE_SPACING: u32 = 32;
    /// Where the very first neutron of a run appears
    pub const FORCED_SPAWN_X: f32 = EDGE_MARGIN;
    pub const FORCED_SPAWN_Y: f32 = 32.0;

    /// Control rod
    pub const ROD_PARK_X: f32 = -WIDTH;
    pub const ROD_PARK_Y: f32 = -HEIGHT;
    pub const ROD_DROP_Y: f32 = -32.0;
    pub const ROD_FALL_SPEED: f32 = 2.0;
    pub const ROD_EXIT_MARGIN: f32 = 32.0;

    /// Fuel rods sit against the screen edges
    pub const FUEL_INSET: f32 = 16.0;
    /// Hits a fuel rod survives; one more triggers the meltdown
    pub const FUEL_HIT_LIMIT: u32 = 9;
    /// Hue rotation per hit, as a fraction of PI
    pub const FUEL_HUE_STEP: f32 = 0.05;

    /// Intro banner scrolls one pixel every this many frames
    pub const INTRO_SCROLL_INTERVAL: u32 = 3;

    /// Frames before the meltdown screen accepts a retry click (5 seconds)
    pub const MELTDOWN_RETRY_FRAMES: u32 = 5 * FPS;
    /// Flicker cadence when reduced motion is on
    pub const REDUCED_FLICKER_INTERVAL: u32 = 30;

    pub const INTRO_TEXT: &str = "Press space bar to begin simulation.";
    pub const MELTDOWN_TEXT: &str = "You have failed.
And this is what it looks like when
a fission reactor melts down.

Ask anybody. I don't care.
";
    pub const RETRY_TEXT: &str = "\nClick mouse to try again.";
}
