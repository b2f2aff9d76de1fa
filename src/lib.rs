//! Pillar Run - an endless 3D pillar-dodging ball game
//!
//! Core modules:
//! - `physics`: Minimal rigid-body world (gravity, damping, ground contact)
//! - `sim`: Deterministic simulation (obstacles, collisions, scoring, reset)
//! - `renderer`: Scene graph and WebGPU rendering pipeline
//! - `settings`: Data-driven game tuning
//! - `ui`: Score readout

pub mod physics;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;
pub use ui::Hud;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame the accumulator will absorb (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Earth gravity along -y
    pub const GRAVITY: f32 = -9.82;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 1.0;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_DAMPING: f32 = 0.1;
    pub const BALL_SPAWN_HEIGHT: f32 = 5.0;
    /// The x lane the ball lives in
    pub const BALL_LANE: f32 = 0.0;
    pub const JUMP_POWER: f32 = 7.0;

    /// Pillar defaults
    pub const PILLAR_PAIRS: usize = 5;
    pub const PILLAR_SPACING: f32 = 20.0;
    pub const PILLAR_START_X: f32 = 30.0;
    pub const PILLAR_GAP: f32 = 8.0;
    pub const PILLAR_WIDTH: f32 = 2.0;
    pub const PILLAR_MIN_HEIGHT: f32 = 10.0;
    pub const PILLAR_MAX_HEIGHT: f32 = 15.0;
    pub const PILLAR_TOTAL_HEIGHT: f32 = 30.0;
    /// Leftward pillar travel per tick
    pub const SCROLL_STEP: f32 = 0.1;
    /// Pairs behind this x are recycled
    pub const RECYCLE_BELOW_X: f32 = -20.0;

    /// Camera aims this far ahead of the ball
    pub const LOOK_AHEAD: f32 = 5.0;
    pub const CAMERA_FOV_DEGREES: f32 = 100.0;

    /// Collision flash length (0.5 s at 60 Hz)
    pub const HIGHLIGHT_TICKS: u64 = 30;

    /// Ground plane edge length
    pub const GROUND_SIZE: f32 = 100.0;
}

/// Ball spawn point for a given lane and height
#[inline]
pub fn spawn_point(lane: f32, height: f32) -> Vec3 {
    Vec3::new(lane, height, 0.0)
}

/// Per-axis test `|a - b| < extent` on all three axes
#[inline]
pub fn within_extent(a: Vec3, b: Vec3, extent: Vec3) -> bool {
    let d = (a - b).abs();
    d.x < extent.x && d.y < extent.y && d.z < extent.z
}
