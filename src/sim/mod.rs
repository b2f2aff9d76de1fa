//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pair index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{Hit, find_hit, has_passed, sphere_box_overlap};
pub use state::{Ball, CameraRig, GameEvent, GameState, Pillar, PillarPair, PillarSide};
pub use tick::{TickInput, autopilot_wants_jump, game_over, jump, reset, tick};
