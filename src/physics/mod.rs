//! Minimal rigid-body physics
//!
//! Just enough of a physics engine for the game:
//! - Fixed timestep integration under gravity with linear damping
//! - Static bodies (mass 0) that are only moved explicitly
//! - Sphere vs ground-plane contact without bounce

pub mod body;
pub mod world;

pub use body::{Body, BodyDesc, BodyHandle, Shape};
pub use world::World;
