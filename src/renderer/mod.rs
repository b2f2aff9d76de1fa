//! WebGPU rendering module
//!
//! The game state is turned into a [`Scene`] of instanced unit meshes each frame and
//! drawn from the ball's point of view.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::{Camera, CameraUniform};
pub use pipeline::RenderState;
pub use scene::{Material, MeshKind, Node, Scene};
