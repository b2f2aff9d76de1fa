//! Rigid bodies and their collision shapes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Collision shape attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Axis-aligned box given by its half extents
    Cuboid { half_extents: Vec3 },
    /// Infinite plane facing +y through the body position
    Plane,
}

/// Index of a body inside its [`World`](super::World)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Construction parameters for a body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    /// Mass 0 makes the body static
    pub mass: f32,
    pub shape: Shape,
    pub position: Vec3,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
}

impl BodyDesc {
    /// A static body at `position`
    pub fn fixed(shape: Shape, position: Vec3) -> Self {
        Self {
            mass: 0.0,
            shape,
            position,
            linear_damping: 0.0,
        }
    }
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub shape: Shape,
    pub linear_damping: f32,
}

impl Body {
    pub fn new(desc: BodyDesc) -> Self {
        Self {
            position: desc.position,
            velocity: Vec3::ZERO,
            mass: desc.mass,
            shape: desc.shape,
            linear_damping: desc.linear_damping.clamp(0.0, 1.0),
        }
    }

    /// Dynamic bodies are integrated by the world; static ones are not
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    /// Axis-aligned bounds (planes report an unbounded box)
    pub fn aabb(&self) -> (Vec3, Vec3) {
        match self.shape {
            Shape::Sphere { radius } => (
                self.position - Vec3::splat(radius),
                self.position + Vec3::splat(radius),
            ),
            Shape::Cuboid { half_extents } => {
                (self.position - half_extents, self.position + half_extents)
            }
            Shape::Plane => (
                Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
                Vec3::new(f32::INFINITY, self.position.y, f32::INFINITY),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_decides_dynamic() {
        let ball = Body::new(BodyDesc {
            mass: 1.0,
            shape: Shape::Sphere { radius: 1.0 },
            position: Vec3::ZERO,
            linear_damping: 0.1,
        });
        assert!(ball.is_dynamic());

        let pillar = Body::new(BodyDesc::fixed(
            Shape::Cuboid {
                half_extents: Vec3::new(1.0, 5.0, 1.0),
            },
            Vec3::new(30.0, 5.0, 0.0),
        ));
        assert!(!pillar.is_dynamic());
        assert_eq!(
            pillar.aabb(),
            (Vec3::new(29.0, 0.0, -1.0), Vec3::new(31.0, 10.0, 1.0))
        );
    }

    #[test]
    fn test_damping_is_clamped() {
        let body = Body::new(BodyDesc {
            mass: 1.0,
            shape: Shape::Sphere { radius: 1.0 },
            position: Vec3::ZERO,
            linear_damping: 3.0,
        });
        assert_eq!(body.linear_damping, 1.0);
    }
}
