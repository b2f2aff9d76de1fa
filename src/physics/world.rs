//! Physics world: owns all bodies and steps them

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyDesc, BodyHandle, Shape};

/// Collection of bodies advanced together by a fixed timestep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    gravity: Vec3,
    bodies: Vec<Body>,
}

impl World {
    /// Empty world without gravity
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Add a body and return its handle
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body::new(desc));
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.index()]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        &mut self.bodies[handle.index()]
    }

    /// Teleport a body (velocity untouched)
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        self.body_mut(handle).position = position;
    }

    pub fn set_shape(&mut self, handle: BodyHandle, shape: Shape) {
        self.body_mut(handle).shape = shape;
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance every dynamic body by `dt` seconds
    ///
    /// Semi-implicit Euler: gravity first, then damping as `v *= (1 - d)^dt`, then
    /// position. Spheres pushed into a static plane are moved back onto its surface and
    /// lose their velocity into it.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            body.velocity += self.gravity * dt;
            body.velocity *= (1.0 - body.linear_damping).powf(dt);
            body.position += body.velocity * dt;
        }

        let planes: Vec<f32> = self
            .bodies
            .iter()
            .filter(|b| !b.is_dynamic() && b.shape == Shape::Plane)
            .map(|b| b.position.y)
            .collect();

        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            if !matches!(body.shape, Shape::Sphere { .. }) {
                continue;
            }
            for &plane_y in &planes {
                let (min, _) = body.aabb();
                let depth = plane_y - min.y;
                if depth > 0.0 {
                    body.position.y += depth;
                    if body.velocity.y < 0.0 {
                        body.velocity.y = 0.0;
                    }
                }
            }
        }
    }
}
