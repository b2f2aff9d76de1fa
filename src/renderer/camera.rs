//! Perspective camera

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::sim::CameraRig;

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    /// Width over height
    pub aspect: f32,
}

impl Camera {
    pub fn from_rig(rig: &CameraRig, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position: rig.position,
            target: rig.target,
            fov_y_degrees,
            aspect,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect.max(f32::EPSILON),
            Z_NEAR,
            Z_FAR,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Camera data as laid out in the shader's uniform block
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position, w unused
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }
}
