//! Fixed look-at camera and its GPU uniform.

use cgmath::{perspective, Deg, Matrix4, Point3, Rad, Vector3};

/// Converts a right-handed OpenGL-style projection to wgpu's clip space,
/// whose Z runs from 0 to 1 instead of -1 to 1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// A stationary perspective camera looking at a fixed target.
///
/// The demos run it as shipped: eye a few units out on +Z, aimed at the
/// origin. Only the aspect ratio changes at runtime, on window resize.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(45.0).into(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: [self.eye.x, self.eye.y, self.eye.z, 1.0],
            view_proj: self.build_view_projection_matrix().into(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Camera data as the shader's global uniform block expects it.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Eye position, homogeneous to satisfy 16 byte alignment.
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::default();
        camera.resize_projection(1600, 800);
        assert_eq!(camera.aspect, 2.0);

        // Degenerate sizes are ignored rather than poisoning the matrix.
        camera.resize_projection(1600, 0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_origin_projects_in_front_of_camera() {
        let camera = Camera::default();
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);

        // The default camera looks straight down -Z at the origin, so the
        // origin lands centered, in front, inside the depth range.
        assert!(clip.w > 0.0);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_uniform_carries_eye_position() {
        let camera = Camera::default();
        assert_eq!(camera.uniform().view_position, [0.0, 0.0, 5.0, 1.0]);
    }
}
