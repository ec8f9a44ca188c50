//! Light rig: one directional light plus a bounded set of point lights.

use cgmath::Vector3;

/// Upper bound on point lights, fixed by the shader's uniform array size.
pub const MAX_POINT_LIGHTS: usize = 10;

/// Sun-style light: parallel rays, no falloff.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light travels, not the direction toward it.
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for DirectionalLight {
    /// High-noon sun, mostly specular with a dim warm ambient.
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, -1.0, -1.0),
            ambient: Vector3::new(0.1, 0.1, 0.085),
            diffuse: Vector3::new(0.6, 0.6, 0.5),
            specular: Vector3::new(1.0, 1.0, 0.85),
        }
    }
}

/// Positional light with constant/linear/quadratic distance attenuation.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl PointLight {
    /// A warm lamp at `position` with the usual ~50 unit falloff curve.
    pub fn lamp(position: Vector3<f32>) -> Self {
        Self {
            position,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(0.8, 0.8, 0.6),
            specular: Vector3::new(1.0, 1.0, 0.75),
        }
    }
}

/// Every light that shines on a scene.
#[derive(Debug, Clone, Default)]
pub struct LightRig {
    pub directional: DirectionalLight,
    points: Vec<PointLight>,
}

impl LightRig {
    pub fn new(directional: DirectionalLight) -> Self {
        Self {
            directional,
            points: Vec::new(),
        }
    }

    /// Adds a point light, dropping it with a warning once the shader's
    /// array is full.
    pub fn add_point(&mut self, light: PointLight) {
        if self.points.len() >= MAX_POINT_LIGHTS {
            log::warn!(
                "point light limit of {} reached; dropping light at {:?}",
                MAX_POINT_LIGHTS,
                light.position
            );
            return;
        }
        self.points.push(light);
    }

    pub fn points(&self) -> &[PointLight] {
        &self.points
    }

    /// Packs the rig into the shader's uniform block layout.
    pub fn to_uniform(&self) -> LightsUniform {
        let mut uniform = LightsUniform::zeroed();
        uniform.directional = GpuDirectionalLight {
            direction: self.directional.direction.into(),
            _pad0: 0.0,
            ambient: self.directional.ambient.into(),
            _pad1: 0.0,
            diffuse: self.directional.diffuse.into(),
            _pad2: 0.0,
            specular: self.directional.specular.into(),
            _pad3: 0.0,
        };
        for (slot, light) in uniform.points.iter_mut().zip(self.points.iter()) {
            *slot = GpuPointLight {
                position: light.position.into(),
                constant: light.constant,
                ambient: light.ambient.into(),
                linear: light.linear,
                diffuse: light.diffuse.into(),
                quadratic: light.quadratic,
                specular: light.specular.into(),
                _pad: 0.0,
            };
        }
        uniform.point_count = self.points.len() as u32;
        uniform
    }
}

/// MUST match `DirectionalLight` in shader.wgsl exactly; vec3 members are
/// padded out to 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuDirectionalLight {
    direction: [f32; 3],
    _pad0: f32,
    ambient: [f32; 3],
    _pad1: f32,
    diffuse: [f32; 3],
    _pad2: f32,
    specular: [f32; 3],
    _pad3: f32,
}

/// MUST match `PointLight` in shader.wgsl exactly; the attenuation scalars
/// ride in the padding slots after each vec3.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    position: [f32; 3],
    constant: f32,
    ambient: [f32; 3],
    linear: f32,
    diffuse: [f32; 3],
    quadratic: f32,
    specular: [f32; 3],
    _pad: f32,
}

/// MUST match `Lights` in shader.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub directional: GpuDirectionalLight,
    pub points: [GpuPointLight; MAX_POINT_LIGHTS],
    pub point_count: u32,
    _pad: [u32; 3],
}

impl LightsUniform {
    fn zeroed() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lights_capped_at_shader_limit() {
        let mut rig = LightRig::default();
        for i in 0..(MAX_POINT_LIGHTS + 3) {
            rig.add_point(PointLight::lamp(Vector3::new(i as f32, 0.0, 0.0)));
        }

        assert_eq!(rig.points().len(), MAX_POINT_LIGHTS);
        assert_eq!(rig.to_uniform().point_count, MAX_POINT_LIGHTS as u32);
        // The survivors are the first ones added.
        assert_eq!(rig.points()[0].position, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_uniform_layout_sizes() {
        use std::mem::size_of;
        assert_eq!(size_of::<GpuDirectionalLight>(), 64);
        assert_eq!(size_of::<GpuPointLight>(), 64);
        assert_eq!(
            size_of::<LightsUniform>(),
            64 + 64 * MAX_POINT_LIGHTS + 16
        );
    }

    #[test]
    fn test_uniform_packs_attenuation_into_padding() {
        let mut rig = LightRig::default();
        let mut lamp = PointLight::lamp(Vector3::new(1.0, 2.0, 3.0));
        lamp.linear = 0.25;
        rig.add_point(lamp);

        let uniform = rig.to_uniform();
        assert_eq!(uniform.point_count, 1);
        assert_eq!(uniform.points[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.points[0].linear, 0.25);
        // Unfilled slots stay zeroed.
        assert_eq!(uniform.points[1].position, [0.0, 0.0, 0.0]);
    }
}
