//! Scene-wide settings: camera, projection, light, fog and spatial partitioning.
//!
//! None of this touches a GPU. The values are what the host hands to its
//! renderer; [`LightUniform`] is already laid out for a uniform buffer.

use cgmath::{Deg, Matrix4, Point3, Vector3};

use crate::config::EngineParameters;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>>(position: V) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/**
 * Point light data as uploaded to the GPU, padded to 16-byte rows
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub range: f32,
    pub color: [f32; 3],
    pub brightness: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub uniform: LightUniform,
    pub cast_shadows: bool,
    pub per_vertex: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fog {
    pub bounds: (Vector3<f32>, Vector3<f32>),
    pub color: [f32; 3],
    pub start: f32,
    pub end: f32,
    pub ambient: [f32; 3],
}

/// Bounds and subdivision depth of the scene's octree.
#[derive(Clone, Debug, PartialEq)]
pub struct Octree {
    pub bounds: (Vector3<f32>, Vector3<f32>),
    pub levels: u32,
}

fn cube_bounds(half_side: f32) -> (Vector3<f32>, Vector3<f32>) {
    (
        Vector3::new(-half_side, -half_side, -half_side),
        Vector3::new(half_side, half_side, half_side),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    pub camera: Camera,
    pub projection: Projection,
    pub light: Light,
    pub fog: Fog,
    pub octree: Octree,
}

impl Context {
    pub fn new(params: &EngineParameters) -> Self {
        // Looking down +z from behind the scene
        let camera = Camera::new(Point3::new(0.0, 0.0, -15.0));
        let projection = Projection::new(
            params.window_width,
            params.window_height,
            Deg(45.0),
            1.0,
            50.0,
        );

        let light = Light {
            uniform: LightUniform {
                position: [0.0, 0.0, 0.0],
                range: 100.0,
                color: [1.0, 1.0, 1.0],
                brightness: 3.0,
            },
            cast_shadows: true,
            per_vertex: true,
        };

        let fog = Fog {
            bounds: cube_bounds(100.0),
            color: [0.1, 0.1, 0.1],
            start: 8.0,
            end: 25.0,
            ambient: [0.15, 0.15, 0.1],
        };

        let octree = Octree {
            bounds: cube_bounds(1000.0),
            levels: 3,
        };

        log::debug!(
            "context for {}x{} (fullscreen: {}, vsync: {})",
            params.window_width,
            params.window_height,
            params.fullscreen,
            params.vsync
        );

        Self {
            camera,
            projection,
            light,
            fog,
            octree,
        }
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }
}
