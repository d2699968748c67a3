//! Per-instance transforms.
//!
//! Every placed cube or teapot becomes one [`Instance`] inside the batch for
//! its mesh and material; [`InstanceRaw`] is what leaves the crate.

use std::ops::Mul;

use cgmath::{ElementWise, Matrix3, Matrix4, One, Quaternion, SquareMatrix, Vector3};

/// Placement of one cube or teapot relative to its parent node.
///
/// `parent * child` gives the child's transform in the parent's space, which is
/// how scene node rotations reach every batch below them.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// Sits at the parent's origin, unrotated and at unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Teapots are scaled up uniformly, cubes keep unit scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Translation, then rotation, then scale.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let model = self.to_matrix();
        InstanceRaw {
            handedness: model.determinant().signum(),
            model: model.into(),
            normal: Matrix3::from(self.rotation).into(),
        }
    }
}

impl Mul<&Instance> for &Instance {
    type Output = Instance;

    fn mul(self, child: &Instance) -> Instance {
        // the child's offset is measured in the parent's scaled, rotated frame
        let offset = self.rotation * self.scale.mul_element_wise(child.position);
        Instance {
            position: self.position + offset,
            rotation: self.rotation * child.rotation,
            scale: self.scale.mul_element_wise(child.scale),
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, child: Instance) -> Self {
        &self * &child
    }
}

/// An unrotated, unit-scale instance at `position`.
impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// World transform of one instance, packed the way a renderer uploads it.
///
/// `handedness` is -1 when the transform mirrors the mesh.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}
