use std::collections::HashMap;

use crate::layout::MeshKind;

/**
 * This module contains the explicit asset lookups used while populating the scene:
 * mesh model paths and the material palette.
 */
pub mod material;

pub use material::{Material, MaterialPalette};

/// Uniform scale applied to every teapot instance.
pub const TEAPOT_SCALE: f32 = 2.3;

/// Model path and instance scale for one mesh kind.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshAsset {
    pub model: String,
    pub scale: f32,
}

/// Maps each [`MeshKind`] to the model it is drawn with.
///
/// Lookups are explicit: populating the scene receives the table instead of
/// caching models on first use.
#[derive(Clone, Debug)]
pub struct AssetTable {
    meshes: HashMap<MeshKind, MeshAsset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshKind, model: &str, scale: f32) -> Self {
        self.insert(mesh, model, scale);
        self
    }

    pub fn insert(&mut self, mesh: MeshKind, model: &str, scale: f32) {
        self.meshes.insert(
            mesh,
            MeshAsset {
                model: model.to_string(),
                scale,
            },
        );
    }

    pub fn mesh(&self, mesh: MeshKind) -> anyhow::Result<&MeshAsset> {
        self.meshes
            .get(&mesh)
            .ok_or_else(|| anyhow::anyhow!("no model registered for mesh {:?}", mesh))
    }
}

impl Default for AssetTable {
    fn default() -> Self {
        Self::new()
            .with_mesh(MeshKind::Cube, "Models/Box.mdl", 1.0)
            .with_mesh(MeshKind::TeaPot, "Models/teapot.mdl", TEAPOT_SCALE)
    }
}
