//! Turns a [`LayoutResult`] into scene graph nodes.
//!
//! Placements sharing a mesh and material end up as instances of a single
//! [`ModelNode`], so the scene graph holds one node per draw batch. Batches are
//! created in the order their first placement appears in the layout.

use std::collections::HashMap;

use anyhow::Context;

use crate::{
    data_structures::{
        instance::Instance,
        scene_graph::{ModelNode, SceneNode},
    },
    layout::{LayoutResult, MeshKind},
    resources::{AssetTable, MaterialPalette},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulateStats {
    pub cubes: usize,
    pub teapots: usize,
    pub batches: usize,
}

impl PopulateStats {
    pub fn instances(&self) -> usize {
        self.cubes + self.teapots
    }
}

/// Instantiates every placement of `layout` below `parent`.
///
/// Material indices are checked against `palette` before anything is added, so
/// a failing layout leaves `parent` untouched.
pub fn populate(
    parent: &mut dyn SceneNode,
    layout: &LayoutResult,
    palette: &MaterialPalette,
    assets: &AssetTable,
) -> anyhow::Result<PopulateStats> {
    for (idx, placement) in layout.iter().enumerate() {
        palette
            .lookup(placement.mesh, placement.material)
            .with_context(|| format!("placement {} at {:?}", idx, placement.position))?;
    }

    let first_id = parent.get_children().len() as u32;
    let mut batches: Vec<ModelNode> = Vec::new();
    let mut batch_index: HashMap<(MeshKind, u32), usize> = HashMap::new();
    let mut stats = PopulateStats::default();

    for placement in layout {
        let asset = assets.mesh(placement.mesh)?;
        let key = (placement.mesh, placement.material);
        let idx = match batch_index.get(&key) {
            Some(&idx) => idx,
            None => {
                let id = first_id + batches.len() as u32;
                batches.push(ModelNode::new(
                    id,
                    placement.mesh,
                    placement.material,
                    &asset.model,
                ));
                batch_index.insert(key, batches.len() - 1);
                batches.len() - 1
            }
        };
        let instance = Instance::from(placement.translation()).with_uniform_scale(asset.scale);
        batches[idx].add_instance(instance);
        match placement.mesh {
            MeshKind::Cube => stats.cubes += 1,
            MeshKind::TeaPot => stats.teapots += 1,
        }
    }

    stats.batches = batches.len();
    for batch in batches {
        log::debug!(
            "batch {}: {} x {:?} with material {}",
            batch.id(),
            batch.instance_count(),
            batch.mesh(),
            batch.material()
        );
        parent.add_child(Box::new(batch));
    }
    log::info!(
        "populated scene with {} cubes and {} teapots in {} batches",
        stats.cubes,
        stats.teapots,
        stats.batches
    );
    Ok(stats)
}
