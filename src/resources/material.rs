//! Material variants selected by placement material indices.
//!
//! The palette holds [`MATERIAL_SLOTS`] entries per mesh kind. Slots `0..10`
//! are clones of one base material that shift the texture lookup so each
//! variant samples a different colour column. Cube slot 10 is the glass
//! material; the teapot palette leaves slot 10 empty.

use anyhow::{Context, bail};

use crate::layout::{GLASS_MATERIAL, MATERIAL_SLOTS, MeshKind};

pub const BASE_MATERIAL: &str = "Materials/ColorBox.xml";
pub const GLASS_MATERIAL_SOURCE: &str = "Materials/Water2.xml";

const COLOUR_VARIANTS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// The material file this one was loaded or cloned from.
    pub source: String,
    pub u_offset: [f32; 4],
    pub v_offset: [f32; 4],
    /// Draw both faces; teapots are open meshes.
    pub cull_none: bool,
}

impl Material {
    pub fn load(source: &str) -> Self {
        Self {
            name: source.to_string(),
            source: source.to_string(),
            u_offset: [1.0, 0.0, 0.0, 0.0],
            v_offset: [0.0, 1.0, 0.0, 0.0],
            cull_none: false,
        }
    }

    /// A clone of `self` sampling colour column `column`.
    pub fn colour_variant(&self, name: &str, column: usize) -> Self {
        Self {
            name: name.to_string(),
            source: self.source.clone(),
            u_offset: [0.1, 0.0, 0.0, 0.1 * column as f32],
            v_offset: [0.0, 1.0, 0.0, 0.0],
            cull_none: self.cull_none,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaterialPalette {
    cubes: Vec<Option<Material>>,
    teapots: Vec<Option<Material>>,
}

impl MaterialPalette {
    /// Builds both palettes from `base`, with `glass` in the reserved cube slot.
    pub fn generate(base: &Material, glass: Material) -> Self {
        let mut cubes = vec![None; MATERIAL_SLOTS];
        let mut teapots = vec![None; MATERIAL_SLOTS];
        for i in 0..COLOUR_VARIANTS {
            cubes[i] = Some(base.colour_variant(&i.to_string(), i));
            let mut teapot = base.colour_variant(&format!("teapot{}", i), i);
            teapot.cull_none = true;
            teapots[i] = Some(teapot);
        }
        cubes[GLASS_MATERIAL as usize] = Some(glass);
        log::debug!(
            "generated {} cube and {} teapot materials",
            cubes.iter().flatten().count(),
            teapots.iter().flatten().count()
        );
        Self { cubes, teapots }
    }

    /// Material for `mesh` at slot `index`.
    ///
    /// Fails for indices outside the palette and for empty slots.
    pub fn lookup(&self, mesh: MeshKind, index: u32) -> anyhow::Result<&Material> {
        let slots = match mesh {
            MeshKind::Cube => &self.cubes,
            MeshKind::TeaPot => &self.teapots,
        };
        let Some(slot) = slots.get(index as usize) else {
            bail!(
                "material index {} is out of range for the {:?} palette of {} slots",
                index,
                mesh,
                slots.len()
            );
        };
        slot.as_ref()
            .with_context(|| format!("{:?} material slot {} is empty", mesh, index))
    }

    pub fn len(&self, mesh: MeshKind) -> usize {
        match mesh {
            MeshKind::Cube => self.cubes.len(),
            MeshKind::TeaPot => self.teapots.len(),
        }
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self::generate(
            &Material::load(BASE_MATERIAL),
            Material::load(GLASS_MATERIAL_SOURCE),
        )
    }
}
