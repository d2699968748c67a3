//! Procedural scene layout.
//!
//! The layout generator enumerates grid cells and decides, per cell, whether a
//! mesh is placed there and which material variant it uses. It never touches
//! the scene graph: it returns a [`LayoutResult`] of [`Placement`] records that
//! [`crate::populate`] turns into instanced model nodes.
//!
//! Four sub-rules contribute to one layout, always in this order:
//!
//! 1. [`teapot_grid`] is a coarse grid of teapots with three highlighted ones
//! 2. [`diamond_field`] builds three cube layers shaped by the Manhattan distance
//! 3. [`lower_band`] sprinkles randomly coloured cubes below the floor
//! 4. [`upper_band`] sprinkles sparse cubes above the glass layer
//!
//! Only the last two consume randomness, drawn from the [`RandomSource`]
//! passed to [`generate`]. Feeding two identically seeded sources yields two
//! identical layouts.

use std::ops::RangeInclusive;

use cgmath::Vector3;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Material slot reserved for the glass variant of the cube palette.
pub const GLASS_MATERIAL: u32 = 10;

/// Number of material slots per mesh kind.
pub const MATERIAL_SLOTS: usize = 11;

/// The mesh a placement instantiates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKind {
    Cube,
    TeaPot,
}

/// One decision to instantiate a mesh with a material at a lattice position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub mesh: MeshKind,
    pub material: u32,
    pub position: Vector3<i32>,
}

impl Placement {
    pub fn cube(material: u32, x: i32, y: i32, z: i32) -> Self {
        Self {
            mesh: MeshKind::Cube,
            material,
            position: Vector3::new(x, y, z),
        }
    }

    pub fn teapot(material: u32, x: i32, y: i32, z: i32) -> Self {
        Self {
            mesh: MeshKind::TeaPot,
            material,
            position: Vector3::new(x, y, z),
        }
    }

    /// Position as a float vector, ready to be used as a translation.
    pub fn translation(&self) -> Vector3<f32> {
        Vector3::new(
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        )
    }
}

/// Placements in generation order.
///
/// The order only matters for reproducibility: teapot grid, diamond field,
/// lower band and upper band, each walking its loops outer to inner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutResult {
    placements: Vec<Placement>,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    /// Number of placements of the given mesh kind.
    pub fn count(&self, mesh: MeshKind) -> usize {
        self.placements.iter().filter(|p| p.mesh == mesh).count()
    }

    pub fn into_vec(self) -> Vec<Placement> {
        self.placements
    }

    fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    fn extend(&mut self, other: LayoutResult) {
        self.placements.extend(other.placements);
    }
}

impl From<Vec<Placement>> for LayoutResult {
    fn from(placements: Vec<Placement>) -> Self {
        Self { placements }
    }
}

impl IntoIterator for LayoutResult {
    type Item = Placement;
    type IntoIter = std::vec::IntoIter<Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.into_iter()
    }
}

impl<'a> IntoIterator for &'a LayoutResult {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// A source of uniformly distributed integers.
///
/// Implementations should return a value within `min..=max`; the generator
/// clamps every draw into its range either way. It calls the source in a fixed
/// order, so a deterministic source yields a deterministic layout.
pub trait RandomSource {
    fn range(&mut self, min: i32, max: i32) -> i32;
}

/// [`RandomSource`] backed by a seedable [`StdRng`].
///
/// A degenerate range (`max <= min`) always yields `min`, so every value it
/// returns already survives the generator's clamp unchanged.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

const TEAPOT_HEIGHT: i32 = -3;
const TEAPOT_AXIS: RangeInclusive<i32> = -13..=11;
const TEAPOT_STEP: usize = 7;

const FIELD_AXIS: RangeInclusive<i32> = -15..=15;
const FLOOR_HEIGHT: i32 = -7;
const RING_HEIGHT: i32 = -4;
const ROOF_HEIGHT: i32 = 5;

const LOWER_AXIS: RangeInclusive<i32> = -7..=7;
const LOWER_LAYERS: RangeInclusive<i32> = -9..=-5;
const LOWER_THRESHOLD: i32 = 15;

const UPPER_AXIS: RangeInclusive<i32> = -9..=9;
const UPPER_LAYERS: RangeInclusive<i32> = 4..=12;
const UPPER_THRESHOLD: i32 = 8;

/// Generates the complete scene layout.
///
/// The teapot grid and the diamond field are deterministic. The two sparse
/// bands share `random`: every cell of the lower band draws a threshold value
/// in `0..=99` (plus a material in `0..=10` when the cell is filled), then
/// every cell of the upper band draws its threshold value.
pub fn generate<R: RandomSource + ?Sized>(random: &mut R) -> LayoutResult {
    let mut layout = teapot_grid();
    layout.extend(diamond_field());
    layout.extend(lower_band(random));
    layout.extend(upper_band(random));
    log::debug!(
        "generated layout with {} cubes and {} teapots",
        layout.count(MeshKind::Cube),
        layout.count(MeshKind::TeaPot)
    );
    layout
}

/// Draws from `random`, clamped into `min..=max`.
fn draw<R: RandomSource + ?Sized>(random: &mut R, min: i32, max: i32) -> i32 {
    random.range(min, max).clamp(min, max)
}

/// A coarse teapot grid.
///
/// Odd coordinates shift the teapot by two units along the other axis. The
/// remainder truncates toward zero, so negative odd coordinates shift the
/// teapot in the negative direction.
pub fn teapot_grid() -> LayoutResult {
    let mut layout = LayoutResult::new();
    for w in TEAPOT_AXIS.step_by(TEAPOT_STEP) {
        for x in TEAPOT_AXIS.step_by(TEAPOT_STEP) {
            let material = teapot_material(x, w);
            layout.push(Placement::teapot(
                material,
                x + (w % 2) * 2,
                TEAPOT_HEIGHT,
                w + (x % 2) * 2,
            ));
        }
    }
    layout
}

fn teapot_material(x: i32, w: i32) -> u32 {
    match (x, w) {
        (8, 1) => 2,
        (1, 8) | (-6, -6) => 1,
        _ => 0,
    }
}

/// Floor, ring and roof layers shaped by `|x| + |w|`.
///
/// Each cell checks three things independently: a floor cube near the
/// centre, a ring cube away from it, and a roof cube that is glass near the
/// centre and solid elsewhere. A cell therefore yields two or three cubes.
pub fn diamond_field() -> LayoutResult {
    let mut layout = LayoutResult::new();
    for w in FIELD_AXIS {
        for x in FIELD_AXIS {
            let d = x.abs() + w.abs();
            if d < 8 {
                layout.push(Placement::cube(0, x, FLOOR_HEIGHT, w));
            }
            if d > 5 {
                layout.push(Placement::cube(2, x, RING_HEIGHT, w));
            }
            if d > 6 {
                layout.push(Placement::cube(1, x, ROOF_HEIGHT, w));
            } else {
                layout.push(Placement::cube(GLASS_MATERIAL, x, ROOF_HEIGHT, w));
            }
        }
    }
    layout
}

/// Randomly coloured cubes filling roughly 15% of the band below the floor.
pub fn lower_band<R: RandomSource + ?Sized>(random: &mut R) -> LayoutResult {
    let mut layout = LayoutResult::new();
    for w in LOWER_AXIS {
        for x in LOWER_AXIS {
            for y in LOWER_LAYERS {
                if draw(random, 0, 99) < LOWER_THRESHOLD {
                    let material = draw(random, 0, GLASS_MATERIAL as i32);
                    layout.push(Placement::cube(material as u32, x, y, w));
                }
            }
        }
    }
    layout
}

/// Sparse cubes filling roughly 8% of the band above the glass roof.
///
/// The bottom layer sits on the glass roof and uses material 0, every layer
/// above uses material 1.
pub fn upper_band<R: RandomSource + ?Sized>(random: &mut R) -> LayoutResult {
    let bottom = *UPPER_LAYERS.start();
    let mut layout = LayoutResult::new();
    for w in UPPER_AXIS {
        for x in UPPER_AXIS {
            for y in UPPER_LAYERS {
                if draw(random, 0, 99) < UPPER_THRESHOLD {
                    let material = if y == bottom { 0 } else { 1 };
                    layout.push(Placement::cube(material, x, y, w));
                }
            }
        }
    }
    layout
}
