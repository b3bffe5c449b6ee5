//! 3D connected-component labeling.
//!
//! The mask is reordered to (time, y, x) and scanned once in raster
//! order. Each lit voxel is unioned with the lit voxels of its
//! neighbourhood that precede it in that order; a second pass
//! assigns compact ids, `1..=n`, in order of first appearance.

use crate::{axes, TubeError};
use cube::{ndarray::ArrayD, AxisNames, Cube};
use log::debug;
use std::{fmt, str::FromStr};

/// Which neighbouring voxels are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adjacency {
    /// 6-connectivity: voxels sharing a face.
    #[default]
    Face,

    /// 26-connectivity: voxels sharing a face, edge or corner,
    /// including diagonal steps across time.
    Full,
}

impl Adjacency {
    /// Returns the number of neighbours of an interior voxel.
    pub fn connectivity(self) -> u8 {
        match self {
            Self::Face => 6,
            Self::Full => 26,
        }
    }

    /// Neighbour offsets, as (dt, dy, dx), which precede a voxel in
    /// raster order.
    fn backward_offsets(self) -> Vec<[isize; 3]> {
        let mut offsets = Vec::with_capacity(13);
        for dt in -1..=1_isize {
            for dy in -1..=1_isize {
                for dx in -1..=1_isize {
                    let offset = [dt, dy, dx];
                    if offset >= [0, 0, 0] {
                        continue;
                    }
                    let steps = offset.iter().filter(|d| **d != 0).count();
                    if self == Self::Full || steps == 1 {
                        offsets.push(offset);
                    }
                }
            }
        }
        offsets
    }
}

impl TryFrom<u8> for Adjacency {
    type Error = TubeError;

    fn try_from(connectivity: u8) -> Result<Self, TubeError> {
        match connectivity {
            6 => Ok(Self::Face),
            26 => Ok(Self::Full),
            other => Err(TubeError::config("connectivity", other.to_string())),
        }
    }
}

impl FromStr for Adjacency {
    type Err = TubeError;

    fn from_str(s: &str) -> Result<Self, TubeError> {
        match s {
            "6" | "face" => Ok(Self::Face),
            "26" | "full" => Ok(Self::Full),
            other => Err(TubeError::config("connectivity", other)),
        }
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.connectivity())
    }
}

/// Output of [`label`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelingResult {
    /// Component ids, 0 for background, with the axes of the input
    /// mask.
    pub volume: Cube<u32>,

    /// Number of distinct positive ids in `volume`.
    pub component_count: u32,

    /// Neighbourhood used to compute `volume`.
    pub adjacency: Adjacency,
}

/// Labels connected components of `mask` across time, y and x.
///
/// `mask` must have exactly the three named axes, in any order; the
/// labeled volume has the same axes in the same order.
pub fn label(
    mask: &Cube<bool>,
    adjacency: Adjacency,
    names: &AxisNames,
) -> Result<LabelingResult, TubeError> {
    let order = axes::locate_exact(mask, names)?;
    let canonical = mask.permuted(&order);
    let shape = [
        canonical.shape()[0],
        canonical.shape()[1],
        canonical.shape()[2],
    ];

    let now = std::time::Instant::now();
    let lit: Vec<bool> = canonical.values().iter().copied().collect();
    let (ids, component_count) = label_raster(&lit, shape, adjacency);
    let runtime = now.elapsed();

    let volume = ArrayD::from_shape_vec(canonical.shape(), ids)
        .map_err(cube::CubeError::from)?
        .permuted_axes(axes::inverse(&order))
        .as_standard_layout()
        .into_owned();
    let volume = mask.with_values(volume)?;

    debug!(
        "label; shape: {:?}, connectivity: {}, components: {}, exec: {:?}",
        mask.shape(),
        adjacency,
        component_count,
        runtime
    );

    Ok(LabelingResult {
        volume,
        component_count,
        adjacency,
    })
}

/// Labels a row-major (time, y, x) volume.
fn label_raster(lit: &[bool], shape: [usize; 3], adjacency: Adjacency) -> (Vec<u32>, u32) {
    let [nt, ny, nx] = shape;
    let offsets = adjacency.backward_offsets();
    let mut sets = DisjointSets::new(lit.len());

    for t in 0..nt {
        for y in 0..ny {
            for x in 0..nx {
                let idx = (t * ny + y) * nx + x;
                if !lit[idx] {
                    continue;
                }
                for [dt, dy, dx] in &offsets {
                    let (Some(tt), Some(yy), Some(xx)) = (
                        t.checked_add_signed(*dt),
                        y.checked_add_signed(*dy),
                        x.checked_add_signed(*dx),
                    ) else {
                        continue;
                    };
                    // Backward offsets never step forward in time.
                    if yy >= ny || xx >= nx {
                        continue;
                    }
                    let neighbour = (tt * ny + yy) * nx + xx;
                    if lit[neighbour] {
                        sets.union(idx, neighbour);
                    }
                }
            }
        }
    }

    let mut root_ids = vec![0_u32; lit.len()];
    let mut ids = vec![0_u32; lit.len()];
    let mut count = 0;
    for idx in 0..lit.len() {
        if !lit[idx] {
            continue;
        }
        let root = sets.find(idx);
        if root_ids[root] == 0 {
            count += 1;
            root_ids[root] = count;
        }
        ids[idx] = root_ids[root];
    }
    (ids, count)
}

/// Union-find over voxel indices with path halving and union by
/// rank.
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        match self.rank[a].cmp(&self.rank[b]) {
            std::cmp::Ordering::Less => self.parent[a] = b,
            std::cmp::Ordering::Greater => self.parent[b] = a,
            std::cmp::Ordering::Equal => {
                self.parent[b] = a;
                self.rank[a] += 1;
            }
        }
    }
}
