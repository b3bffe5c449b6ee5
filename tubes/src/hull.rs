//! Convex hull sections of a selected tube.

use crate::{
    axes,
    vase::{is_valid, HullSection, Interp, VaseDefinition},
    DimensionError, LabelingResult, TubeError,
};
use cube::{ndarray::Axis as NdAxis, AxisNames, Cube};
use geo::{
    geometry::{Coord, MultiPoint, Polygon},
    ConvexHull,
};
use log::debug;
use std::str::FromStr;

/// Default half-width used to grow degenerate hulls.
pub const DEFAULT_BUFFER_EPSILON: f64 = 1e-9;

/// How a section polygon is built from voxel centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HullMethod {
    #[default]
    Convex,
}

impl FromStr for HullMethod {
    type Err = TubeError;

    fn from_str(s: &str) -> Result<Self, TubeError> {
        match s {
            "convex" => Ok(Self::Convex),
            other => Err(TubeError::config("hull method", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullConfig {
    pub method: HullMethod,

    /// When a timestep's hull has no area (a single voxel, or voxels
    /// in a line), each voxel center is grown into a square of this
    /// half-width and the hull is taken again. `None` skips such
    /// timesteps outright.
    pub buffer_epsilon: Option<f64>,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            method: HullMethod::Convex,
            buffer_epsilon: Some(DEFAULT_BUFFER_EPSILON),
        }
    }
}

/// Builds a [`VaseDefinition`] from the voxels of tube `tube_id`.
///
/// One section is produced per timestep where the tube is present,
/// in ascending time order. Timesteps whose hull stays degenerate are
/// skipped; if none survive this fails with
/// [`TubeError::EmptySelection`].
///
/// `cube` must share its time, y and x axes with the labeled volume.
pub fn build<T>(
    cube: &Cube<T>,
    labeling: &LabelingResult,
    tube_id: u32,
    interp: Interp,
    config: &HullConfig,
    names: &AxisNames,
) -> Result<VaseDefinition, TubeError> {
    let volume = &labeling.volume;
    let order = axes::locate_exact(volume, names)?;
    axes::locate(cube, names)?;
    for name in names.as_array() {
        if cube.axis(name) != volume.axis(name) {
            return Err(DimensionError::Mismatch(name.to_owned()).into());
        }
    }
    let times = axes::numeric(volume, &names.time)?;
    let ys = axes::numeric(volume, &names.y)?;
    let xs = axes::numeric(volume, &names.x)?;

    let mut steps: Vec<usize> = (0..times.len()).collect();
    steps.sort_by(|a, b| times[*a].total_cmp(&times[*b]));

    let canonical = volume.values().view().permuted_axes(&order[..]);
    let mut sections = Vec::new();
    for t_idx in steps {
        let points: Vec<Coord<f64>> = canonical
            .index_axis(NdAxis(0), t_idx)
            .indexed_iter()
            .filter(|(_, id)| **id == tube_id)
            .map(|(idx, _)| Coord {
                x: xs[idx[1]],
                y: ys[idx[0]],
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        let hull = match config.method {
            HullMethod::Convex => convex_hull(&points, config.buffer_epsilon),
        };
        match hull {
            Some(polygon) => sections.push(HullSection {
                time: times[t_idx],
                polygon,
            }),
            None => debug!(
                "hull; tube: {tube_id}, time: {}, points: {}, degenerate, skipped",
                times[t_idx],
                points.len()
            ),
        }
    }

    if sections.is_empty() {
        return Err(TubeError::EmptySelection(tube_id));
    }
    debug!("hull; tube: {tube_id}, sections: {}", sections.len());
    VaseDefinition::new(sections, interp)
}

/// Returns the convex hull of `points`, growing each point by
/// `buffer_epsilon` if the plain hull is degenerate.
fn convex_hull(points: &[Coord<f64>], buffer_epsilon: Option<f64>) -> Option<Polygon<f64>> {
    let hull = points
        .iter()
        .copied()
        .collect::<MultiPoint<f64>>()
        .convex_hull();
    if is_valid(&hull) {
        return Some(hull);
    }

    let eps = buffer_epsilon.filter(|eps| eps.is_finite() && *eps > 0.0)?;
    let hull = points
        .iter()
        .flat_map(|c| {
            [(-eps, -eps), (eps, -eps), (eps, eps), (-eps, eps)].map(|(dx, dy)| Coord {
                x: c.x + dx,
                y: c.y + dy,
            })
        })
        .collect::<MultiPoint<f64>>()
        .convex_hull();
    is_valid(&hull).then_some(hull)
}
