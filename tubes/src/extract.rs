//! Masking a cube with a vase.

use crate::{axes, TubeError, VaseDefinition};
use cube::{
    ndarray::{ArrayD, Zip},
    AxisNames, Cube,
};
use geo::{geometry::Coord, Intersects};
use log::debug;
use num_traits::Float;

/// Returns `true` for every voxel of `cube` whose (x, y) center lies
/// inside or on the vase polygon at that voxel's time.
///
/// The mask has all of `cube`'s axes; any axis besides time, y and x
/// is broadcast.
pub fn vase_mask<T>(
    cube: &Cube<T>,
    vase: &VaseDefinition,
    names: &AxisNames,
) -> Result<Cube<bool>, TubeError> {
    let [t_ax, y_ax, x_ax] = axes::locate(cube, names)?;
    let times = axes::numeric(cube, &names.time)?;
    let ys = axes::numeric(cube, &names.y)?;
    let xs = axes::numeric(cube, &names.x)?;
    let (ny, nx) = (ys.len(), xs.len());

    let now = std::time::Instant::now();
    let mut inside = Vec::with_capacity(times.len() * ny * nx);
    for &time in times {
        let polygon = vase.polygon_at(time);
        for &y in ys {
            inside.extend(xs.iter().map(|&x| polygon.intersects(&Coord { x, y })));
        }
    }
    let values = ArrayD::from_shape_fn(cube.shape(), |idx| {
        inside[(idx[t_ax] * ny + idx[y_ax]) * nx + idx[x_ax]]
    });
    let mask = cube.with_values(values)?;

    debug!(
        "vase_mask; shape: {:?}, inside: {}, exec: {:?}",
        cube.shape(),
        inside.iter().filter(|inside| **inside).count(),
        now.elapsed()
    );
    Ok(mask)
}

/// Returns `cube` with every voxel outside the vase set to `NaN`.
pub fn vase_extract<T: Float>(
    cube: &Cube<T>,
    vase: &VaseDefinition,
    names: &AxisNames,
) -> Result<Cube<T>, TubeError> {
    let mask = vase_mask(cube, vase, names)?;
    let values = Zip::from(cube.values())
        .and(mask.values())
        .map_collect(|&value, &inside| if inside { value } else { T::nan() });
    Ok(cube.with_values(values)?)
}
