use crate::{Axis, Coords, Cube, CubeError};
use log::debug;
use ndarray::{Axis as NdAxis, Zip};
use num_traits::Float;

/// Returns the Normalized Difference Vegetation Index,
/// `(nir - red) / (nir + red)`, of a cube with a labelled band axis.
///
/// The band axis is dropped from the output. Samples where
/// `nir + red == 0` are `NaN`.
pub fn ndvi<T: Float>(
    cube: &Cube<T>,
    band_axis: &str,
    nir: &str,
    red: &str,
) -> Result<Cube<T>, CubeError> {
    let band_idx = cube.require_axis(band_axis)?;
    let bands = &cube.axes()[band_idx].coords;
    if let Coords::Numeric(_) = bands {
        return Err(CubeError::Unlabeled(band_axis.to_owned()));
    }
    let position = |label: &str| {
        bands.position(label).ok_or_else(|| CubeError::MissingLabel {
            axis: band_axis.to_owned(),
            label: label.to_owned(),
        })
    };
    let nir_values = cube.values().index_axis(NdAxis(band_idx), position(nir)?);
    let red_values = cube.values().index_axis(NdAxis(band_idx), position(red)?);

    let values = Zip::from(nir_values)
        .and(red_values)
        .map_collect(|&n, &r| {
            let sum = n + r;
            if sum.is_zero() {
                T::nan()
            } else {
                (n - r) / sum
            }
        });

    let axes: Vec<Axis> = cube
        .axes()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != band_idx)
        .map(|(_, axis)| axis.clone())
        .collect();
    debug!("ndvi; nir: {nir}, red: {red}, rank: {}", axes.len());
    Cube::new(axes, values)
}
