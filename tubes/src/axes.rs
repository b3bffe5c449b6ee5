use crate::DimensionError;
use cube::{AxisNames, Cube};

/// Returns the positions of the time, y and x axes in `cube`.
///
/// The three names must refer to three different axes.
pub(crate) fn locate<T>(cube: &Cube<T>, names: &AxisNames) -> Result<[usize; 3], DimensionError> {
    let find = |name: &str| {
        cube.axis_index(name).ok_or_else(|| DimensionError::Missing {
            name: name.to_owned(),
            available: cube.axis_names().into_iter().map(str::to_owned).collect(),
        })
    };
    let order = [find(&names.time)?, find(&names.y)?, find(&names.x)?];
    for (idx, name) in names.as_array().into_iter().enumerate() {
        if order[..idx].contains(&order[idx]) {
            return Err(DimensionError::Duplicate(name.to_owned()));
        }
    }
    Ok(order)
}

/// Like [`locate`], but `cube` may not have any other axes.
pub(crate) fn locate_exact<T>(
    cube: &Cube<T>,
    names: &AxisNames,
) -> Result<[usize; 3], DimensionError> {
    let order = locate(cube, names)?;
    if cube.ndim() != 3 {
        let extra = cube
            .axis_names()
            .into_iter()
            .filter(|name| !names.as_array().contains(name))
            .map(str::to_owned)
            .collect();
        return Err(DimensionError::Unexpected(extra));
    }
    Ok(order)
}

/// Returns the numeric coordinates of axis `name`.
pub(crate) fn numeric<'a, T>(cube: &'a Cube<T>, name: &str) -> Result<&'a [f64], DimensionError> {
    cube.axis(name)
        .ok_or_else(|| DimensionError::Missing {
            name: name.to_owned(),
            available: cube.axis_names().into_iter().map(str::to_owned).collect(),
        })?
        .coords
        .as_numeric()
        .ok_or_else(|| DimensionError::NonNumeric(name.to_owned()))
}

/// Returns the permutation which undoes `order`.
pub(crate) fn inverse(order: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; order.len()];
    for (dst, &src) in order.iter().enumerate() {
        inverse[src] = dst;
    }
    inverse
}
