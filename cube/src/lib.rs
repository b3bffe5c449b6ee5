//! Named-axis climate data cubes.
//!
//! A [`Cube`] couples an N-dimensional [`ndarray::ArrayD`] with one
//! [`Axis`] per dimension. Axes carry a unique name and an ordered
//! coordinate sequence, so that stages downstream can refer to
//! "time", "y" and "x" by name rather than by position.
//!
//! Missing samples are represented as `NaN`.

mod error;
mod file;
mod names;
mod ndvi;

pub use crate::{error::CubeError, file::CubeFile, names::AxisNames, ndvi::ndvi};
pub use ndarray;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

/// Coordinate values along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coords {
    /// Numeric coordinates, e.g. projected meters, degrees or time
    /// offsets.
    Numeric(Vec<f64>),

    /// Categorical labels, e.g. spectral band names.
    Labels(Vec<String>),
}

impl Coords {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Labels(labels) => labels.len(),
        }
    }

    /// Returns numeric coordinate values, if these are numeric.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(values) => Some(values),
            Self::Labels(_) => None,
        }
    }

    /// Returns the index of `label`, if these are labels.
    pub fn position(&self, label: &str) -> Option<usize> {
        match self {
            Self::Numeric(_) => None,
            Self::Labels(labels) => labels.iter().position(|l| l == label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub coords: Coords,
}

impl Axis {
    pub fn numeric(name: impl Into<String>, coords: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            coords: Coords::Numeric(coords.into()),
        }
    }

    pub fn labels<S: Into<String>>(
        name: impl Into<String>,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            coords: Coords::Labels(labels.into_iter().map(Into::into).collect()),
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.coords.len()
    }
}

/// An N-dimensional array with named, coordinate-carrying axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube<T> {
    axes: Vec<Axis>,
    values: ArrayD<T>,
}

impl<T> Cube<T> {
    /// Returns a new cube after checking that `axes` describe
    /// `values`: one axis per dimension, matching lengths, unique
    /// names.
    pub fn new(axes: Vec<Axis>, values: ArrayD<T>) -> Result<Self, CubeError> {
        if axes.len() != values.ndim() {
            return Err(CubeError::Rank {
                axes: axes.len(),
                rank: values.ndim(),
            });
        }
        for (axis, &extent) in axes.iter().zip(values.shape()) {
            if axis.len() != extent {
                return Err(CubeError::AxisLen {
                    name: axis.name.clone(),
                    len: axis.len(),
                    extent,
                });
            }
        }
        for (idx, axis) in axes.iter().enumerate() {
            if axes[..idx].iter().any(|other| other.name == axis.name) {
                return Err(CubeError::DuplicateAxis(axis.name.clone()));
            }
        }
        Ok(Self { axes, values })
    }

    /// Returns a new cube from row-major `values` shaped by `axes`.
    pub fn from_vec(axes: Vec<Axis>, values: Vec<T>) -> Result<Self, CubeError> {
        let shape: Vec<usize> = axes.iter().map(Axis::len).collect();
        let values = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        Self::new(axes, values)
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn values(&self) -> &ArrayD<T> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<T> {
        self.values
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(|axis| axis.name.as_str()).collect()
    }

    /// Returns the position of the axis called `name`, if any.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.name == name)
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.name == name)
    }

    /// Like [`Cube::axis_index`], but a missing axis is an error.
    pub fn require_axis(&self, name: &str) -> Result<usize, CubeError> {
        self.axis_index(name)
            .ok_or_else(|| CubeError::MissingAxis(name.to_owned()))
    }

    /// Returns a cube with the same axes and `f` applied to every
    /// value.
    pub fn map<U, F>(&self, f: F) -> Cube<U>
    where
        F: FnMut(&T) -> U,
    {
        Cube {
            axes: self.axes.clone(),
            values: self.values.map(f),
        }
    }

    /// Returns a cube with the same axes carrying `values`.
    pub fn with_values<U>(&self, values: ArrayD<U>) -> Result<Cube<U>, CubeError> {
        Cube::new(self.axes.clone(), values)
    }

    /// Returns `true` if `other` has identical axes (names, order and
    /// coordinates).
    pub fn same_axes<U>(&self, other: &Cube<U>) -> bool {
        self.axes == other.axes
    }

    /// Returns a copy with axes reordered so that output axis `i` is
    /// input axis `order[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..self.ndim()`.
    pub fn permuted(&self, order: &[usize]) -> Cube<T>
    where
        T: Clone,
    {
        let axes = order.iter().map(|&idx| self.axes[idx].clone()).collect();
        let values = self
            .values
            .view()
            .permuted_axes(order)
            .as_standard_layout()
            .into_owned();
        Cube { axes, values }
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Coords, Cube, CubeError};

    fn axes() -> Vec<Axis> {
        vec![
            Axis::numeric("time", vec![0.0, 1.0]),
            Axis::numeric("y", vec![10.0, 20.0, 30.0]),
            Axis::labels("band", ["B04", "B08"]),
        ]
    }

    #[test]
    fn test_from_vec_shape() {
        let cube = Cube::from_vec(axes(), (0..12).map(f64::from).collect()).unwrap();
        assert_eq!(cube.shape(), &[2, 3, 2]);
        assert_eq!(cube.values()[[1, 2, 0]], 10.0);
        assert_eq!(cube.axis_names(), vec!["time", "y", "band"]);
        assert_eq!(cube.axis_index("band"), Some(2));
        assert_eq!(cube.axis_index("x"), None);
    }

    #[test]
    fn test_axis_len_mismatch() {
        let mut axes = axes();
        axes[1] = Axis::numeric("y", vec![10.0, 20.0]);
        let err = Cube::new(axes, ndarray::ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 3, 2])))
            .unwrap_err();
        assert!(matches!(err, CubeError::AxisLen { extent: 3, len: 2, .. }));
    }

    #[test]
    fn test_rank_mismatch() {
        let err = Cube::new(
            axes(),
            ndarray::ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 3])),
        )
        .unwrap_err();
        assert!(matches!(err, CubeError::Rank { axes: 3, rank: 2 }));
    }

    #[test]
    fn test_duplicate_axis() {
        let axes = vec![Axis::numeric("y", vec![0.0]), Axis::numeric("y", vec![0.0])];
        let err = Cube::from_vec(axes, vec![1.0]).unwrap_err();
        assert!(matches!(err, CubeError::DuplicateAxis(name) if name == "y"));
    }

    #[test]
    fn test_permuted_moves_axes_and_values() {
        let cube = Cube::from_vec(axes(), (0..12).collect::<Vec<i32>>()).unwrap();
        let permuted = cube.permuted(&[2, 0, 1]);
        assert_eq!(permuted.axis_names(), vec!["band", "time", "y"]);
        assert_eq!(permuted.shape(), &[2, 2, 3]);
        for t in 0..2 {
            for y in 0..3 {
                for b in 0..2 {
                    assert_eq!(permuted.values()[[b, t, y]], cube.values()[[t, y, b]]);
                }
            }
        }
        // Permuting back restores the original cube.
        assert_eq!(permuted.permuted(&[1, 2, 0]), cube);
    }

    #[test]
    fn test_coords_position() {
        let bands = Coords::Labels(vec!["B04".into(), "B08".into()]);
        assert_eq!(bands.position("B08"), Some(1));
        assert_eq!(bands.position("B02"), None);
        assert_eq!(Coords::Numeric(vec![1.0]).position("1"), None);
    }
}
