//! Suitability masks.

use crate::{axes, DimensionError, TubeError};
use cube::{AxisNames, Cube};
use num_traits::Float;
use std::fmt;

/// Returns `true` where `lo <= value <= hi`.
///
/// Missing (`NaN`) samples are never suitable. Axes are carried over
/// unchanged, including any band axis.
pub fn threshold<T: Float>(
    cube: &Cube<T>,
    lo: T,
    hi: T,
    names: &AxisNames,
) -> Result<Cube<bool>, TubeError> {
    axes::locate(cube, names)?;
    Ok(cube.map(|&value| lo <= value && value <= hi))
}

/// A custom suitability predicate: cube in, same-axes mask out.
pub type CustomRule = Box<dyn Fn(&Cube<f64>) -> Cube<bool>>;

/// How to turn a cube into a suitability mask.
pub enum SuitabilityRule {
    /// Inclusive value range, see [`threshold`].
    Range { lo: f64, hi: f64 },

    /// User supplied predicate.
    Custom(CustomRule),
}

impl Default for SuitabilityRule {
    /// The NDVI band of moderately vegetated land.
    fn default() -> Self {
        Self::Range { lo: 0.3, hi: 0.8 }
    }
}

impl fmt::Debug for SuitabilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { lo, hi } => f
                .debug_struct("Range")
                .field("lo", lo)
                .field("hi", hi)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl SuitabilityRule {
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&Cube<f64>) -> Cube<bool> + 'static,
    {
        Self::Custom(Box::new(rule))
    }

    /// Applies this rule to `cube`.
    ///
    /// A custom rule's output must have exactly the axes of `cube`.
    pub fn apply(&self, cube: &Cube<f64>, names: &AxisNames) -> Result<Cube<bool>, TubeError> {
        match self {
            Self::Range { lo, hi } => threshold(cube, *lo, *hi, names),
            Self::Custom(rule) => {
                axes::locate(cube, names)?;
                let mask = rule(cube);
                if let Some(axis) = cube
                    .axes()
                    .iter()
                    .zip(mask.axes())
                    .find(|(expected, actual)| expected != actual)
                    .map(|(expected, _)| expected)
                {
                    return Err(DimensionError::Mismatch(axis.name.clone()).into());
                }
                if cube.ndim() != mask.ndim() {
                    return Err(DimensionError::Unexpected(
                        mask.axis_names().into_iter().map(str::to_owned).collect(),
                    )
                    .into());
                }
                Ok(mask)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{threshold, SuitabilityRule};
    use crate::{DimensionError, TubeError};
    use cube::{Axis, AxisNames, Cube};

    fn ndvi() -> Cube<f64> {
        let values = (0..5 * 4 * 4).map(|i| f64::from(i) / 79.0).collect();
        Cube::from_vec(
            vec![
                Axis::numeric("time", (0..5).map(f64::from).collect::<Vec<_>>()),
                Axis::numeric("y", vec![0.0, 1.0, 2.0, 3.0]),
                Axis::numeric("x", vec![0.0, 1.0, 2.0, 3.0]),
            ],
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_threshold_preserves_axes() {
        let cube = ndvi();
        let mask = threshold(&cube, 0.2, 0.7, &AxisNames::default()).unwrap();
        assert!(mask.same_axes(&cube));
        assert_eq!(mask.shape(), cube.shape());
    }

    #[test]
    fn test_threshold_matches_predicate() {
        let mut cube = ndvi().into_values();
        cube[[1, 1, 1]] = f64::NAN;
        cube[[0, 0, 0]] = 0.2;
        cube[[0, 0, 1]] = 0.7;
        let cube = ndvi().with_values(cube).unwrap();
        let mask = threshold(&cube, 0.2, 0.7, &AxisNames::default()).unwrap();
        for (value, suitable) in cube.values().iter().zip(mask.values().iter()) {
            assert_eq!(*suitable, 0.2 <= *value && *value <= 0.7);
        }
        assert!(!mask.values()[[1, 1, 1]]);
        // Both bounds are inclusive.
        assert!(mask.values()[[0, 0, 0]]);
        assert!(mask.values()[[0, 0, 1]]);
    }

    #[test]
    fn test_threshold_is_idempotent() {
        let cube = ndvi();
        let names = AxisNames::default();
        assert_eq!(
            threshold(&cube, 0.3, 0.8, &names).unwrap(),
            threshold(&cube, 0.3, 0.8, &names).unwrap()
        );
    }

    #[test]
    fn test_threshold_requires_axes() {
        let err = threshold(&ndvi(), 0.0, 1.0, &AxisNames::new("date", "y", "x")).unwrap_err();
        assert!(matches!(
            err,
            TubeError::Dimension(DimensionError::Missing { name, .. }) if name == "date"
        ));
    }

    #[test]
    fn test_custom_rule() {
        let rule = SuitabilityRule::custom(|cube| cube.map(|v| *v > 0.5));
        let mask = rule.apply(&ndvi(), &AxisNames::default()).unwrap();
        assert_eq!(
            mask.values().iter().filter(|v| **v).count(),
            ndvi().values().iter().filter(|v| **v > 0.5).count()
        );
    }

    #[test]
    fn test_custom_rule_must_keep_axes() {
        let rule = SuitabilityRule::custom(|cube| {
            cube.permuted(&[0, 2, 1]).map(|v| *v > 0.5)
        });
        let err = rule.apply(&ndvi(), &AxisNames::default()).unwrap_err();
        assert!(matches!(
            err,
            TubeError::Dimension(DimensionError::Mismatch(name)) if name == "y"
        ));
    }
}
