use crate::{Cube, CubeError};
use serde::{Deserialize, Serialize};

/// Axis names treated as time when inferring [`AxisNames`].
const TIME_NAMES: [&str; 4] = ["time", "t", "date", "datetime"];

/// Names of the temporal and two spatial axes of a cube.
///
/// Every stage that needs to find time, y or x takes one of these
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisNames {
    pub time: String,
    pub y: String,
    pub x: String,
}

impl Default for AxisNames {
    fn default() -> Self {
        Self::new("time", "y", "x")
    }
}

impl AxisNames {
    pub fn new(time: impl Into<String>, y: impl Into<String>, x: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            y: y.into(),
            x: x.into(),
        }
    }

    /// Returns `[time, y, x]`.
    pub fn as_array(&self) -> [&str; 3] {
        [&self.time, &self.y, &self.x]
    }

    /// Guesses axis names from `cube`.
    ///
    /// Time is the first axis with a time-like name, or failing that
    /// the longest axis (first one wins on ties). The last two of the
    /// remaining axes are taken as (y, x).
    pub fn infer<T>(cube: &Cube<T>) -> Result<Self, CubeError> {
        let names = cube.axis_names();
        let mk_err = || CubeError::Infer(names.iter().map(|n| (*n).to_owned()).collect());

        let time = names
            .iter()
            .copied()
            .find(|name| TIME_NAMES.contains(&name.to_lowercase().as_str()))
            .or_else(|| {
                if names.len() < 3 {
                    return None;
                }
                let mut longest: Option<(&str, usize)> = None;
                for (name, &len) in names.iter().zip(cube.shape()) {
                    if longest.map_or(true, |(_, best)| len > best) {
                        longest = Some((*name, len));
                    }
                }
                longest.map(|(name, _)| name)
            })
            .ok_or_else(mk_err)?;

        let spatial: Vec<&str> = names.iter().copied().filter(|n| *n != time).collect();
        match spatial.as_slice() {
            [.., y, x] => Ok(Self::new(time, *y, *x)),
            _ => Err(mk_err()),
        }
    }
}
