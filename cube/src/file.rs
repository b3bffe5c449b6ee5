//! JSON cube files.
//!
//! ```json
//! {
//!   "axes": [
//!     { "name": "time", "coords": [0, 1] },
//!     { "name": "y", "coords": [0.0, 30.0] },
//!     { "name": "x", "coords": [0.0, 30.0] }
//!   ],
//!   "values": [0.1, 0.2, null, 0.4, 0.5, 0.6, 0.7, 0.8]
//! }
//! ```
//!
//! `values` are row-major over `axes`; `null` is a missing sample.

use crate::{Axis, Cube, CubeError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeFile {
    pub axes: Vec<Axis>,
    pub values: Vec<Option<f64>>,
}

impl TryFrom<CubeFile> for Cube<f64> {
    type Error = CubeError;

    fn try_from(CubeFile { axes, values }: CubeFile) -> Result<Self, CubeError> {
        let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Cube::from_vec(axes, values)
    }
}

impl From<&Cube<f64>> for CubeFile {
    fn from(cube: &Cube<f64>) -> Self {
        Self {
            axes: cube.axes().to_vec(),
            values: cube
                .values()
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect(),
        }
    }
}

impl Cube<f64> {
    /// Returns a cube read from the JSON file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CubeError> {
        debug!("loading {:?}", path.as_ref());
        let rdr = BufReader::new(File::open(path)?);
        Self::from_reader(rdr)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, CubeError> {
        let file: CubeFile = serde_json::from_reader(rdr)?;
        let cube = Self::try_from(file)?;
        debug!("cube; axes: {:?}, shape: {:?}", cube.axis_names(), cube.shape());
        Ok(cube)
    }

    /// Writes this cube as JSON to the file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CubeError> {
        let mut wtr = BufWriter::new(File::create(path)?);
        self.to_writer(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, wtr: W) -> Result<(), CubeError> {
        serde_json::to_writer(wtr, &CubeFile::from(self))?;
        Ok(())
    }
}
