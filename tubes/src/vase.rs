//! Vase definitions: a tube's spatial footprint as a time-ordered
//! sequence of polygons.

use crate::TubeError;
use geo::{
    geometry::{Coord, MultiPoint, Polygon},
    orient::Direction,
    Area, ConvexHull, Orient,
};
use itertools::Itertools;
use std::{fmt, iter, str::FromStr};

/// Number of boundary samples used to blend two sections.
const BLEND_SAMPLES: usize = 64;

/// How consumers resolve geometry between sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interp {
    /// Use the section closest in time.
    #[default]
    Nearest,

    /// Blend the two bracketing sections.
    Linear,
}

impl FromStr for Interp {
    type Err = TubeError;

    fn from_str(s: &str) -> Result<Self, TubeError> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            other => Err(TubeError::config("interp", other)),
        }
    }
}

impl fmt::Display for Interp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("nearest"),
            Self::Linear => f.write_str("linear"),
        }
    }
}

/// The footprint of a tube at one time coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct HullSection {
    pub time: f64,

    /// Polygon in the cube's (x, y) coordinate units.
    pub polygon: Polygon<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VaseDefinition {
    sections: Vec<HullSection>,
    interp: Interp,
}

impl VaseDefinition {
    /// Returns a new vase after checking that there is at least one
    /// section, that section times strictly increase, and that every
    /// polygon is valid.
    pub fn new(sections: Vec<HullSection>, interp: Interp) -> Result<Self, TubeError> {
        if sections.is_empty() {
            return Err(TubeError::Vase("no sections"));
        }
        if !sections
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.time < b.time)
        {
            return Err(TubeError::Vase("section times must strictly increase"));
        }
        if !sections.iter().all(|section| is_valid(&section.polygon)) {
            return Err(TubeError::Vase("degenerate section polygon"));
        }
        Ok(Self { sections, interp })
    }

    pub fn sections(&self) -> &[HullSection] {
        &self.sections
    }

    pub fn interp(&self) -> Interp {
        self.interp
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.sections.iter().map(|section| section.time)
    }

    /// Returns the footprint at `time`.
    ///
    /// Times outside the vase clamp to the first or last section.
    /// `Linear` blends the bracketing sections, falling back to the
    /// nearest one if the blend is degenerate.
    pub fn polygon_at(&self, time: f64) -> Polygon<f64> {
        let after = self.sections.partition_point(|section| section.time <= time);
        if after == 0 {
            return self.sections[0].polygon.clone();
        }
        let before = &self.sections[after - 1];
        if after == self.sections.len() || before.time == time {
            return before.polygon.clone();
        }
        let after = &self.sections[after];

        let nearest = if time - before.time <= after.time - time {
            before
        } else {
            after
        };
        match self.interp {
            Interp::Nearest => nearest.polygon.clone(),
            Interp::Linear => {
                let weight = (time - before.time) / (after.time - before.time);
                blend(&before.polygon, &after.polygon, weight)
                    .unwrap_or_else(|| nearest.polygon.clone())
            }
        }
    }
}

/// Returns `true` if `polygon` has a closed, finite exterior enclosing
/// a positive area.
pub(crate) fn is_valid(polygon: &Polygon<f64>) -> bool {
    let exterior = polygon.exterior();
    exterior.is_closed()
        && exterior.0.len() >= 4
        && exterior
            .coords()
            .all(|coord| coord.x.is_finite() && coord.y.is_finite())
        && polygon.unsigned_area() > 0.0
}

/// Linearly interpolates between two convex polygons.
fn blend(a: &Polygon<f64>, b: &Polygon<f64>, weight: f64) -> Option<Polygon<f64>> {
    let a = resample(a, BLEND_SAMPLES)?;
    let b = resample(b, BLEND_SAMPLES)?;
    let hull = a
        .iter()
        .zip(&b)
        .map(|(p, q)| Coord {
            x: p.x + (q.x - p.x) * weight,
            y: p.y + (q.y - p.y) * weight,
        })
        .collect::<MultiPoint<f64>>()
        .convex_hull();
    is_valid(&hull).then_some(hull)
}

/// Returns `n` points evenly spaced along the counter-clockwise
/// exterior of `polygon`, starting from its lowest (then leftmost)
/// vertex.
fn resample(polygon: &Polygon<f64>, n: usize) -> Option<Vec<Coord<f64>>> {
    let oriented = polygon.orient(Direction::Default);
    let ring = &oriented.exterior().0;
    let open = ring.get(..ring.len().checked_sub(1)?)?;
    let start = open
        .iter()
        .position_min_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))?;
    let ring: Vec<Coord<f64>> = open[start..]
        .iter()
        .chain(&open[..start])
        .chain(iter::once(&open[start]))
        .copied()
        .collect();

    let lengths: Vec<f64> = ring
        .iter()
        .tuple_windows()
        .map(|(p, q)| (q.x - p.x).hypot(q.y - p.y))
        .collect();
    let perimeter: f64 = lengths.iter().sum();
    if perimeter.is_nan() || perimeter <= 0.0 {
        return None;
    }

    let mut out = Vec::with_capacity(n);
    let (mut segment, mut walked) = (0, 0.0);
    for k in 0..n {
        #[allow(clippy::cast_precision_loss)]
        let target = perimeter * k as f64 / n as f64;
        while segment + 1 < lengths.len() && walked + lengths[segment] < target {
            walked += lengths[segment];
            segment += 1;
        }
        let (p, q) = (ring[segment], ring[segment + 1]);
        let frac = if lengths[segment] > 0.0 {
            ((target - walked) / lengths[segment]).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(Coord {
            x: p.x + (q.x - p.x) * frac,
            y: p.y + (q.y - p.y) * frac,
        });
    }
    Some(out)
}
