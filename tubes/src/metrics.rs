//! Per-tube statistics.

use crate::{axes, LabelingResult, TubeError};
use cube::{ndarray::Axis as NdAxis, AxisNames};
use log::debug;
use serde::Serialize;
use std::{cmp::Ordering, collections::BTreeMap, io::Write};

/// Statistics of one labeled component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMetrics {
    pub tube_id: u32,

    /// Number of distinct timesteps the component touches.
    pub duration_steps: usize,

    pub n_voxels: usize,

    /// Earliest time coordinate.
    pub time_start: f64,

    /// Latest time coordinate.
    pub time_end: f64,

    /// Spatial bounding box, in coordinate units.
    pub y_min: f64,
    pub y_max: f64,
    pub x_min: f64,
    pub x_max: f64,

    /// Voxels per timestep, over timesteps where the component is
    /// present.
    pub cells_per_timestep_mean: f64,
    pub cells_per_timestep_max: usize,
}

impl ComponentMetrics {
    /// Table order: longest first, then most voxels, then lowest id.
    fn table_order(&self, other: &Self) -> Ordering {
        other
            .duration_steps
            .cmp(&self.duration_steps)
            .then(other.n_voxels.cmp(&self.n_voxels))
            .then(self.tube_id.cmp(&other.tube_id))
    }
}

/// Component statistics sorted by descending `(duration_steps,
/// n_voxels)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MetricsTable {
    rows: Vec<ComponentMetrics>,
}

impl MetricsTable {
    /// Column names, present whether or not there are any rows.
    pub const COLUMNS: [&'static str; 11] = [
        "tube_id",
        "duration_steps",
        "n_voxels",
        "time_start",
        "time_end",
        "y_min",
        "y_max",
        "x_min",
        "x_max",
        "cells_per_timestep_mean",
        "cells_per_timestep_max",
    ];

    pub fn from_rows(mut rows: Vec<ComponentMetrics>) -> Self {
        rows.sort_by(ComponentMetrics::table_order);
        Self { rows }
    }

    pub fn rows(&self) -> &[ComponentMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, tube_id: u32) -> Option<&ComponentMetrics> {
        self.rows.iter().find(|row| row.tube_id == tube_id)
    }

    /// Writes the table as CSV, header first.
    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "{}", Self::COLUMNS.join(","))?;
        for row in &self.rows {
            let ComponentMetrics {
                tube_id,
                duration_steps,
                n_voxels,
                time_start,
                time_end,
                y_min,
                y_max,
                x_min,
                x_max,
                cells_per_timestep_mean,
                cells_per_timestep_max,
            } = row;
            writeln!(
                out,
                "{tube_id},{duration_steps},{n_voxels},{time_start},{time_end},{y_min},{y_max},{x_min},{x_max},{cells_per_timestep_mean},{cells_per_timestep_max}"
            )?;
        }
        Ok(())
    }
}

/// Running totals for one id.
struct Accumulator {
    /// Voxel count keyed by time index.
    per_step: BTreeMap<usize, usize>,
    time: (f64, f64),
    y: (f64, f64),
    x: (f64, f64),
}

impl Accumulator {
    fn new() -> Self {
        let empty = (f64::INFINITY, f64::NEG_INFINITY);
        Self {
            per_step: BTreeMap::new(),
            time: empty,
            y: empty,
            x: empty,
        }
    }

    fn add(&mut self, t_idx: usize, t: f64, y: f64, x: f64) {
        *self.per_step.entry(t_idx).or_default() += 1;
        for ((min, max), value) in [(&mut self.time, t), (&mut self.y, y), (&mut self.x, x)] {
            *min = min.min(value);
            *max = max.max(value);
        }
    }

    fn finish(self, tube_id: u32) -> ComponentMetrics {
        let duration_steps = self.per_step.len();
        let n_voxels: usize = self.per_step.values().sum();
        #[allow(clippy::cast_precision_loss)]
        let cells_per_timestep_mean = n_voxels as f64 / duration_steps as f64;
        ComponentMetrics {
            tube_id,
            duration_steps,
            n_voxels,
            time_start: self.time.0,
            time_end: self.time.1,
            y_min: self.y.0,
            y_max: self.y.1,
            x_min: self.x.0,
            x_max: self.x.1,
            cells_per_timestep_mean,
            cells_per_timestep_max: self.per_step.values().copied().max().unwrap_or(0),
        }
    }
}

/// Returns per-component statistics of `labeling`.
///
/// The time, y and x axes must have numeric coordinates; extents are
/// reported in those coordinates, not indices. Rows are produced for
/// the ids present in the volume, whatever `component_count` says. No
/// components yields an empty table.
pub fn summarize(labeling: &LabelingResult, names: &AxisNames) -> Result<MetricsTable, TubeError> {
    let volume = &labeling.volume;
    let order = axes::locate_exact(volume, names)?;
    let times = axes::numeric(volume, &names.time)?;
    let ys = axes::numeric(volume, &names.y)?;
    let xs = axes::numeric(volume, &names.x)?;

    let mut acc: BTreeMap<u32, Accumulator> = BTreeMap::new();
    let canonical = volume.values().view().permuted_axes(&order[..]);
    for (t_idx, step) in canonical.axis_iter(NdAxis(0)).enumerate() {
        for (idx, &id) in step.indexed_iter() {
            if id == 0 {
                continue;
            }
            let (y_idx, x_idx) = (idx[0], idx[1]);
            acc.entry(id)
                .or_insert_with(Accumulator::new)
                .add(t_idx, times[t_idx], ys[y_idx], xs[x_idx]);
        }
    }

    let rows: Vec<ComponentMetrics> = acc
        .into_iter()
        .map(|(tube_id, acc)| acc.finish(tube_id))
        .collect();
    debug!("summarize; tubes: {}", rows.len());
    Ok(MetricsTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::{summarize, ComponentMetrics, MetricsTable};
    use crate::{label, Adjacency, DimensionError, LabelingResult, TubeError};
    use approx::assert_relative_eq;
    use cube::{Axis, AxisNames, Cube};

    fn labeled(shape: [usize; 3], ids: Vec<u32>, count: u32) -> LabelingResult {
        let [nt, ny, nx] = shape;
        LabelingResult {
            volume: Cube::from_vec(
                vec![
                    Axis::numeric("time", (0..nt).map(|t| 10.0 * t as f64).collect::<Vec<_>>()),
                    Axis::numeric("y", (0..ny).map(|y| 100.0 + y as f64).collect::<Vec<_>>()),
                    Axis::numeric("x", (0..nx).map(|x| -5.0 + x as f64).collect::<Vec<_>>()),
                ],
                ids,
            )
            .unwrap(),
            component_count: count,
            adjacency: Adjacency::Face,
        }
    }

    fn sample() -> LabelingResult {
        #[rustfmt::skip]
        let ids = vec![
            1, 0,
            0, 0,

            1, 1,
            0, 0,

            0, 2,
            2, 0,
        ];
        labeled([3, 2, 2], ids, 2)
    }

    fn assert_sorted(table: &MetricsTable) {
        for pair in table.rows().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.duration_steps > b.duration_steps
                    || (a.duration_steps == b.duration_steps && a.n_voxels >= b.n_voxels)
            );
        }
    }

    #[test]
    fn test_summarize_columns_and_counts() {
        let table = summarize(&sample(), &AxisNames::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_sorted(&table);

        let tube_1 = table.get(1).unwrap();
        assert_eq!(tube_1.duration_steps, 2);
        assert_eq!(tube_1.n_voxels, 3);
        assert_eq!((tube_1.time_start, tube_1.time_end), (0.0, 10.0));
        assert_eq!((tube_1.y_min, tube_1.y_max), (100.0, 100.0));
        assert_eq!((tube_1.x_min, tube_1.x_max), (-5.0, -4.0));
        assert_relative_eq!(tube_1.cells_per_timestep_mean, 1.5);
        assert_eq!(tube_1.cells_per_timestep_max, 2);

        let tube_2 = table.get(2).unwrap();
        assert_eq!(tube_2.duration_steps, 1);
        assert_eq!(tube_2.n_voxels, 2);
        assert_eq!((tube_2.time_start, tube_2.time_end), (20.0, 20.0));
        assert_eq!((tube_2.y_min, tube_2.y_max), (100.0, 101.0));
        assert_relative_eq!(tube_2.cells_per_timestep_mean, 2.0);
    }

    #[test]
    fn test_mean_skips_absent_timesteps() {
        // Present at t=0 (1 voxel) and t=3 (3 voxels), absent between.
        #[rustfmt::skip]
        let ids = vec![
            1, 0, 0,
            0, 0, 0,
            0, 0, 0,
            1, 1, 1,
        ];
        let table = summarize(&labeled([4, 1, 3], ids, 1), &AxisNames::default()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.duration_steps, 2);
        assert_relative_eq!(row.cells_per_timestep_mean, 2.0);
        assert_eq!(row.cells_per_timestep_max, 3);
    }

    #[test]
    fn test_sort_ties_on_voxels_then_id() {
        #[rustfmt::skip]
        let ids = vec![
            1, 0, 2, 0, 3, 3,
            1, 0, 2, 2, 0, 0,
        ];
        let table = summarize(&labeled([2, 1, 6], ids, 3), &AxisNames::default()).unwrap();
        let order: Vec<u32> = table.rows().iter().map(|row| row.tube_id).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_sorted(&table);
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let names = AxisNames::default();
        assert_eq!(
            summarize(&sample(), &names).unwrap(),
            summarize(&sample(), &names).unwrap()
        );
    }

    #[test]
    fn test_empty_table_keeps_schema() {
        let mask = Cube::from_vec(
            vec![
                Axis::numeric("time", vec![0.0, 1.0]),
                Axis::numeric("y", vec![0.0]),
                Axis::numeric("x", vec![0.0]),
            ],
            vec![false, false],
        )
        .unwrap();
        let labeling = label(&mask, Adjacency::Full, &AxisNames::default()).unwrap();
        assert_eq!(labeling.component_count, 0);
        let table = summarize(&labeling, &AxisNames::default()).unwrap();
        assert!(table.is_empty());

        let mut csv = Vec::new();
        table.write_csv(&mut csv).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            format!("{}\n", MetricsTable::COLUMNS.join(","))
        );
    }

    #[test]
    fn test_ids_beyond_component_count() {
        let table = summarize(&labeled([1, 1, 2], vec![1, 2], 1), &AxisNames::default()).unwrap();
        let ids: Vec<u32> = table.rows().iter().map(|row| row.tube_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(table.get(2).unwrap().x_min, -4.0);
    }

    #[test]
    fn test_rejects_repeated_axis_names() {
        let err = summarize(&sample(), &AxisNames::new("time", "time", "x")).unwrap_err();
        assert!(matches!(
            err,
            TubeError::Dimension(DimensionError::Duplicate(name)) if name == "time"
        ));
    }

    #[test]
    fn test_write_csv_row() {
        let table = MetricsTable::from_rows(vec![ComponentMetrics {
            tube_id: 4,
            duration_steps: 2,
            n_voxels: 3,
            time_start: 0.0,
            time_end: 1.0,
            y_min: 0.5,
            y_max: 1.5,
            x_min: 2.0,
            x_max: 2.0,
            cells_per_timestep_mean: 1.5,
            cells_per_timestep_max: 2,
        }]);
        let mut csv = Vec::new();
        table.write_csv(&mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert_eq!(csv.lines().nth(1), Some("4,2,3,0,1,0.5,1.5,2,2,1.5,2"));
    }
}
