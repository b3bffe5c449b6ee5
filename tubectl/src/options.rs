use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tubes::{Adjacency, Interp, SelectRule};

/// Find suitability tubes in a (time, y, x) data cube.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Cube JSON file: `{"axes": [{"name", "coords"}], "values": [..]}`.
    #[arg(short, long)]
    pub cube: PathBuf,

    #[command(flatten)]
    pub axes: AxisArgs,

    /// Lower bound of the suitable range (inclusive).
    #[arg(long, default_value_t = 0.3)]
    pub lo: f64,

    /// Upper bound of the suitable range (inclusive).
    #[arg(long, default_value_t = 0.8)]
    pub hi: f64,

    #[command(flatten)]
    pub ndvi: NdviArgs,

    /// Neighbourhood: 6 (face) or 26 (full).
    #[arg(short, long, default_value_t = Adjacency::Face)]
    pub adjacency: Adjacency,

    /// Tube to build the vase from: 'longest', 'largest' or an id.
    #[arg(short, long, default_value_t = SelectRule::Longest)]
    pub select: SelectRule,

    /// Geometry between sections: 'nearest' or 'linear'.
    #[arg(short, long, default_value_t = Interp::Nearest)]
    pub interp: Interp,

    /// Half-width used to grow single-voxel and collinear sections.
    #[arg(long, default_value_t = tubes::hull::DEFAULT_BUFFER_EPSILON)]
    pub epsilon: f64,

    /// Skip degenerate sections instead of growing them.
    #[arg(long, default_value_t = false, conflicts_with = "epsilon")]
    pub no_recovery: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug)]
pub struct AxisArgs {
    /// Name of the time axis.
    #[arg(long, default_value = "time")]
    pub time: String,

    /// Name of the y (row) axis.
    #[arg(long, default_value = "y")]
    pub y: String,

    /// Name of the x (column) axis.
    #[arg(long, default_value = "x")]
    pub x: String,

    /// Guess axis names from the cube instead.
    #[arg(long, default_value_t = false, conflicts_with_all = ["time", "y", "x"])]
    pub infer_axes: bool,
}

#[derive(Args, Debug)]
pub struct NdviArgs {
    /// Compute NDVI from two bands before thresholding.
    #[arg(long, default_value_t = false)]
    pub ndvi: bool,

    /// Name of the band axis.
    #[arg(long, default_value = "band", requires = "ndvi")]
    pub band_axis: String,

    /// Near-infrared band label.
    #[arg(long, default_value = "B08", requires = "ndvi")]
    pub nir: String,

    /// Red band label.
    #[arg(long, default_value = "B04", requires = "ndvi")]
    pub red: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print per-tube metrics as CSV.
    Metrics,

    /// Print the selected tube's vase as JSON.
    Vase,

    /// Print a one-line summary.
    Summary,

    /// Write the cube masked to the selected vase.
    Extract {
        /// Output cube JSON path.
        out: PathBuf,
    },
}
