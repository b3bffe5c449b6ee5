mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use cube::{AxisNames, Cube};
use log::info;
use options::{AxisArgs, Cli, Command as CliCmd, NdviArgs};
use serde::Serialize;
use std::io::Write;
use tubes::{hull::HullConfig, vase_extract, TubeFinder, TubeReport};

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    let Cli {
        cube: cube_path,
        axes,
        lo,
        hi,
        ndvi,
        adjacency,
        select,
        interp,
        epsilon,
        no_recovery,
        cmd,
    } = cli;

    env_logger::init();

    let cube = load_cube(&cube_path, &ndvi)?;
    let names = axis_names(&cube, axes)?;

    let finder = TubeFinder::builder()
        .range(lo, hi)
        .adjacency(adjacency)
        .select(select)
        .interp(interp)
        .hull(HullConfig {
            buffer_epsilon: (!no_recovery).then_some(epsilon),
            ..HullConfig::default()
        })
        .axes(names)
        .build();
    let report = finder.run(&cube)?;

    match cmd {
        CliCmd::Metrics => report.metrics.write_csv(std::io::stdout().lock())?,
        CliCmd::Vase => print_json(&report)?,
        CliCmd::Summary => print_summary(&report),
        CliCmd::Extract { out } => {
            let extracted = vase_extract(&cube, &report.vase, finder.names())?;
            extracted.save(&out)?;
            eprintln!("wrote {}", out.display());
        }
    };
    Ok(())
}

/// Loads the cube, reducing it to NDVI if requested.
fn load_cube(path: &std::path::Path, ndvi: &NdviArgs) -> Result<Cube<f64>, AnyError> {
    let raw = Cube::<f64>::load(path)?;
    if ndvi.ndvi {
        Ok(cube::ndvi(&raw, &ndvi.band_axis, &ndvi.nir, &ndvi.red)?)
    } else {
        Ok(raw)
    }
}

fn axis_names(cube: &Cube<f64>, axes: AxisArgs) -> Result<AxisNames, AnyError> {
    let names = if axes.infer_axes {
        let names = AxisNames::infer(cube)?;
        info!("inferred axes; {names:?}");
        names
    } else {
        AxisNames::new(axes.time, axes.y, axes.x)
    };
    Ok(names)
}

/// # Example
///
/// ```sh
/// tubectl --cube data/cubes/tiny.json --interp linear vase | jq '.sections[].time'
/// ```
fn print_json(report: &TubeReport) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonSection {
        time: f64,
        exterior: Vec<[f64; 2]>,
    }

    #[derive(Serialize)]
    struct JsonVase {
        tube_id: u32,
        interp: String,
        sections: Vec<JsonSection>,
    }

    let vase = JsonVase {
        tube_id: report.selected,
        interp: report.vase.interp().to_string(),
        sections: report
            .vase
            .sections()
            .iter()
            .map(|section| JsonSection {
                time: section.time,
                exterior: section
                    .polygon
                    .exterior()
                    .coords()
                    .map(|coord| [coord.x, coord.y])
                    .collect(),
            })
            .collect(),
    };
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &vase)?;
    writeln!(stdout)?;
    Ok(())
}

fn print_summary(report: &TubeReport) {
    let tubes = report.metrics.len();
    if let Some(tube) = report.metrics.get(report.selected) {
        println!(
            "{tubes} tube(s) found; tube {} spans {} step(s) ({}..={}), {} voxel(s), {} section(s)",
            tube.tube_id,
            tube.duration_steps,
            tube.time_start,
            tube.time_end,
            tube.n_voxels,
            report.vase.sections().len()
        );
    }
}
