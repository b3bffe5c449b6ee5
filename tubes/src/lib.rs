//! # Suitability tubes
//!
//! `tubes` finds regions of a (time, y, x) data cube that stay within
//! a suitable value range, follows them through time as connected
//! components, and describes a chosen component as a "vase": one
//! convex polygon per timestep.
//!
//! ```text
//! cube -> mask -> labels -> metrics -> selected id -> vase
//! ```
//!
//! Each stage is usable on its own; [`TubeFinder`] chains them.

mod axes;
mod error;
mod extract;
pub mod hull;
mod label;
mod mask;
mod metrics;
mod pipeline;
mod select;
mod vase;

pub use {
    crate::{
        error::{DimensionError, SelectionError, TubeError},
        extract::{vase_extract, vase_mask},
        hull::HullConfig,
        label::{label, Adjacency, LabelingResult},
        mask::{threshold, CustomRule, SuitabilityRule},
        metrics::{summarize, ComponentMetrics, MetricsTable},
        pipeline::{TubeFinder, TubeFinderBuilder, TubeReport},
        select::{select, SelectRule},
        vase::{HullSection, Interp, VaseDefinition},
    },
    cube, geo,
};
