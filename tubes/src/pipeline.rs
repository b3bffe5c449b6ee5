use crate::{
    hull::{self, HullConfig},
    label, metrics, select, Adjacency, Interp, LabelingResult, MetricsTable, SelectRule,
    SelectionError, SuitabilityRule, TubeError, VaseDefinition,
};
use cube::{AxisNames, Cube};
use log::debug;

/// Everything produced by one [`TubeFinder::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct TubeReport {
    pub labeling: LabelingResult,

    pub metrics: MetricsTable,

    /// Id of the tube the vase was built from.
    pub selected: u32,

    pub vase: VaseDefinition,
}

/// Threshold, label, summarize, select and hull in one call.
#[derive(Debug, Default)]
pub struct TubeFinder {
    rule: SuitabilityRule,
    adjacency: Adjacency,
    select: SelectRule,
    interp: Interp,
    hull: HullConfig,
    names: AxisNames,
}

impl TubeFinder {
    pub fn builder() -> TubeFinderBuilder {
        TubeFinderBuilder {
            finder: Self::default(),
        }
    }

    pub fn names(&self) -> &AxisNames {
        &self.names
    }

    /// Runs every stage on `cube`.
    ///
    /// Fails with [`SelectionError::Empty`] if nothing in `cube` is
    /// suitable.
    pub fn run(&self, cube: &Cube<f64>) -> Result<TubeReport, TubeError> {
        let now = std::time::Instant::now();
        let mask = self.rule.apply(cube, &self.names)?;
        let mask_runtime = now.elapsed();

        let labeling = label(&mask, self.adjacency, &self.names)?;

        let metrics = metrics::summarize(&labeling, &self.names)?;
        if metrics.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        let selected = select(&metrics, self.select)?;

        let now = std::time::Instant::now();
        let vase = hull::build(
            cube,
            &labeling,
            selected,
            self.interp,
            &self.hull,
            &self.names,
        )?;
        let hull_runtime = now.elapsed();

        debug!(
            "run; tubes: {}, selected: {}, sections: {}, mask_exec: {:?}, hull_exec: {:?}",
            metrics.len(),
            selected,
            vase.sections().len(),
            mask_runtime,
            hull_runtime
        );

        Ok(TubeReport {
            labeling,
            metrics,
            selected,
            vase,
        })
    }
}

pub struct TubeFinderBuilder {
    finder: TubeFinder,
}

impl TubeFinderBuilder {
    pub fn rule(mut self, rule: SuitabilityRule) -> Self {
        self.finder.rule = rule;
        self
    }

    /// Shorthand for an inclusive [`SuitabilityRule::Range`].
    pub fn range(self, lo: f64, hi: f64) -> Self {
        self.rule(SuitabilityRule::Range { lo, hi })
    }

    pub fn adjacency(mut self, adjacency: Adjacency) -> Self {
        self.finder.adjacency = adjacency;
        self
    }

    pub fn select(mut self, rule: SelectRule) -> Self {
        self.finder.select = rule;
        self
    }

    pub fn interp(mut self, interp: Interp) -> Self {
        self.finder.interp = interp;
        self
    }

    pub fn hull(mut self, config: HullConfig) -> Self {
        self.finder.hull = config;
        self
    }

    pub fn axes(mut self, names: AxisNames) -> Self {
        self.finder.names = names;
        self
    }

    pub fn build(self) -> TubeFinder {
        self.finder
    }
}
