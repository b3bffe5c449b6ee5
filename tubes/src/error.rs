use cube::CubeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubeError {
    #[error("{0}")]
    Dimension(#[from] DimensionError),

    #[error("invalid {option} {value:?}")]
    Config { option: &'static str, value: String },

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("tube {0} produced no valid sections; try different thresholds")]
    EmptySelection(u32),

    #[error("invalid vase, {0}")]
    Vase(&'static str),

    #[error("{0}")]
    Cube(#[from] CubeError),
}

impl TubeError {
    pub(crate) fn config(option: &'static str, value: impl Into<String>) -> Self {
        Self::Config {
            option,
            value: value.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DimensionError {
    #[error("dimension {name:?} not found in {available:?}")]
    Missing {
        name: String,
        available: Vec<String>,
    },

    #[error("unexpected dimensions {0:?}, only time, y and x may remain")]
    Unexpected(Vec<String>),

    #[error("dimension {0:?} must have numeric coordinates")]
    NonNumeric(String),

    #[error("dimension {0:?} differs between inputs")]
    Mismatch(String),

    #[error("dimension {0:?} is named more than once")]
    Duplicate(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no tubes found; try adjusting thresholds")]
    Empty,

    #[error("select must be 'longest', 'largest' or a tube id, not {0:?}")]
    Rule(String),

    #[error("tube id {0} not found")]
    Id(u32),
}
