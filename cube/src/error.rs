use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("{axes} axes declared for a rank {rank} array")]
    Rank { axes: usize, rank: usize },

    #[error("axis {name:?} has {len} coordinates but the array extent is {extent}")]
    AxisLen {
        name: String,
        len: usize,
        extent: usize,
    },

    #[error("duplicate axis name {0:?}")]
    DuplicateAxis(String),

    #[error("axis {0:?} not found")]
    MissingAxis(String),

    #[error("label {label:?} not found on axis {axis:?}")]
    MissingLabel { axis: String, label: String },

    #[error("could not infer time, y and x axes from {0:?}")]
    Infer(Vec<String>),

    #[error("axis {0:?} does not carry labels")]
    Unlabeled(String),
}
