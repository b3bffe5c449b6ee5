use crate::{MetricsTable, SelectionError, TubeError};
use std::{fmt, str::FromStr};

/// Which tube to pick from a [`MetricsTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectRule {
    /// Most timesteps, then most voxels.
    #[default]
    Longest,

    /// Most voxels, then most timesteps.
    Largest,

    /// An explicit tube id.
    Id(u32),
}

impl FromStr for SelectRule {
    type Err = TubeError;

    fn from_str(s: &str) -> Result<Self, TubeError> {
        match s {
            "longest" => Ok(Self::Longest),
            "largest" => Ok(Self::Largest),
            other => match other.parse::<u32>() {
                Ok(id) if id > 0 => Ok(Self::Id(id)),
                _ => Err(SelectionError::Rule(other.to_owned()).into()),
            },
        }
    }
}

impl fmt::Display for SelectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Longest => f.write_str("longest"),
            Self::Largest => f.write_str("largest"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Returns the id of the tube in `table` chosen by `rule`.
pub fn select(table: &MetricsTable, rule: SelectRule) -> Result<u32, TubeError> {
    let first = table.rows().first().ok_or(SelectionError::Empty)?;
    let id = match rule {
        // The table is already in this order.
        SelectRule::Longest => first.tube_id,
        SelectRule::Largest => {
            let mut best = first;
            for row in &table.rows()[1..] {
                if (row.n_voxels, row.duration_steps) > (best.n_voxels, best.duration_steps) {
                    best = row;
                }
            }
            best.tube_id
        }
        SelectRule::Id(id) => table.get(id).ok_or(SelectionError::Id(id))?.tube_id,
    };
    Ok(id)
}
