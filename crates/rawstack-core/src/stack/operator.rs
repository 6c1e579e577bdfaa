use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StackError;

/// Pixel-wise statistic the compositor applies across all frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackOperator {
    #[default]
    Mean,
    Max,
    Min,
    Median,
}

impl StackOperator {
    /// All operators, in the order they are offered to the user.
    pub const ALL: [StackOperator; 4] = [Self::Mean, Self::Max, Self::Min, Self::Median];

    /// Name understood by the compositor's `-evaluate-sequence`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Max => "max",
            Self::Min => "min",
            Self::Median => "median",
        }
    }
}

impl fmt::Display for StackOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackOperator {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                StackError::Config(format!(
                    "unknown stack operator '{s}' (expected mean, max, min or median)"
                ))
            })
    }
}
