use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The water-body category that partitions marker storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterBody {
    Ponds,
    River,
    Lake,
}

impl WaterBody {
    pub const ALL: [WaterBody; 3] = [WaterBody::Ponds, WaterBody::River, WaterBody::Lake];

    pub fn key(self) -> &'static str {
        match self {
            WaterBody::Ponds => "ponds",
            WaterBody::River => "river",
            WaterBody::Lake => "lake",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaterBody::Ponds => "Ponds",
            WaterBody::River => "River",
            WaterBody::Lake => "Lake",
        }
    }
}

impl Default for WaterBody {
    fn default() -> Self {
        WaterBody::Ponds
    }
}

impl fmt::Display for WaterBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WaterBody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaterBody::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown water-body category '{}'", s))
    }
}
