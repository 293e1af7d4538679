use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A measured water-quality parameter of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Turbidity,
    Ph,
    Temperature,
    Bod,
    Conductivity,
    Aod,
}

impl Parameter {
    /// Parameters every sample must carry, in validation order.
    pub const REQUIRED: [Parameter; 4] = [
        Parameter::Turbidity,
        Parameter::Ph,
        Parameter::Temperature,
        Parameter::Bod,
    ];

    /// Parameters the user has to switch on per entry.
    pub const OPTIONAL: [Parameter; 2] = [Parameter::Conductivity, Parameter::Aod];

    pub fn is_optional(self) -> bool {
        matches!(self, Parameter::Conductivity | Parameter::Aod)
    }

    pub fn key(self) -> &'static str {
        match self {
            Parameter::Turbidity => "turbidity",
            Parameter::Ph => "ph",
            Parameter::Temperature => "temperature",
            Parameter::Bod => "bod",
            Parameter::Conductivity => "conductivity",
            Parameter::Aod => "aod",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parameter::Turbidity => "Turbidity",
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Bod => "BOD",
            Parameter::Conductivity => "Conductivity",
            Parameter::Aod => "AOD",
        }
    }

    /// Display unit, `None` for dimensionless parameters.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Parameter::Turbidity => Some("NTU"),
            Parameter::Temperature => Some("°C"),
            Parameter::Bod => Some("mg/L"),
            Parameter::Conductivity => Some("μS/cm"),
            Parameter::Ph | Parameter::Aod => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::REQUIRED
            .into_iter()
            .chain(Parameter::OPTIONAL)
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown parameter '{}'", s))
    }
}
