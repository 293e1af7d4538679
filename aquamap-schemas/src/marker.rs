//! Defines the committed water-sample record and the palette used to display it.

use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a marker, unique within one marker store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed categorical palette a marker can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Red,
    Blue,
    Yellow,
    Green,
}

impl MarkerColor {
    /// Palette order. The position of a color in this array is its palette index.
    pub const ALL: [MarkerColor; 4] = [
        MarkerColor::Red,
        MarkerColor::Blue,
        MarkerColor::Yellow,
        MarkerColor::Green,
    ];

    /// Color shown for markers that were committed without one.
    pub const DEFAULT: MarkerColor = MarkerColor::Red;

    pub fn index(self) -> u8 {
        match self {
            MarkerColor::Red => 0,
            MarkerColor::Blue => 1,
            MarkerColor::Yellow => 2,
            MarkerColor::Green => 3,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            MarkerColor::Red => "#ef4444",
            MarkerColor::Blue => "#3b82f6",
            MarkerColor::Yellow => "#eab308",
            MarkerColor::Green => "#22c55e",
        }
    }

    /// RGB triple matching `hex`.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            MarkerColor::Red => (0xef, 0x44, 0x44),
            MarkerColor::Blue => (0x3b, 0x82, 0xf6),
            MarkerColor::Yellow => (0xea, 0xb3, 0x08),
            MarkerColor::Green => (0x22, 0xc5, 0x5e),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Green => "green",
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MarkerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkerColor::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown marker color '{}'", s))
    }
}

/// The mutable, already-parsed content of a marker.
///
/// Optional parameters are `None` unless the user explicitly enabled them for
/// the entry; a disabled parameter is never stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerFields {
    /// Latitude in degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180].
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    /// Turbidity in NTU.
    pub turbidity: f64,
    pub ph: f64,
    /// Water temperature in degrees Celsius.
    pub temperature: f64,
    /// Biochemical oxygen demand in mg/L.
    pub bod: f64,
    /// Conductivity in μS/cm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductivity: Option<f64>,
    /// Aerosol optical depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aod: Option<f64>,
}

impl MarkerFields {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn display_color(&self) -> MarkerColor {
        self.color.unwrap_or(MarkerColor::DEFAULT)
    }
}

/// A committed, geotagged water-quality sample.
///
/// `id` and `timestamp` are fixed when the marker is created; every other field
/// can only change through an explicit update tied to `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    #[serde(flatten)]
    pub fields: MarkerFields,
    pub timestamp: DateTime<Utc>,
}

impl Marker {
    pub fn coordinates(&self) -> Coordinates {
        self.fields.coordinates()
    }

    pub fn display_color(&self) -> MarkerColor {
        self.fields.display_color()
    }
}
