//! The shared create/update form. Every field holds the raw text the user typed;
//! parsing and range checks happen in the validation engine.

use crate::{
    geo::Coordinates,
    marker::{Marker, MarkerColor},
    parameter::Parameter,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerDraft {
    pub latitude: String,
    pub longitude: String,
    pub color: Option<MarkerColor>,
    pub turbidity: String,
    pub ph: String,
    pub temperature: String,
    pub bod: String,
    pub conductivity: String,
    pub aod: String,
    /// Optional parameters switched on for this entry.
    pub enabled: BTreeSet<Parameter>,
}

impl MarkerDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft holding only a location, as produced by a map click.
    pub fn at(coordinates: Coordinates) -> Self {
        let mut draft = Self::default();
        draft.set_coordinates(coordinates);
        draft
    }

    /// Repopulates every field from a committed marker. Optional parameters the
    /// marker carries come back enabled, the others disabled and blank.
    pub fn from_marker(marker: &Marker) -> Self {
        let fields = &marker.fields;
        let mut enabled = BTreeSet::new();
        if fields.conductivity.is_some() {
            enabled.insert(Parameter::Conductivity);
        }
        if fields.aod.is_some() {
            enabled.insert(Parameter::Aod);
        }
        Self {
            latitude: fields.latitude.to_string(),
            longitude: fields.longitude.to_string(),
            color: fields.color,
            turbidity: fields.turbidity.to_string(),
            ph: fields.ph.to_string(),
            temperature: fields.temperature.to_string(),
            bod: fields.bod.to_string(),
            conductivity: fields.conductivity.map(|v| v.to_string()).unwrap_or_default(),
            aod: fields.aod.map(|v| v.to_string()).unwrap_or_default(),
            enabled,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.latitude = coordinates.latitude.to_string();
        self.longitude = coordinates.longitude.to_string();
    }

    pub fn value(&self, parameter: Parameter) -> &str {
        match parameter {
            Parameter::Turbidity => &self.turbidity,
            Parameter::Ph => &self.ph,
            Parameter::Temperature => &self.temperature,
            Parameter::Bod => &self.bod,
            Parameter::Conductivity => &self.conductivity,
            Parameter::Aod => &self.aod,
        }
    }

    pub fn set_value(&mut self, parameter: Parameter, value: impl Into<String>) {
        let slot = match parameter {
            Parameter::Turbidity => &mut self.turbidity,
            Parameter::Ph => &mut self.ph,
            Parameter::Temperature => &mut self.temperature,
            Parameter::Bod => &mut self.bod,
            Parameter::Conductivity => &mut self.conductivity,
            Parameter::Aod => &mut self.aod,
        };
        *slot = value.into();
    }

    pub fn is_enabled(&self, parameter: Parameter) -> bool {
        self.enabled.contains(&parameter)
    }

    /// Flips an optional parameter on or off and returns whether it is now on.
    /// Required parameters are always on and are left untouched.
    pub fn toggle(&mut self, parameter: Parameter) -> bool {
        if !parameter.is_optional() {
            return true;
        }
        if !self.enabled.remove(&parameter) {
            self.enabled.insert(parameter);
        }
        self.is_enabled(parameter)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
