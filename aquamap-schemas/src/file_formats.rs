//! On-disk formats read by the application.

use crate::{category::WaterBody, marker::MarkerColor, parameter::Parameter};
use serde::Deserialize;

/// A replayable sequence of user interactions.
#[derive(Debug, Deserialize)]
pub struct ScriptFile {
    pub schema_version: String,
    #[serde(default)]
    pub category: Option<WaterBody>,
    pub steps: Vec<ScriptStep>,
}

/// A form value written either as text or as a bare YAML number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
}

impl FieldInput {
    pub fn into_text(self) -> String {
        match self {
            FieldInput::Number(n) => n.to_string(),
            FieldInput::Text(s) => s,
        }
    }
}

/// One scripted interaction. Marker `target`s are positions in the active
/// store's list, the way a user picks a row from the marker list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    SwitchCategory {
        category: WaterBody,
    },
    ContextClick {
        latitude: f64,
        longitude: f64,
    },
    MapClick {
        latitude: f64,
        longitude: f64,
    },
    MarkerClick {
        target: usize,
    },
    PointClick {
        target: usize,
    },
    ClusterClick {
        #[serde(default)]
        cluster_id: u64,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        point_count: usize,
    },
    Fill {
        latitude: Option<FieldInput>,
        longitude: Option<FieldInput>,
        turbidity: Option<FieldInput>,
        ph: Option<FieldInput>,
        temperature: Option<FieldInput>,
        bod: Option<FieldInput>,
        conductivity: Option<FieldInput>,
        aod: Option<FieldInput>,
    },
    SetColor {
        color: MarkerColor,
    },
    Toggle {
        parameter: Parameter,
    },
    Submit,
    Edit {
        target: usize,
    },
    Remove {
        target: usize,
    },
    Cancel,
    DismissPin,
    ClosePopup,
    GenerateSamples {
        #[serde(default)]
        count: Option<usize>,
    },
    DeleteSamples,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_deserialize_from_tagged_json() {
        let json = r#"{
            "schema_version": "1",
            "steps": [
                {"action": "context_click", "latitude": 28.6, "longitude": 77.2},
                {"action": "fill", "turbidity": 5.2, "ph": "7.0"},
                {"action": "toggle", "parameter": "conductivity"},
                {"action": "submit"}
            ]
        }"#;
        let script: ScriptFile = serde_json::from_str(json).unwrap();
        assert_eq!(script.steps.len(), 4);
        match &script.steps[1] {
            ScriptStep::Fill { turbidity, ph, bod, .. } => {
                assert_eq!(turbidity.clone().map(FieldInput::into_text), Some("5.2".to_string()));
                assert_eq!(ph.clone().map(FieldInput::into_text), Some("7.0".to_string()));
                assert!(bod.is_none());
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(
            script.steps[2],
            ScriptStep::Toggle { parameter: Parameter::Conductivity }
        );
    }
}
