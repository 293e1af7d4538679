use aquamap_schemas::{category::WaterBody, marker::MarkerId};
use serde::{Deserialize, Serialize};

/// Something the workspace changed, recorded for the host to report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    MarkerAdded { category: WaterBody, id: MarkerId },
    MarkerUpdated { category: WaterBody, id: MarkerId },
    MarkerRemoved { category: WaterBody, id: MarkerId },
    SamplesAdded { category: WaterBody, count: usize },
    SamplesRemoved { category: WaterBody, count: usize },
    CategorySwitched { from: WaterBody, to: WaterBody },
    Imported { category: WaterBody, accepted: usize, rejected: usize },
}

/// Per-row result of a CSV import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub accepted: Vec<MarkerId>,
    /// Source row id and the reason it was rejected.
    pub rejected: Vec<(String, String)>,
}
