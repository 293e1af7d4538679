use anyhow::{Context, Result};
use aquamap_core::{
    aggregation::ClusterStyle, interaction::InteractionConfig, sampling::SampleConfig,
};
use aquamap_schemas::geo::Coordinates;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

/// Everything `aquamap.yaml` can set. Each section falls back to its
/// defaults when missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub interaction: InteractionConfig,
    pub clustering: ClusterStyle,
    pub sampling: SampleConfig,
    pub upload: UploadConfig,
}

/// Initial viewport of the map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: Coordinates,
    pub zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinates::new(28.6139, 77.2090),
            zoom: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Backend route that hands out pre-signed upload URLs.
    pub endpoint: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/upload/presigned".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration file, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_elsewhere() {
        let yaml = r#"
interaction:
  marker_zoom: 12
sampling:
  count: 10
  seed: 9
upload:
  endpoint: https://example.org/presign
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.interaction.marker_zoom, 12.0);
        assert_eq!(config.interaction.marker_fly_ms, 1500);
        assert_eq!(config.sampling.count, 10);
        assert_eq!(config.sampling.seed, Some(9));
        assert_eq!(config.sampling.spread_deg, 0.4);
        assert_eq!(config.clustering.radius_px, 60);
        assert_eq!(config.map, MapConfig::default());
        assert_eq!(config.upload.endpoint, "https://example.org/presign");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("aquamap.yaml")).unwrap();
        assert_eq!(config.map.zoom, 5.0);
        assert_eq!(config.clustering.point_color, "#3b82f6");
        assert_eq!(config.upload, UploadConfig::default());
    }
}
