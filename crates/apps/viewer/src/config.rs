//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object is a complete config.
//! `DDMAP_CONFIG` names a config file and `DDMAP_DATA` overrides the dataset
//! location.

use std::path::{Path, PathBuf};

use layers::{ClassifierConfig, ClusterOptions, FlagConfig, IconCatalog, SymbolStyle};
use scene::{SpiralLayout, ZoomPolicy};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "DDMAP_CONFIG";
pub const DATA_ENV: &str = "DDMAP_DATA";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid config JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[lon, lat]` in degrees.
    pub center: [f64; 2],
    pub initial_zoom: f64,
    pub zoom: ZoomPolicy,
    pub cluster: ClusterOptions,
    /// Camera target when an entry is picked from the list.
    pub fly_to_zoom: f64,
    pub fly_to_speed: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [163.7482, -12.7648],
            initial_zoom: 3.5,
            zoom: ZoomPolicy::default(),
            cluster: ClusterOptions::default(),
            fly_to_zoom: 10.0,
            fly_to_speed: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Path or http(s) url of the GeoJSON FeatureCollection.
    pub data: String,
    /// Directory that relative icon and flag urls resolve against.
    pub asset_root: String,
    pub map: MapConfig,
    pub classifier: ClassifierConfig,
    pub flags: FlagConfig,
    pub icons: IconCatalog,
    pub symbols: SymbolStyle,
    pub layout: SpiralLayout,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data: "data/events.geojson".to_string(),
            asset_root: "public".to_string(),
            map: MapConfig::default(),
            classifier: ClassifierConfig::default(),
            flags: FlagConfig::default(),
            icons: IconCatalog::default(),
            symbols: SymbolStyle::default(),
            layout: SpiralLayout::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Explicit path, else `DDMAP_CONFIG`, else defaults; then `DDMAP_DATA`
    /// overrides the dataset location.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut cfg = match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Ok(data) = std::env::var(DATA_ENV) {
            if !data.is_empty() {
                cfg.data = data;
            }
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let z = &self.map.zoom;
        if !z.is_ordered() {
            return Err(ConfigError::Invalid(format!(
                "zoom thresholds must satisfy intermediate < spiderify <= max (got {} / {} / {})",
                z.intermediate_zoom, z.spiderify_zoom, z.max_zoom
            )));
        }
        if z.zoom_step <= 0.0 {
            return Err(ConfigError::Invalid("zoom_step must be positive".to_string()));
        }
        if self.map.cluster.min_points < 2 {
            return Err(ConfigError::Invalid(
                "cluster.min_points must be at least 2".to_string(),
            ));
        }
        if self.layout.circle_spiral_switchover == 0 {
            return Err(ConfigError::Invalid(
                "layout.circle_spiral_switchover must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};

    #[test]
    fn empty_object_is_the_default() {
        let cfg = ViewerConfig::from_json_str("{}").expect("config");
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.map.zoom.max_spiderify_points, 45);
        assert_eq!(cfg.map.cluster.radius, 50);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{ "map": { "zoom": { "max_spiderify_points": 30 } }, "data": "x.geojson" }"#,
        )
        .expect("config");
        assert_eq!(cfg.map.zoom.max_spiderify_points, 30);
        assert_eq!(cfg.map.zoom.spiderify_zoom, 7.5);
        assert_eq!(cfg.data, "x.geojson");
    }

    #[test]
    fn misordered_thresholds_are_rejected() {
        let err = ViewerConfig::from_json_str(
            r#"{ "map": { "zoom": { "intermediate_zoom": 8.0, "spiderify_zoom": 7.5 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ViewerConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
