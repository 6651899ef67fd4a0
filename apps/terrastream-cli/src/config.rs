use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use terrastream_physics::ExtractionStrategy;
use terrastream_stream::{PartitionConfig, StreamConfig};

/// Settings for the `simulate` frame loop, read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub partition: PartitionConfig,
    pub stream: StreamConfig,
    pub extraction: ExtractionStrategy,
    pub gravity: Vec3,
    /// Fixed time step in seconds.
    pub dt: f32,
    pub ticks: u64,
    /// Observer spawn point; defaults to above the level center.
    pub observer_start: Option<Vec3>,
    pub observer_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            partition: PartitionConfig::default(),
            stream: StreamConfig::default(),
            extraction: ExtractionStrategy::default(),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            dt: 1.0 / 60.0,
            ticks: 600,
            observer_start: None,
            observer_radius: 0.4,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading simulation config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing simulation config {}", path.display()))?;
        anyhow::ensure!(
            config.dt.is_finite() && config.dt > 0.0,
            "time step must be positive, got {}",
            config.dt
        );
        config.partition.validate()?;
        config.stream.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: SimulationConfig = serde_yaml::from_str(
            "extraction: bounding_box\nstream:\n  load_radius: 12.0\nobserver_start: [1.0, 5.0, 2.0]\n",
        )
        .unwrap();
        assert_eq!(config.extraction, ExtractionStrategy::BoundingBox);
        assert_eq!(config.stream.load_radius, 12.0);
        assert_eq!(config.stream.unload_radius, 32.0);
        assert_eq!(config.observer_start, Some(Vec3::new(1.0, 5.0, 2.0)));
        assert_eq!(config.partition, PartitionConfig::default());
        assert_eq!(config.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../levels/simulate.yaml");
        let config = SimulationConfig::load(&path).unwrap();
        assert!(config.stream.unload_radius > config.stream.load_radius);
    }
}
