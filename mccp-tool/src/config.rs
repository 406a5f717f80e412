//! The `mccp` configuration file.

use anyhow::{Context, Result};
use augment::AugmenterInit;
use camera::{CapturePlan, CaptureBackend, DEFAULT_CAMERA_CONFIG};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warehouse::Warehouse;

/// Options shared by all subcommands. Command line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub warehouse: WarehouseConfig,
    pub augment: AugmenterInit,
    pub camera: CameraSection,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let config = json5::from_str(&text)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(config)
    }
}

/// Where datasets are built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Defaults to `./data_warehouse`.
    pub base_dir: Option<PathBuf>,
    pub object: Option<String>,
    pub anomalies: Vec<String>,
}

impl WarehouseConfig {
    pub fn warehouse(&self, base_dir: Option<&Path>) -> Result<Warehouse> {
        match base_dir.or(self.base_dir.as_deref()) {
            Some(dir) => Ok(Warehouse::new(dir)),
            None => Warehouse::in_current_dir(),
        }
    }
}

/// Device setup for capture sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    pub config_file: PathBuf,
    pub backend: CaptureBackend,
    pub plan: CapturePlan,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CAMERA_CONFIG),
            backend: CaptureBackend::platform_default(),
            plan: CapturePlan::default(),
        }
    }
}
