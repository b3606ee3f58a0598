use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::views::ViewLimits;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "restaurant-insights.json";

/// Dashboard settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at startup.
    pub data_path: PathBuf,
    pub preview_rows: usize,
    pub top_cuisines: usize,
    /// How many cities are pre-selected after a load.
    pub default_city_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from("data/restaurant_sample.csv"),
            preview_rows: 20,
            top_cuisines: 10,
            default_city_count: 2,
        }
    }
}

impl DashboardConfig {
    /// Read the config at `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Like [`load`](Self::load), but falls back to defaults on error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::error!("Ignoring config: {e:#}");
            Self::default()
        })
    }

    pub fn limits(&self) -> ViewLimits {
        ViewLimits {
            preview_rows: self.preview_rows,
            top_cuisines: self.top_cuisines,
        }
    }
}
