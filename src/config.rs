use std::{fs, path::Path};

use serde::Deserialize;

use crate::{DesignerError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// undo/redo config
    pub history: HistoryConfig,
    /// viewport config
    pub viewport: ViewportConfig,
    /// canvas geometry config
    pub canvas: CanvasConfig,
    /// connection rules config
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// max number of undo snapshots, defaults to 100
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// visible canvas width in screen pixels
    pub width: f64,
    /// visible canvas height in screen pixels
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// multiplicative factor applied by zoom in / zoom out
    pub zoom_step: f64,
    /// screen padding kept around the graph by fit view
    pub fit_padding: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// pick radius of a connection handle, in flow units
    pub handle_radius: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// allow at most one outgoing edge per condition branch (`yes` / `no`)
    pub single_edge_per_branch: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            min_zoom: 0.25,
            max_zoom: 2.0,
            zoom_step: 1.2,
            fit_padding: 40.0,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 15.0,
            node_width: 180.0,
            node_height: 72.0,
            handle_radius: 8.0,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            single_edge_per_branch: true,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| DesignerError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let v = &self.viewport;
        if v.min_zoom <= 0.0 || v.min_zoom > v.max_zoom {
            return Err(DesignerError::Config(format!("invalid zoom range [{}, {}]", v.min_zoom, v.max_zoom)));
        }
        if v.zoom_step <= 1.0 {
            return Err(DesignerError::Config(format!("zoom_step must be greater than 1, got {}", v.zoom_step)));
        }
        if self.canvas.snap_to_grid && self.canvas.grid_size <= 0.0 {
            return Err(DesignerError::Config("grid_size must be positive when snap_to_grid is on".into()));
        }
        Ok(())
    }
}
