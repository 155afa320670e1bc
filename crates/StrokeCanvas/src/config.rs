//! # Configuration
//!
//! This module defines the configuration struct for the Canvas.
//! Every field has a default, so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::model::Ink;

/// Configuration parameters for the Canvas.
///
/// These settings are the recognized options a host may set. Changing them at
/// runtime goes through [`crate::Canvas::set_config`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Base brush radius in surface pixels. Default: 10.0.
    pub brush_radius: f32,
    /// Base brush color. Default: "#444".
    pub brush_color: String,
    /// Maximum chain length between pointer and brush. 0 disables lag. Default: 12.0.
    pub lazy_radius: f32,
    /// When true, all new strokes erase instead of ink.
    pub erase: bool,
    /// Read-only mode. Pointer input is ignored entirely.
    pub disabled: bool,
    /// Hide the cursor, brush preview and chain.
    pub hide_interface: bool,
    /// Delay between replayed points in milliseconds. Default: 5.
    pub load_time_offset_ms: u64,
    /// Load save data without pacing.
    pub immediate_loading: bool,
    /// Logical surface width. Default: 400.0.
    pub canvas_width: f32,
    /// Logical surface height. Default: 400.0.
    pub canvas_height: f32,
    /// Visual styling.
    pub style: CanvasStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            brush_radius: 10.0,
            brush_color: "#444".to_string(),
            lazy_radius: 12.0,
            erase: false,
            disabled: false,
            hide_interface: false,
            load_time_offset_ms: 5,
            immediate_loading: false,
            canvas_width: 400.0,
            canvas_height: 400.0,
            style: CanvasStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Decodes a configuration document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CanvasError::InvalidConfig)
    }

    /// The ink new strokes are drawn with.
    pub fn ink(&self) -> Ink {
        if self.erase {
            Ink::Erase
        } else {
            Ink::color(self.brush_color.clone())
        }
    }
}

/// Visual styling configuration for the Canvas decorations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    /// Background color behind all layers.
    pub background_color: String,
    /// Whether the background grid is drawn.
    pub hide_grid: bool,
    /// Color of the grid lines.
    pub grid_color: String,
    /// Spacing of the grid lines in pixels.
    pub grid_size: f32,
    /// Color of the chain and of the pointer/brush dots.
    pub catenary_color: String,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background_color: "#FFF".to_string(),
            hide_grid: false,
            grid_color: "rgba(150,150,150,0.17)".to_string(),
            grid_size: 25.0,
            catenary_color: "#0a0302".to_string(),
        }
    }
}
