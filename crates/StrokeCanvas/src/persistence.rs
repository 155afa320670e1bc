use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CanvasError, Result};
use crate::model::{History, Stroke};

/// The externally loadable/saveable snapshot format.
///
/// `{"lines": [{"points": [{"x", "y", "type"?}], "brushRadius", "brushColor"}], "width", "height"}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedHistory {
    pub lines: Vec<Stroke>,
    pub width: f32,
    pub height: f32,
}

impl From<History> for SavedHistory {
    fn from(history: History) -> Self {
        Self {
            lines: history.strokes,
            width: history.width,
            height: history.height,
        }
    }
}

impl From<SavedHistory> for History {
    fn from(saved: SavedHistory) -> Self {
        History::with_strokes(saved.lines, saved.width, saved.height)
    }
}

impl SavedHistory {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialize)
    }

    /// Parses a save payload leniently.
    ///
    /// Only a payload that is not JSON at all is an error. A missing or
    /// non-array `lines` yields an empty history; line entries that fail to
    /// decode or hold fewer than two points are skipped. Missing dimensions
    /// fall back to `fallback_width` x `fallback_height`, which replays them
    /// without rescaling.
    pub fn from_json_lenient(json: &str, fallback_width: f32, fallback_height: f32) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(CanvasError::InvalidJson)?;

        let lines = match value.get("lines") {
            Some(Value::Array(raw_lines)) => decode_lines(raw_lines),
            other => {
                tracing::warn!(found = ?other.map(value_kind), "Save data has no lines array, treating as empty");
                Vec::new()
            }
        };

        Ok(Self {
            lines,
            width: dimension(&value, "width").unwrap_or(fallback_width),
            height: dimension(&value, "height").unwrap_or(fallback_height),
        })
    }
}

fn decode_lines(raw_lines: &[Value]) -> Vec<Stroke> {
    let mut lines = Vec::with_capacity(raw_lines.len());
    for (index, raw) in raw_lines.iter().enumerate() {
        match Stroke::deserialize(raw) {
            Ok(stroke) if stroke.is_committable() => lines.push(stroke),
            Ok(stroke) => {
                tracing::warn!(index, points = stroke.points.len(), "Skipping saved line with fewer than two points");
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed saved line");
            }
        }
    }
    lines
}

fn dimension(value: &Value, key: &str) -> Option<f32> {
    value.get(key).and_then(Value::as_f64).map(|v| v as f32)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
