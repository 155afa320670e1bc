//! # Core Data Models
//!
//! This module defines the stroke log: points, committed strokes and the
//! history they form. These types are the single source of truth for what has
//! been drawn; surfaces are always rebuilt from them.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The sentinel string marking erasing points and strokes in saved data.
pub const ERASE_SENTINEL: &str = "erase";

/// Tag carried by a recorded point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// The point belongs to an erasing stroke.
    Erase,
}

/// A single recorded sample in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Optional tag. Only `Erase` is meaningful.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PointKind>,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, kind: None }
    }

    /// Creates a point tagged as part of an erasing stroke.
    pub fn erase(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            kind: Some(PointKind::Erase),
        }
    }

    pub fn is_erase(&self) -> bool {
        self.kind == Some(PointKind::Erase)
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns a copy with the given tag, keeping the coordinates.
    pub fn with_kind(self, kind: Option<PointKind>) -> Self {
        Self { kind, ..self }
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// What a stroke deposits on the committed surface.
///
/// Serialized as a plain color string, with `"erase"` standing for `Erase`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ink {
    /// Normal additive ink in any host-understood color notation.
    Color(String),
    /// Destructive composition: removes committed ink under the stroke.
    Erase,
}

impl Ink {
    pub fn color(color: impl Into<String>) -> Self {
        let color = color.into();
        if color == ERASE_SENTINEL {
            Self::Erase
        } else {
            Self::Color(color)
        }
    }

    pub fn is_erase(&self) -> bool {
        matches!(self, Self::Erase)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Color(c) => c,
            Self::Erase => ERASE_SENTINEL,
        }
    }
}

impl Default for Ink {
    fn default() -> Self {
        Self::Color("#444".to_string())
    }
}

impl Serialize for Ink {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Ink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::color(raw))
    }
}

/// A committed line.
///
/// Invariant: a stroke stored in a [`History`] has at least two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    /// Brush radius. The drawn line width is twice this value.
    #[serde(rename = "brushRadius")]
    pub brush_radius: f32,
    #[serde(rename = "brushColor")]
    pub ink: Ink,
}

impl Stroke {
    pub fn new(points: Vec<Point>, brush_radius: f32, ink: Ink) -> Self {
        Self {
            points,
            brush_radius,
            ink,
        }
    }

    /// Returns true if the stroke may be stored in a history.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Width of the drawn line (the brush diameter).
    pub fn line_width(&self) -> f32 {
        self.brush_radius * 2.0
    }

    /// Returns a copy scaled per axis, with the radius scaled by the mean ratio.
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        let scale_avg = (scale_x + scale_y) / 2.0;
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point {
                    x: p.x * scale_x,
                    y: p.y * scale_y,
                    kind: p.kind,
                })
                .collect(),
            brush_radius: self.brush_radius * scale_avg,
            ink: self.ink.clone(),
        }
    }
}

/// An ordered stroke log together with the dimensions it was captured under.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    pub strokes: Vec<Stroke>,
    pub width: f32,
    pub height: f32,
}

impl History {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            strokes: Vec::new(),
            width,
            height,
        }
    }

    pub fn with_strokes(strokes: Vec<Stroke>, width: f32, height: f32) -> Self {
        Self {
            strokes,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Returns a copy of this history with the last stroke removed.
    pub fn without_last(&self) -> Self {
        let mut strokes = self.strokes.clone();
        strokes.pop();
        Self {
            strokes,
            width: self.width,
            height: self.height,
        }
    }
}
