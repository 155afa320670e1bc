//! # Stroke Accumulator
//!
//! Owns the point buffer of the stroke currently being drawn. Points only
//! reach the history through [`StrokeAccumulator::commit`].

use crate::model::{Ink, Point, PointKind, Stroke};
use crate::render::Layers;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeAccumulator {
    points: Vec<Point>,
    active: bool,
    erasing: bool,
}

impl StrokeAccumulator {
    /// Starts a new interaction, dropping anything left in the buffer.
    pub fn begin(&mut self, erasing: bool) {
        self.points.clear();
        self.active = true;
        self.erasing = erasing;
    }

    /// Appends a point. The first point of an erasing interaction is tagged.
    pub fn extend(&mut self, point: Point) {
        let kind = if self.points.is_empty() && self.erasing {
            Some(PointKind::Erase)
        } else {
            point.kind
        };
        self.points.push(point.with_kind(kind));
    }

    /// Finishes the interaction.
    ///
    /// Below two points nothing is produced and no layer is touched. Otherwise
    /// the scratch layer is flattened onto the committed layer and the built
    /// stroke is returned. An erase tag on the first point overrides `ink`.
    pub fn commit(&mut self, layers: &mut Layers, ink: Ink, brush_radius: f32) -> Option<Stroke> {
        self.active = false;
        if self.points.len() < 2 {
            self.points.clear();
            return None;
        }

        let points = std::mem::take(&mut self.points);
        let ink = if points[0].is_erase() { Ink::Erase } else { ink };
        layers.flatten_scratch();
        Some(Stroke::new(points, brush_radius, ink))
    }

    /// Abandons the interaction without touching any layer.
    pub fn discard(&mut self) {
        self.points.clear();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Replaces the buffer wholesale. Used by replay to stage a recorded stroke.
    pub(crate) fn load(&mut self, points: Vec<Point>) {
        self.erasing = points.first().is_some_and(Point::is_erase);
        self.points = points;
    }
}
