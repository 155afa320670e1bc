use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Evaluates a quadratic Bezier curve at `t`.
pub fn quadratic_point(start: Vec2, ctrl: Vec2, end: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    start * (u * u) + ctrl * (2.0 * u * t) + end * (t * t)
}

/// Approximates a quadratic Bezier curve with a polyline.
///
/// The returned points exclude `start` and include `end`. The step count
/// grows with the control polygon length, capped at 32.
pub fn flatten_quadratic(start: Vec2, ctrl: Vec2, end: Vec2, tolerance: f32) -> Vec<Vec2> {
    let hull = start.distance(ctrl) + ctrl.distance(end);
    let steps = ((hull / tolerance.max(0.01)).ceil() as usize).clamp(1, 32);
    (1..=steps)
        .map(|i| quadratic_point(start, ctrl, end, i as f32 / steps as f32))
        .collect()
}
