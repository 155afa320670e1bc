//! # Brush Lag
//!
//! The brush tip can trail the pointer on a virtual rope, which steadies
//! freehand lines. The Canvas only depends on the [`LagConstraint`] and
//! [`ChainCurve`] contracts; the rope and chain shipped here are the defaults.

use glam::Vec2;

use crate::math;

/// Result of moving the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LagUpdate {
    /// Where the brush tip now is.
    pub anchor: Vec2,
    /// True when the constraint is in effect and strokes follow the anchor.
    pub is_lagging: bool,
}

/// A two-point constraint between the pointer and the brush tip.
pub trait LagConstraint: std::fmt::Debug {
    /// Moves the pointer to `target` and returns the resulting brush anchor.
    /// The anchor never ends up farther than the chain length from `target`.
    fn update(&mut self, target: Vec2) -> LagUpdate;

    /// Distance between the last pointer position and `anchor`.
    fn distance_to(&self, anchor: Vec2) -> f32;

    /// Places both pointer and brush at `point`.
    fn reset(&mut self, point: Vec2);

    /// Current brush anchor.
    fn anchor(&self) -> Vec2;

    /// Maximum chain length. Zero means no lag.
    fn chain_length(&self) -> f32;

    fn set_chain_length(&mut self, length: f32);
}

/// The default rope: the brush stays put until the pointer pulls the rope
/// taut, then follows at exactly the rope length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LazyRope {
    radius: f32,
    pointer: Vec2,
    brush: Vec2,
}

impl LazyRope {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            ..Default::default()
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    fn is_enabled(&self) -> bool {
        self.radius > 0.0
    }
}

impl LagConstraint for LazyRope {
    fn update(&mut self, target: Vec2) -> LagUpdate {
        self.pointer = target;
        if !self.is_enabled() {
            self.brush = target;
            return LagUpdate {
                anchor: target,
                is_lagging: false,
            };
        }

        let distance = self.pointer.distance(self.brush);
        if distance > self.radius {
            let direction = (self.pointer - self.brush) / distance;
            self.brush += direction * (distance - self.radius);
        }
        LagUpdate {
            anchor: self.brush,
            is_lagging: true,
        }
    }

    fn distance_to(&self, anchor: Vec2) -> f32 {
        self.pointer.distance(anchor)
    }

    fn reset(&mut self, point: Vec2) {
        self.pointer = point;
        self.brush = point;
    }

    fn anchor(&self) -> Vec2 {
        self.brush
    }

    fn chain_length(&self) -> f32 {
        self.radius
    }

    fn set_chain_length(&mut self, length: f32) {
        self.radius = length.max(0.0);
    }
}

/// A constraint that never lags: the anchor always equals the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoLag {
    pointer: Vec2,
}

impl LagConstraint for NoLag {
    fn update(&mut self, target: Vec2) -> LagUpdate {
        self.pointer = target;
        LagUpdate {
            anchor: target,
            is_lagging: false,
        }
    }

    fn distance_to(&self, anchor: Vec2) -> f32 {
        self.pointer.distance(anchor)
    }

    fn reset(&mut self, point: Vec2) {
        self.pointer = point;
    }

    fn anchor(&self) -> Vec2 {
        self.pointer
    }

    fn chain_length(&self) -> f32 {
        0.0
    }

    fn set_chain_length(&mut self, _length: f32) {}
}

/// Computes the visual path of the chain between brush and pointer.
///
/// Purely cosmetic; nothing it returns reaches the history.
pub trait ChainCurve: std::fmt::Debug {
    fn path(&self, from: Vec2, to: Vec2, length: f32) -> Vec<Vec2>;
}

/// A slack chain drawn as a single sagging quadratic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaggingChain {
    /// Flattening tolerance in pixels.
    pub tolerance: f32,
}

impl Default for SaggingChain {
    fn default() -> Self {
        Self { tolerance: 2.0 }
    }
}

impl ChainCurve for SaggingChain {
    fn path(&self, from: Vec2, to: Vec2, length: f32) -> Vec<Vec2> {
        let span = from.distance(to);
        if span >= length {
            return vec![from, to];
        }
        // Slack hangs below the midpoint.
        let sag = (length * length - span * span).sqrt() / 2.0;
        let ctrl = math::midpoint(from, to) + Vec2::new(0.0, sag);
        let mut path = vec![from];
        path.extend(math::flatten_quadratic(from, ctrl, to, self.tolerance));
        path
    }
}
