//! # Input Protocol
//!
//! This module defines the pointer events the host application passes to the
//! Canvas, and the normalizer that turns raw device samples into
//! surface-local points.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::Rect;
use crate::model::Point;

/// Touch contacts smaller than this (in both axes) count as fine contacts.
pub const SMALL_CONTACT_THRESHOLD: f32 = 10.0;
/// Minimum brush radius for a fine touch contact.
pub const MIN_TOUCH_RADIUS: f32 = 1.0;
/// Scale applied to the mean contact size of a fine touch contact.
pub const SMALL_CONTACT_SCALE: f32 = 0.5;

/// The kind of device that produced a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// A raw sample as reported by the host's windowing layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Identifies the contact. Mice usually report a single id.
    pub pointer_id: u64,
    pub kind: PointerKind,
    /// Position in screen (client) space.
    pub position: Vec2,
    /// Pen pressure in `0.0..=1.0`, when the device reports it.
    pub pressure: Option<f32>,
    /// Touch contact width/height, when the device reports it.
    pub contact_size: Option<Vec2>,
}

impl PointerSample {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn pen(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            kind: PointerKind::Pen,
            position: Vec2::new(x, y),
            pressure: Some(pressure),
            ..Default::default()
        }
    }

    pub fn touch(pointer_id: u64, x: f32, y: f32, contact_size: Vec2) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            position: Vec2::new(x, y),
            contact_size: Some(contact_size),
            ..Default::default()
        }
    }
}

/// Where in an interaction a sample was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The pointer left the surface.
    Leave,
}

/// A single pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub sample: PointerSample,
}

impl PointerEvent {
    pub fn down(sample: PointerSample) -> Self {
        Self {
            phase: PointerPhase::Down,
            sample,
        }
    }

    pub fn moved(sample: PointerSample) -> Self {
        Self {
            phase: PointerPhase::Move,
            sample,
        }
    }

    pub fn up(sample: PointerSample) -> Self {
        Self {
            phase: PointerPhase::Up,
            sample,
        }
    }

    pub fn leave(sample: PointerSample) -> Self {
        Self {
            phase: PointerPhase::Leave,
            sample,
        }
    }
}

/// Converts a raw sample to surface-local coordinates.
///
/// `surface` is the on-screen bounding rectangle of the drawing surface.
pub fn normalize(sample: &PointerSample, surface: &Rect) -> Point {
    Point::from(sample.position - surface.min)
}

/// Derives the brush radius a sample asks for.
///
/// The hint only modulates the drawn width of the live stroke. Samples
/// missing their device-specific fields fall back to `base_radius`.
pub fn width_hint(sample: &PointerSample, base_radius: f32) -> f32 {
    match sample.kind {
        PointerKind::Touch => match sample.contact_size {
            Some(size)
                if size.x < SMALL_CONTACT_THRESHOLD && size.y < SMALL_CONTACT_THRESHOLD =>
            {
                MIN_TOUCH_RADIUS + (size.x + size.y) / 2.0 * SMALL_CONTACT_SCALE
            }
            // Mean of width and height is a diameter; halve it.
            Some(size) => (size.x + size.y) / 4.0,
            None => base_radius,
        },
        PointerKind::Pen => match sample.pressure {
            Some(pressure) => base_radius * pressure * 2.0,
            None => base_radius,
        },
        PointerKind::Mouse => base_radius,
    }
}
