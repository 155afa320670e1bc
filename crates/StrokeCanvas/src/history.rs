use crate::model::{History, Stroke};

/// The ordered log of committed strokes.
///
/// Unlike a snapshot-based undo stack, undo here is a truncation of the log
/// followed by a full replay: the log is the only thing needed to rebuild the
/// committed surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryStore {
    strokes: Vec<Stroke>,
    width: f32,
    height: f32,
}

impl HistoryStore {
    /// Creates an empty store recording at the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            strokes: Vec::new(),
            width,
            height,
        }
    }

    /// Appends a committed stroke.
    ///
    /// Strokes with fewer than two points are rejected and `false` is returned.
    pub fn append(&mut self, stroke: Stroke) -> bool {
        if !stroke.is_committable() {
            tracing::debug!(points = stroke.points.len(), "Rejected stroke below commit threshold");
            return false;
        }
        self.strokes.push(stroke);
        true
    }

    /// Removes and returns the most recent stroke. No-op on an empty store.
    pub fn drop_last(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Removes every stroke. The recorded dimensions are kept.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// An owned copy suitable for persistence or replay.
    pub fn snapshot(&self) -> History {
        History::with_strokes(self.strokes.clone(), self.width, self.height)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
