//! # Replay Engine
//!
//! Rebuilds the committed layer from a [`History`], either synchronously or
//! as a paced animation that re-draws each stroke point by point.
//!
//! Paced replay is driven by the host's frame tick. Every replay gets a new
//! [`Generation`]; tasks scheduled under an older generation are dropped
//! without running, so a `clear` or `undo` issued mid-animation can never be
//! painted over by a stale callback.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::accumulator::StrokeAccumulator;
use crate::history::HistoryStore;
use crate::model::{History, Stroke};
use crate::painter::{BrushStyle, Painter};
use crate::render::Layers;

/// How a history is played back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pace {
    /// Every stroke is drawn and committed before `replay` returns.
    #[default]
    Immediate,
    /// Each point is revealed `interval_ms` after the previous one.
    Paced { interval_ms: u64 },
}

/// Token identifying one replay invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A unit of paced replay work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplayAction {
    /// Redraw the scratch layer with the first `upto` points of a stroke.
    Redraw { stroke: usize, upto: usize },
    /// Flatten a fully revealed stroke into the committed layer and history.
    Commit { stroke: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due_ms: u64,
    pub generation: Generation,
    pub action: ReplayAction,
}

/// A timer queue ordered by due time, then by scheduling order.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<ScheduledTask>,
    generation: Generation,
    now_ms: u64,
}

impl Scheduler {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The clock value of the last tick.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Supersedes every pending task and returns the new generation.
    pub fn invalidate(&mut self) -> Generation {
        let dropped = self.queue.len();
        self.queue.clear();
        self.generation = self.generation.next();
        if dropped > 0 {
            tracing::debug!(dropped, generation = self.generation.0, "Invalidated pending replay tasks");
        }
        self.generation
    }

    /// Schedules `action` to run `offset_ms` after the current clock value.
    pub fn schedule(&mut self, offset_ms: u64, action: ReplayAction) {
        let task = ScheduledTask {
            due_ms: self.now_ms.saturating_add(offset_ms),
            generation: self.generation,
            action,
        };
        let idx = self.queue.partition_point(|t| t.due_ms <= task.due_ms);
        self.queue.insert(idx, task);
    }

    /// Advances the clock and removes every task due at or before `now_ms`.
    ///
    /// Tasks from superseded generations are discarded. A clock moving
    /// backwards is ignored.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScheduledTask> {
        self.now_ms = self.now_ms.max(now_ms);
        let split = self.queue.partition_point(|t| t.due_ms <= self.now_ms);
        let generation = self.generation;
        self.queue
            .drain(..split)
            .filter(|t| t.generation == generation)
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending tasks in the order they will run.
    pub fn tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.queue.iter()
    }
}

/// The components a replay writes into.
pub struct ReplayTarget<'a> {
    pub layers: &'a mut Layers,
    pub accumulator: &'a mut StrokeAccumulator,
    pub history: &'a mut HistoryStore,
}

/// Scales a history's strokes to a target surface size.
///
/// Identity when the target matches the recorded dimensions. Otherwise x and
/// y scale independently and brush radii scale by the mean of both ratios.
/// Non-positive recorded dimensions cannot be scaled from; the strokes are
/// returned unmodified.
pub fn rescale(history: &History, target_width: f32, target_height: f32) -> Vec<Stroke> {
    if history.width == target_width && history.height == target_height {
        return history.strokes.clone();
    }
    if !(history.width > 0.0 && history.height > 0.0) {
        tracing::warn!(
            width = history.width,
            height = history.height,
            "Recorded dimensions are not positive, replaying without rescale"
        );
        return history.strokes.clone();
    }

    let scale_x = target_width / history.width;
    let scale_y = target_height / history.height;
    history
        .strokes
        .iter()
        .map(|stroke| stroke.scaled(scale_x, scale_y))
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct ReplayEngine {
    scheduler: Scheduler,
    strokes: Vec<Stroke>,
}

impl ReplayEngine {
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// True while paced tasks are outstanding.
    pub fn is_replaying(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Cancels any in-flight paced replay.
    pub fn invalidate(&mut self) -> Generation {
        self.strokes.clear();
        self.scheduler.invalidate()
    }

    /// Replays `history` onto a `target_width` x `target_height` surface.
    ///
    /// Scratch and committed layers and the history store are cleared first,
    /// so the result depends only on `history`. Returns the number of strokes
    /// committed synchronously (always zero for paced replay).
    pub fn replay(
        &mut self,
        history: &History,
        target_width: f32,
        target_height: f32,
        pace: Pace,
        mut target: ReplayTarget<'_>,
    ) -> usize {
        let generation = self.invalidate();
        target.accumulator.discard();
        target.layers.clear_scratch();
        target.layers.clear_committed();
        target.history.clear();
        target.history.set_dimensions(target_width, target_height);

        self.strokes = rescale(history, target_width, target_height);
        tracing::debug!(
            strokes = self.strokes.len(),
            ?pace,
            generation = generation.0,
            "Starting replay"
        );

        match pace {
            Pace::Immediate => {
                let strokes = std::mem::take(&mut self.strokes);
                strokes
                    .iter()
                    .filter(|stroke| commit_stroke(stroke, &mut target))
                    .count()
            }
            Pace::Paced { interval_ms } => {
                self.schedule_paced(interval_ms);
                0
            }
        }
    }

    fn schedule_paced(&mut self, interval_ms: u64) {
        // Offsets accumulate across strokes so one stroke's reveal and commit
        // finish before the next stroke's first redraw.
        let mut offset = 0u64;
        for (index, stroke) in self.strokes.iter().enumerate() {
            for upto in 2..=stroke.points.len() {
                offset += interval_ms;
                self.scheduler
                    .schedule(offset, ReplayAction::Redraw { stroke: index, upto });
            }
            offset += interval_ms;
            self.scheduler
                .schedule(offset, ReplayAction::Commit { stroke: index });
        }
    }

    /// Runs every paced task due at `now_ms`. Returns the number of commits.
    pub fn advance(&mut self, now_ms: u64, mut target: ReplayTarget<'_>) -> usize {
        let mut commits = 0;
        for task in self.scheduler.take_due(now_ms) {
            if self.apply(task.action, &mut target) {
                commits += 1;
            }
        }
        if self.scheduler.is_idle() && !self.strokes.is_empty() {
            tracing::debug!(strokes = self.strokes.len(), "Paced replay finished");
            self.strokes.clear();
        }
        commits
    }

    fn apply(&self, action: ReplayAction, target: &mut ReplayTarget<'_>) -> bool {
        match action {
            ReplayAction::Redraw { stroke, upto } => {
                if let Some(stroke) = self.strokes.get(stroke) {
                    let upto = upto.min(stroke.points.len());
                    let style = BrushStyle::new(stroke.brush_radius, stroke.ink.clone());
                    Painter::render_segment(target.layers, &stroke.points[..upto], &style);
                }
                false
            }
            ReplayAction::Commit { stroke } => self
                .strokes
                .get(stroke)
                .is_some_and(|stroke| commit_stroke(stroke, target)),
        }
    }
}

/// Draws a recorded stroke in full and commits it like a live one.
fn commit_stroke(stroke: &Stroke, target: &mut ReplayTarget<'_>) -> bool {
    let style = BrushStyle::new(stroke.brush_radius, stroke.ink.clone());
    target.accumulator.load(stroke.points.clone());
    Painter::render_segment(target.layers, &stroke.points, &style);
    match target
        .accumulator
        .commit(target.layers, stroke.ink.clone(), stroke.brush_radius)
    {
        Some(committed) => target.history.append(committed),
        None => false,
    }
}
