//! # StrokeCanvas
//!
//! `stroke_canvas` is a headless freehand drawing engine. It turns pointer
//! samples into smoothed strokes, keeps them in a replayable log with undo and
//! clear, and rebuilds the drawing from that log on demand, instantly or as a
//! paced "live drawing" animation, at any surface size.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: Points, strokes and the history they form.
//! - **Accumulator (`src/accumulator.rs`)**: The stroke currently being drawn.
//! - **History (`src/history.rs`)**: The committed stroke log.
//! - **Replay (`src/replay.rs`)**: Rebuilds layers from a history, with rescaling and pacing.
//! - **Render (`src/render.rs`)**: Layers of `DrawCommand`s for the host to rasterize.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod lag;
pub mod math;
pub mod model;
pub mod painter;
pub mod persistence;
pub mod render;
pub mod replay;

use glam::Vec2;

use accumulator::StrokeAccumulator;
use history::HistoryStore;
use input::{PointerEvent, PointerKind, PointerPhase, PointerSample};
use lag::{ChainCurve, LagConstraint, LazyRope, SaggingChain};
use math::Rect;
use model::{History, Ink};
use painter::{BrushStyle, InterfaceState, Painter};
use persistence::SavedHistory;
use render::Layers;
use replay::{ReplayEngine, ReplayTarget};

// Re-exports for convenience
pub use config::{CanvasConfig, CanvasStyle};
pub use error::CanvasError;
pub use model::{Point, Stroke};
pub use replay::Pace;

/// Notifications emitted by the Canvas to the host application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanvasEvent {
    /// The history changed (commit, clear or undo). Re-read it via
    /// [`Canvas::history`] or [`Canvas::save_data`].
    Changed,
    /// At least one layer changed and should be presented again.
    RepaintNeeded,
}

/// One drawing session.
///
/// The Canvas owns the layers, the live stroke, the history and the replay
/// engine. The host forwards pointer events to [`Canvas::handle_pointer`],
/// calls [`Canvas::tick`] once per displayed frame, and paints the layers.
pub struct Canvas {
    config: CanvasConfig,
    surface_rect: Rect,
    layers: Layers,
    accumulator: StrokeAccumulator,
    history: HistoryStore,
    replay: ReplayEngine,
    lag: Box<dyn LagConstraint>,
    chain: Box<dyn ChainCurve>,
    /// Pointer id of the interaction in progress.
    active_pointer: Option<u64>,
    /// Brush radius of the live stroke.
    live_radius: f32,
    pointer: Vec2,
    brush: Vec2,
    interface_dirty: bool,
    events: Vec<CanvasEvent>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("strokes", &self.history.len())
            .field("active_pointer", &self.active_pointer)
            .field("replaying", &self.replay.is_replaying())
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Creates a Canvas with the default rope lag and chain visual.
    pub fn new(config: CanvasConfig) -> Self {
        let center = Vec2::new(config.canvas_width, config.canvas_height) * 0.5;
        let mut lag = LazyRope::new(config.lazy_radius);
        lag.reset(center);

        let mut canvas = Self {
            surface_rect: Rect::new(
                Vec2::ZERO,
                Vec2::new(config.canvas_width, config.canvas_height),
            ),
            layers: Layers::default(),
            accumulator: StrokeAccumulator::default(),
            history: HistoryStore::new(config.canvas_width, config.canvas_height),
            replay: ReplayEngine::default(),
            lag: Box::new(lag),
            chain: Box::new(SaggingChain::default()),
            active_pointer: None,
            live_radius: config.brush_radius,
            pointer: center,
            brush: center,
            interface_dirty: true,
            events: Vec::new(),
            config,
        };
        canvas.redraw_grid();
        canvas
    }

    /// Replaces the lag constraint between pointer and brush.
    pub fn with_lag(mut self, mut lag: Box<dyn LagConstraint>) -> Self {
        lag.set_chain_length(self.config.lazy_radius);
        lag.reset(self.brush);
        self.lag = lag;
        self
    }

    /// Replaces the chain visual.
    pub fn with_chain(mut self, chain: Box<dyn ChainCurve>) -> Self {
        self.chain = chain;
        self.interface_dirty = true;
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Applies a new configuration.
    ///
    /// A change of canvas dimensions rescales the current drawing to the new
    /// size, exactly like [`Canvas::resize`].
    pub fn set_config(&mut self, config: CanvasConfig) {
        let resized = config.canvas_width != self.config.canvas_width
            || config.canvas_height != self.config.canvas_height;
        let (width, height) = (config.canvas_width, config.canvas_height);

        self.lag.set_chain_length(config.lazy_radius);
        // Keep the old dimensions until `resize` has snapshotted against them.
        self.config = CanvasConfig {
            canvas_width: self.config.canvas_width,
            canvas_height: self.config.canvas_height,
            ..config
        };
        if resized {
            self.resize(width, height);
        } else {
            self.redraw_grid();
        }
        self.interface_dirty = true;
    }

    /// Sets the on-screen rectangle of the drawing surface, used to convert
    /// screen coordinates into surface coordinates.
    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = rect;
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Layers {
        &mut self.layers
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// The brush tip position in surface coordinates.
    pub fn brush(&self) -> Vec2 {
        self.brush
    }

    /// The raw pointer position in surface coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_drawing(&self) -> bool {
        self.active_pointer.is_some()
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_replaying()
    }

    /// Takes every notification emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    /// Processes one pointer event.
    ///
    /// Only one interaction is tracked at a time: a `Down` while another
    /// pointer is drawing is ignored, as are moves and releases from any
    /// pointer other than the active one. In read-only mode every event is
    /// ignored.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.config.disabled {
            return;
        }
        match event.phase {
            PointerPhase::Down => self.pointer_down(&event.sample),
            PointerPhase::Move => self.pointer_move(&event.sample),
            PointerPhase::Up => self.pointer_up(&event.sample),
            PointerPhase::Leave => self.pointer_leave(&event.sample),
        }
    }

    fn pointer_down(&mut self, sample: &PointerSample) {
        if let Some(active) = self.active_pointer {
            tracing::debug!(active, ignored = sample.pointer_id, "Interaction already active, ignoring pointer down");
            return;
        }
        if self.replay.is_replaying() {
            tracing::debug!("Replay in progress, ignoring pointer down");
            return;
        }

        let point = input::normalize(sample, &self.surface_rect).to_vec2();
        if sample.kind == PointerKind::Touch {
            // A touch has no hover phase, so the brush jumps to the contact.
            self.lag.reset(point);
        }
        self.active_pointer = Some(sample.pointer_id);
        self.live_radius = input::width_hint(sample, self.config.brush_radius);
        self.accumulator.begin(self.config.erase);
        self.pointer_move(sample);
    }

    fn pointer_move(&mut self, sample: &PointerSample) {
        if self.active_pointer.is_some_and(|active| active != sample.pointer_id) {
            return;
        }
        self.track(sample);

        if self.active_pointer.is_some() {
            self.live_radius = input::width_hint(sample, self.config.brush_radius);
            self.extend_stroke();
        }
    }

    fn pointer_up(&mut self, sample: &PointerSample) {
        if self.active_pointer != Some(sample.pointer_id) {
            return;
        }
        // The release sample does not change the live radius.
        self.track(sample);
        self.extend_stroke();
        self.active_pointer = None;

        let ink = self.live_ink();
        if let Some(stroke) = self.accumulator.commit(&mut self.layers, ink, self.live_radius) {
            tracing::debug!(points = stroke.points.len(), erase = stroke.ink.is_erase(), "Committed stroke");
            self.history.append(stroke);
            self.events.push(CanvasEvent::Changed);
        }
    }

    fn pointer_leave(&mut self, sample: &PointerSample) {
        if self.active_pointer == Some(sample.pointer_id) {
            tracing::debug!(points = self.accumulator.points().len(), "Pointer left surface, discarding stroke");
            self.accumulator.discard();
            self.layers.clear_scratch();
            self.active_pointer = None;
        }
    }

    /// Moves the pointer and brush to a sample's position.
    fn track(&mut self, sample: &PointerSample) {
        let point = input::normalize(sample, &self.surface_rect).to_vec2();
        let update = self.lag.update(point);
        self.pointer = point;
        self.brush = if update.is_lagging { update.anchor } else { point };
        self.interface_dirty = true;
    }

    /// Appends the brush position to the live stroke and redraws scratch.
    ///
    /// A brush that has not moved since the last point adds nothing, so a
    /// tap never reaches the commit threshold.
    fn extend_stroke(&mut self) {
        let point = Point::from(self.brush);
        if self
            .accumulator
            .points()
            .last()
            .is_some_and(|last| last.to_vec2() == point.to_vec2())
        {
            return;
        }
        self.accumulator.extend(point);
        let style = BrushStyle::new(self.live_radius, self.live_ink());
        Painter::render_segment(&mut self.layers, self.accumulator.points(), &style);
    }

    fn live_ink(&self) -> Ink {
        if self.accumulator.is_erasing() {
            Ink::Erase
        } else {
            self.config.ink()
        }
    }

    /// The frame-paced update.
    ///
    /// Runs paced replay work due at `now_ms` (a monotonic clock in
    /// milliseconds), refreshes the cursor layer if the pointer moved, and
    /// returns the notifications emitted since the last call.
    pub fn tick(&mut self, now_ms: u64) -> Vec<CanvasEvent> {
        let commits = self.replay.advance(
            now_ms,
            ReplayTarget {
                layers: &mut self.layers,
                accumulator: &mut self.accumulator,
                history: &mut self.history,
            },
        );
        self.events
            .extend(std::iter::repeat_n(CanvasEvent::Changed, commits));

        if self.interface_dirty {
            self.redraw_interface();
        }
        if !self.layers.dirty().is_empty() {
            self.events.push(CanvasEvent::RepaintNeeded);
        }
        self.drain_events()
    }

    fn redraw_interface(&mut self) {
        let chain_length = self.lag.chain_length();
        let chain = (chain_length > 0.0).then(|| self.chain.path(self.brush, self.pointer, chain_length));
        let state = InterfaceState {
            pointer: self.pointer,
            brush: self.brush,
            chain,
        };
        self.layers
            .set_preview(Painter::draw_interface(&state, &self.config));
        self.interface_dirty = false;
    }

    fn redraw_grid(&mut self) {
        self.layers.set_grid(Painter::draw_grid(
            self.config.canvas_width,
            self.config.canvas_height,
            &self.config.style,
        ));
    }

    /// Removes the last stroke by replaying the rest of the history.
    ///
    /// Returns `false` (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.history.is_empty() && !self.replay.is_replaying() {
            return false;
        }
        let remaining = self.history.snapshot().without_last();
        tracing::info!(remaining = remaining.strokes.len(), "Undo");
        self.replay_history(&remaining, Pace::Immediate);
        self.events.push(CanvasEvent::Changed);
        true
    }

    /// Empties the history and both stroke layers, cancelling any replay.
    pub fn clear(&mut self) {
        self.replay.invalidate();
        self.accumulator.discard();
        self.active_pointer = None;
        self.layers.clear_scratch();
        self.layers.clear_committed();
        self.history.clear();
        tracing::info!("Canvas cleared");
        self.events.push(CanvasEvent::Changed);
    }

    /// Replays a history onto this canvas at its current size.
    pub fn load_history(&mut self, history: &History, pace: Pace) {
        tracing::info!(strokes = history.strokes.len(), ?pace, "Loading history");
        self.replay_history(history, pace);
    }

    /// Loads a JSON save payload.
    ///
    /// With `immediate` false the strokes are revealed at the configured
    /// `load_time_offset_ms` per point.
    pub fn load_save_data(&mut self, json: &str, immediate: bool) -> error::Result<()> {
        let saved = SavedHistory::from_json_lenient(
            json,
            self.config.canvas_width,
            self.config.canvas_height,
        )?;
        let pace = if immediate {
            Pace::Immediate
        } else {
            Pace::Paced {
                interval_ms: self.config.load_time_offset_ms,
            }
        };
        self.load_history(&History::from(saved), pace);
        Ok(())
    }

    /// Serializes the committed history.
    pub fn save_data(&self) -> error::Result<String> {
        SavedHistory::from(self.history.snapshot()).to_json()
    }

    /// Changes the logical surface size, rescaling the drawing to fit.
    ///
    /// Non-positive or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width == self.config.canvas_width && height == self.config.canvas_height {
            return;
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            tracing::warn!(width, height, "Ignoring resize to a degenerate surface");
            return;
        }
        let current = self.history.snapshot();
        tracing::info!(
            from_width = current.width,
            from_height = current.height,
            width,
            height,
            "Resizing canvas"
        );
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        self.redraw_grid();
        self.replay_history(&current, Pace::Immediate);
    }

    fn replay_history(&mut self, history: &History, pace: Pace) {
        self.active_pointer = None;
        let commits = self.replay.replay(
            history,
            self.config.canvas_width,
            self.config.canvas_height,
            pace,
            ReplayTarget {
                layers: &mut self.layers,
                accumulator: &mut self.accumulator,
                history: &mut self.history,
            },
        );
        self.events
            .extend(std::iter::repeat_n(CanvasEvent::Changed, commits));
    }
}
