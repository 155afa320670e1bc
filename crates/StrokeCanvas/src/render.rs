//! # Rendering System
//!
//! The Canvas never touches pixels. Each surface is a [`Layer`]: a retained
//! display list of `DrawCommand`s that the host application (macroquad, a web
//! canvas, a software rasterizer) replays onto its own target.
//!
//! Layers are stacked bottom to top as grid, committed, scratch, preview.
//! Commands on the committed and scratch layers are painted in order onto the
//! same ink target, so a `DestinationOut` path removes ink painted before it.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a path combines with what is already on its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Normal additive painting.
    #[default]
    SourceOver,
    /// Clears the target wherever the path is painted.
    DestinationOut,
}

/// One segment of a smoothed path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Quadratic curve from the current point.
    Quadratic { ctrl: Vec2, end: Vec2 },
    /// Straight line from the current point.
    Line { end: Vec2 },
}

impl PathSegment {
    pub fn end(&self) -> Vec2 {
        match *self {
            Self::Quadratic { end, .. } | Self::Line { end } => end,
        }
    }
}

/// A single drawing primitive.
///
/// Coordinates are in **Surface Space** (logical pixels). Colors are passed
/// through as the host-understood strings they were configured with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A stroked path with round caps and joins.
    Path {
        start: Vec2,
        segments: Vec<PathSegment>,
        color: String,
        /// Line width in pixels.
        width: f32,
        composite: CompositeMode,
    },
    /// A straight line segment.
    Line {
        start: Vec2,
        end: Vec2,
        color: String,
        width: f32,
    },
    /// A filled disc.
    Circle {
        center: Vec2,
        radius: f32,
        color: String,
    },
    /// An open polyline, optionally dashed as `(dash, gap)`.
    Polyline {
        points: Vec<Vec2>,
        color: String,
        width: f32,
        dash: Option<(f32, f32)>,
    },
}

/// A list of draw commands.
pub type RenderList = Vec<DrawCommand>;

bitflags! {
    /// Layers modified since the host last presented them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirtyLayers: u8 {
        const GRID = 1 << 0;
        const COMMITTED = 1 << 1;
        const SCRATCH = 1 << 2;
        const PREVIEW = 1 << 3;
    }
}

/// A retained surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    commands: RenderList,
}

impl Layer {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// True when nothing is drawn on the layer.
    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }

    fn clear(&mut self) {
        self.commands.clear();
    }
}

/// The surfaces owned by one Canvas.
#[derive(Clone, Debug, Default)]
pub struct Layers {
    grid: Layer,
    committed: Layer,
    scratch: Layer,
    preview: Layer,
    dirty: DirtyLayers,
}

impl Layers {
    pub fn grid(&self) -> &Layer {
        &self.grid
    }

    pub fn committed(&self) -> &Layer {
        &self.committed
    }

    pub fn scratch(&self) -> &Layer {
        &self.scratch
    }

    pub fn preview(&self) -> &Layer {
        &self.preview
    }

    pub fn dirty(&self) -> DirtyLayers {
        self.dirty
    }

    /// Returns the dirty set and resets it. Hosts call this once per frame.
    pub fn take_dirty(&mut self) -> DirtyLayers {
        std::mem::take(&mut self.dirty)
    }

    /// Replaces the scratch contents with a single in-progress command.
    pub fn redraw_scratch(&mut self, command: Option<DrawCommand>) {
        self.scratch.clear();
        self.scratch.commands.extend(command);
        self.dirty |= DirtyLayers::SCRATCH;
    }

    pub fn clear_scratch(&mut self) {
        if !self.scratch.is_blank() {
            self.scratch.clear();
            self.dirty |= DirtyLayers::SCRATCH;
        }
    }

    /// Copies the scratch contents onto the committed layer, then clears scratch.
    pub fn flatten_scratch(&mut self) {
        self.committed.commands.append(&mut self.scratch.commands);
        self.dirty |= DirtyLayers::COMMITTED | DirtyLayers::SCRATCH;
    }

    pub fn clear_committed(&mut self) {
        self.committed.clear();
        self.dirty |= DirtyLayers::COMMITTED;
    }

    pub fn set_preview(&mut self, commands: RenderList) {
        self.preview.commands = commands;
        self.dirty |= DirtyLayers::PREVIEW;
    }

    pub fn set_grid(&mut self, commands: RenderList) {
        self.grid.commands = commands;
        self.dirty |= DirtyLayers::GRID;
    }

    /// The ink stack (committed then scratch) for hosts painting onto one target.
    pub fn ink(&self) -> impl Iterator<Item = &DrawCommand> {
        self.committed.commands.iter().chain(self.scratch.commands.iter())
    }
}
