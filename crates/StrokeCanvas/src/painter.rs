use glam::Vec2;

use crate::config::{CanvasConfig, CanvasStyle};
use crate::math;
use crate::model::{Ink, Point};
use crate::render::{CompositeMode, DrawCommand, Layers, PathSegment, RenderList};

/// Radius of the dot drawn under the pointer.
const POINTER_DOT_RADIUS: f32 = 4.0;
/// Radius of the dot drawn at the brush centre.
const BRUSH_DOT_RADIUS: f32 = 2.0;
const CHAIN_WIDTH: f32 = 2.0;
const CHAIN_DASH: (f32, f32) = (2.0, 4.0);
const GRID_LINE_WIDTH: f32 = 0.5;

/// Style of the stroke being rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushStyle {
    pub radius: f32,
    pub ink: Ink,
}

impl BrushStyle {
    pub fn new(radius: f32, ink: Ink) -> Self {
        Self { radius, ink }
    }

    /// Ink width is the brush diameter.
    pub fn line_width(&self) -> f32 {
        self.radius * 2.0
    }

    pub fn composite(&self) -> CompositeMode {
        if self.ink.is_erase() {
            CompositeMode::DestinationOut
        } else {
            CompositeMode::SourceOver
        }
    }
}

/// What the preview layer shows this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceState {
    /// Where the raw pointer is.
    pub pointer: Vec2,
    /// Where the brush tip is.
    pub brush: Vec2,
    /// Path of the chain between brush and pointer, when lag is enabled.
    pub chain: Option<Vec<Vec2>>,
}

/// Converts stroke points and decorations into draw commands.
///
/// Every function here is stateless: the same inputs always produce the same
/// commands, which is what lets replay rebuild the committed layer exactly.
pub struct Painter;

impl Painter {
    /// Builds the smoothed path for `points`.
    ///
    /// Each consecutive pair contributes a quadratic segment controlled by the
    /// earlier point and ending at the pair's midpoint; the path closes with a
    /// line to the final point. Returns `None` for fewer than two points.
    pub fn draw_stroke(points: &[Point], style: &BrushStyle) -> Option<DrawCommand> {
        let (first, rest) = points.split_first()?;
        let last = rest.last()?;

        let mut segments = Vec::with_capacity(points.len());
        for pair in points.windows(2) {
            let ctrl = pair[0].to_vec2();
            let end = math::midpoint(ctrl, pair[1].to_vec2());
            segments.push(PathSegment::Quadratic { ctrl, end });
        }
        segments.push(PathSegment::Line {
            end: last.to_vec2(),
        });

        Some(DrawCommand::Path {
            start: first.to_vec2(),
            segments,
            color: style.ink.as_str().to_string(),
            width: style.line_width(),
            composite: style.composite(),
        })
    }

    /// Redraws the in-progress path onto the scratch layer.
    ///
    /// Fewer than two points is a no-op; otherwise the previous scratch
    /// contents are replaced.
    pub fn render_segment(layers: &mut Layers, points: &[Point], style: &BrushStyle) {
        if let Some(command) = Self::draw_stroke(points, style) {
            layers.redraw_scratch(Some(command));
        }
    }

    /// Renders the background grid covering a `width` x `height` surface.
    pub fn draw_grid(width: f32, height: f32, style: &CanvasStyle) -> RenderList {
        let mut draw_list = Vec::new();
        if style.hide_grid || style.grid_size <= 0.0 {
            return draw_list;
        }

        // Vertical Lines
        let mut x = style.grid_size;
        while x < width {
            draw_list.push(DrawCommand::Line {
                start: Vec2::new(x, 0.0),
                end: Vec2::new(x, height),
                color: style.grid_color.clone(),
                width: GRID_LINE_WIDTH,
            });
            x += style.grid_size;
        }

        // Horizontal Lines
        let mut y = style.grid_size;
        while y < height {
            draw_list.push(DrawCommand::Line {
                start: Vec2::new(0.0, y),
                end: Vec2::new(width, y),
                color: style.grid_color.clone(),
                width: GRID_LINE_WIDTH,
            });
            y += style.grid_size;
        }

        draw_list
    }

    /// Renders the cursor layer: brush preview, pointer dot, chain and brush dot.
    pub fn draw_interface(state: &InterfaceState, config: &CanvasConfig) -> RenderList {
        if config.hide_interface {
            return Vec::new();
        }
        let catenary = &config.style.catenary_color;

        let mut draw_list = vec![
            DrawCommand::Circle {
                center: state.brush,
                radius: config.brush_radius,
                color: config.brush_color.clone(),
            },
            DrawCommand::Circle {
                center: state.pointer,
                radius: POINTER_DOT_RADIUS,
                color: catenary.clone(),
            },
        ];

        if let Some(chain) = &state.chain {
            draw_list.push(DrawCommand::Polyline {
                points: chain.clone(),
                color: catenary.clone(),
                width: CHAIN_WIDTH,
                dash: Some(CHAIN_DASH),
            });
        }

        draw_list.push(DrawCommand::Circle {
            center: state.brush,
            radius: BRUSH_DOT_RADIUS,
            color: catenary.clone(),
        });
        draw_list
    }
}
