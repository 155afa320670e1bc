use anyhow::Context;
use macroquad::prelude as mq;
use stroke_canvas::input::{PointerEvent, PointerSample};
use stroke_canvas::math::{self, Rect};
use stroke_canvas::render::{DrawCommand, PathSegment};
use stroke_canvas::{Canvas, CanvasConfig, CanvasEvent};

const SAVE_PATH: &str = "drawing.json";
const MARGIN: f32 = 20.0;
/// Flattening tolerance for rendering quadratic segments.
const CURVE_TOLERANCE: f32 = 1.0;

#[macroquad::main("StrokeCanvas Playground")]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = CanvasConfig {
        canvas_width: (mq::screen_width() - MARGIN * 2.0).max(1.0),
        canvas_height: (mq::screen_height() - MARGIN * 2.0).max(1.0),
        ..Default::default()
    };
    let mut canvas = Canvas::new(config);
    let mut mouse_down = false;

    loop {
        // 1. Keep the surface in sync with the window (never empty, even minimised)
        let width = (mq::screen_width() - MARGIN * 2.0).max(1.0);
        let height = (mq::screen_height() - MARGIN * 2.0).max(1.0);
        canvas.set_surface_rect(Rect::new(
            glam::Vec2::splat(MARGIN),
            glam::Vec2::new(width, height),
        ));
        canvas.resize(width, height);

        // 2. Input Handling
        let (mx, my) = mq::mouse_position();
        let sample = PointerSample::mouse(mx, my);
        let inside = Rect::new(glam::Vec2::splat(MARGIN), glam::Vec2::new(width, height))
            .contains(glam::Vec2::new(mx, my));

        if mq::is_mouse_button_pressed(mq::MouseButton::Left) && inside {
            mouse_down = true;
            canvas.handle_pointer(PointerEvent::down(sample));
        } else if mq::is_mouse_button_released(mq::MouseButton::Left) && mouse_down {
            mouse_down = false;
            canvas.handle_pointer(PointerEvent::up(sample));
        } else if mouse_down && !inside {
            mouse_down = false;
            canvas.handle_pointer(PointerEvent::leave(sample));
        } else {
            canvas.handle_pointer(PointerEvent::moved(sample));
        }

        if mq::is_key_pressed(mq::KeyCode::U) {
            canvas.undo();
        }
        if mq::is_key_pressed(mq::KeyCode::C) {
            canvas.clear();
        }
        if mq::is_key_pressed(mq::KeyCode::E) {
            let mut config = canvas.config().clone();
            config.erase = !config.erase;
            tracing::info!(erase = config.erase, "Toggled erase mode");
            canvas.set_config(config);
        }
        if mq::is_key_pressed(mq::KeyCode::S) {
            if let Err(e) = save(&canvas) {
                tracing::error!("Save failed: {:#}", e);
            }
        }
        if mq::is_key_pressed(mq::KeyCode::L) {
            if let Err(e) = load(&mut canvas) {
                tracing::error!("Load failed: {:#}", e);
            }
        }

        // 3. Update Logic
        let now_ms = (mq::get_time() * 1000.0) as u64;
        for event in canvas.tick(now_ms) {
            if event == CanvasEvent::Changed {
                tracing::debug!(strokes = canvas.history().len(), "Drawing changed");
            }
        }

        // 4. Render
        let background = parse_color(&canvas.config().style.background_color);
        mq::clear_background(mq::DARKGRAY);
        mq::draw_rectangle(MARGIN, MARGIN, width, height, background);

        let layers = canvas.layers();
        for cmd in layers.grid().commands() {
            draw_command(cmd, background);
        }
        for cmd in layers.ink() {
            draw_command(cmd, background);
        }
        if !canvas.is_replaying() {
            for cmd in layers.preview().commands() {
                draw_command(cmd, background);
            }
        }
        canvas.layers_mut().take_dirty();

        mq::draw_text(
            "U: undo  C: clear  E: toggle erase  S: save  L: load",
            MARGIN,
            MARGIN - 4.0,
            18.0,
            mq::WHITE,
        );

        mq::next_frame().await
    }
}

fn save(canvas: &Canvas) -> anyhow::Result<()> {
    let json = canvas.save_data()?;
    std::fs::write(SAVE_PATH, json).with_context(|| format!("writing {SAVE_PATH}"))?;
    tracing::info!(path = SAVE_PATH, strokes = canvas.history().len(), "Saved drawing");
    Ok(())
}

fn load(canvas: &mut Canvas) -> anyhow::Result<()> {
    let json =
        std::fs::read_to_string(SAVE_PATH).with_context(|| format!("reading {SAVE_PATH}"))?;
    let immediate = canvas.config().immediate_loading;
    canvas.load_save_data(&json, immediate)?;
    Ok(())
}

fn to_screen(p: glam::Vec2) -> glam::Vec2 {
    p + glam::Vec2::splat(MARGIN)
}

/// Rasterizes one command. Erasing ink is painted with the background color.
fn draw_command(cmd: &DrawCommand, background: mq::Color) {
    match cmd {
        DrawCommand::Path {
            start,
            segments,
            color,
            width,
            composite,
        } => {
            let color = match composite {
                stroke_canvas::render::CompositeMode::DestinationOut => background,
                stroke_canvas::render::CompositeMode::SourceOver => parse_color(color),
            };
            let mut points = vec![*start];
            let mut cursor = *start;
            for segment in segments {
                match segment {
                    PathSegment::Quadratic { ctrl, end } => {
                        points.extend(math::flatten_quadratic(cursor, *ctrl, *end, CURVE_TOLERANCE));
                    }
                    PathSegment::Line { end } => points.push(*end),
                }
                cursor = segment.end();
            }
            for pair in points.windows(2) {
                let (a, b) = (to_screen(pair[0]), to_screen(pair[1]));
                mq::draw_line(a.x, a.y, b.x, b.y, *width, color);
            }
            // Round joins and caps
            for p in &points {
                let p = to_screen(*p);
                mq::draw_circle(p.x, p.y, width / 2.0, color);
            }
        }
        DrawCommand::Line {
            start,
            end,
            color,
            width,
        } => {
            let (a, b) = (to_screen(*start), to_screen(*end));
            mq::draw_line(a.x, a.y, b.x, b.y, *width, parse_color(color));
        }
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => {
            let c = to_screen(*center);
            mq::draw_circle(c.x, c.y, *radius, parse_color(color));
        }
        DrawCommand::Polyline {
            points,
            color,
            width,
            ..
        } => {
            let color = parse_color(color);
            for pair in points.windows(2) {
                let (a, b) = (to_screen(pair[0]), to_screen(pair[1]));
                mq::draw_line(a.x, a.y, b.x, b.y, *width, color);
            }
        }
    }
}

/// Parses `#rgb`, `#rrggbb` and `rgba(r,g,b,a)` notations. Unknown input is black.
fn parse_color(color: &str) -> mq::Color {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .filter_map(|c| c.to_digit(16).map(|d| d as u8))
            .collect();
        return match digits.as_slice() {
            [r, g, b] => mq::Color::from_rgba(r * 17, g * 17, b * 17, 255),
            [r1, r0, g1, g0, b1, b0] => {
                mq::Color::from_rgba(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255)
            }
            _ => mq::BLACK,
        };
    }
    if let Some(args) = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<f32> = args
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .collect();
        return match parts.as_slice() {
            [r, g, b] => mq::Color::new(r / 255.0, g / 255.0, b / 255.0, 1.0),
            [r, g, b, a] => mq::Color::new(r / 255.0, g / 255.0, b / 255.0, *a),
            _ => mq::BLACK,
        };
    }
    mq::BLACK
}
