use stroke_canvas::input::{PointerEvent, PointerSample};
use stroke_canvas::{Canvas, CanvasConfig, CanvasEvent, Pace};

fn main() -> Result<(), stroke_canvas::CanvasError> {
    tracing_subscriber::fmt::init();
    println!("=== StrokeCanvas Headless Demo ===");

    // 1. Initialize Canvas
    let config = CanvasConfig {
        brush_color: "#1e90ff".to_string(),
        lazy_radius: 0.0,
        ..Default::default()
    };
    let mut canvas = Canvas::new(config);

    // 2. Simulate a few frames of freehand input
    let mut now_ms = 0;
    for frame in 0..8 {
        let t = frame as f32 / 7.0;
        let sample = PointerSample::mouse(50.0 + 300.0 * t, 200.0 + 80.0 * (t * 6.0).sin());
        let event = match frame {
            0 => PointerEvent::down(sample),
            7 => PointerEvent::up(sample),
            _ => PointerEvent::moved(sample),
        };
        canvas.handle_pointer(event);

        now_ms += 16;
        let events = canvas.tick(now_ms);
        println!("--- Frame {} --- events: {:?}", frame, events);
    }
    println!("Committed strokes: {}", canvas.history().len());

    // 3. Save, then replay the drawing at double size with pacing
    let saved = canvas.save_data()?;
    println!("Save data: {} bytes", saved.len());

    let mut replayed = Canvas::new(CanvasConfig {
        canvas_width: 800.0,
        canvas_height: 800.0,
        load_time_offset_ms: 10,
        ..Default::default()
    });
    replayed.load_save_data(&saved, false)?;

    while replayed.is_replaying() {
        now_ms += 16;
        let events = replayed.tick(now_ms);
        if events.contains(&CanvasEvent::Changed) {
            println!(">> Stroke committed at {}ms", now_ms);
        }
    }
    if let Some(stroke) = replayed.history().strokes().first() {
        println!(
            "Replayed stroke: {} points, radius {}",
            stroke.points.len(),
            stroke.brush_radius
        );
    }

    // 4. Undo empties the canvas again
    if replayed.undo() {
        println!(">> Undo successful, {} strokes left", replayed.history().len());
    }

    // 5. Instant replay of the same data
    replayed.load_history(&canvas.history().snapshot(), Pace::Immediate);
    println!(
        "Immediate replay: {} committed commands",
        replayed.layers().committed().commands().len()
    );

    println!("\nDemo Complete.");
    Ok(())
}
