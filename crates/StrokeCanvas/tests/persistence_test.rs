use serde_json::{Value, json};
use stroke_canvas::lag::NoLag;
use stroke_canvas::model::{History, Ink, Point, Stroke};
use stroke_canvas::persistence::SavedHistory;
use stroke_canvas::{Canvas, CanvasConfig, CanvasError};

fn create_canvas(width: f32, height: f32) -> Canvas {
    Canvas::new(CanvasConfig {
        lazy_radius: 0.0,
        canvas_width: width,
        canvas_height: height,
        ..Default::default()
    })
    .with_lag(Box::new(NoLag::default()))
}

fn sample_history() -> History {
    History::with_strokes(
        vec![
            Stroke::new(
                vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)],
                4.0,
                Ink::color("#f00"),
            ),
            Stroke::new(
                vec![Point::erase(15.0, 25.0), Point::new(35.0, 45.0)],
                8.0,
                Ink::Erase,
            ),
        ],
        400.0,
        400.0,
    )
}

#[test]
fn test_save_data_shape() {
    let mut canvas = create_canvas(400.0, 400.0);
    canvas.load_history(&sample_history(), stroke_canvas::Pace::Immediate);

    let json = canvas.save_data().expect("Failed to save");
    let value: Value = serde_json::from_str(&json).expect("Saved data is JSON");

    assert_eq!(value["width"], json!(400.0));
    assert_eq!(value["height"], json!(400.0));
    assert_eq!(value["lines"].as_array().map(Vec::len), Some(2));

    let first = &value["lines"][0];
    assert_eq!(first["brushRadius"], json!(4.0));
    assert_eq!(first["brushColor"], json!("#f00"));
    assert_eq!(first["points"][0], json!({"x": 10.0, "y": 20.0}));

    let erase = &value["lines"][1];
    assert_eq!(erase["brushColor"], json!("erase"));
    assert_eq!(erase["points"][0]["type"], json!("erase"));
    assert!(erase["points"][1].get("type").is_none());
}

#[test]
fn test_save_load_round_trip() {
    let mut canvas = create_canvas(400.0, 400.0);
    canvas.load_history(&sample_history(), stroke_canvas::Pace::Immediate);
    let json = canvas.save_data().expect("Failed to save");

    let mut restored = create_canvas(400.0, 400.0);
    restored
        .load_save_data(&json, true)
        .expect("Failed to load");

    assert_eq!(restored.history().snapshot(), canvas.history().snapshot());
    assert_eq!(restored.layers().committed(), canvas.layers().committed());
}

#[test]
fn test_load_rescales_to_canvas_size() {
    let json = json!({
        "lines": [{
            "points": [{"x": 10.0, "y": 10.0}, {"x": 100.0, "y": 50.0}],
            "brushRadius": 3.0,
            "brushColor": "#00f"
        }],
        "width": 200.0,
        "height": 100.0
    })
    .to_string();

    let mut canvas = create_canvas(400.0, 400.0);
    canvas.load_save_data(&json, true).expect("Failed to load");

    let stroke = &canvas.history().strokes()[0];
    assert_eq!(
        stroke.points,
        vec![Point::new(20.0, 40.0), Point::new(200.0, 200.0)]
    );
    // Mean of 2x and 4x
    assert_eq!(stroke.brush_radius, 9.0);
    assert_eq!(canvas.history().dimensions(), (400.0, 400.0));
}

#[test]
fn test_missing_dimensions_load_unscaled() {
    let json = json!({
        "lines": [{
            "points": [{"x": 10.0, "y": 10.0}, {"x": 100.0, "y": 50.0}],
            "brushRadius": 3.0,
            "brushColor": "#00f"
        }]
    })
    .to_string();

    let mut canvas = create_canvas(800.0, 600.0);
    canvas.load_save_data(&json, true).expect("Failed to load");

    let stroke = &canvas.history().strokes()[0];
    assert_eq!(stroke.points[1], Point::new(100.0, 50.0));
    assert_eq!(stroke.brush_radius, 3.0);
}

#[test]
fn test_missing_or_invalid_lines_mean_empty() {
    for payload in [r#"{}"#, r#"{"lines": 5}"#, r#"{"lines": null, "width": 10}"#] {
        let saved = SavedHistory::from_json_lenient(payload, 400.0, 400.0)
            .expect("Lenient parse should succeed");
        assert!(saved.lines.is_empty(), "payload {payload}");
    }

    let mut canvas = create_canvas(400.0, 400.0);
    canvas.load_history(&sample_history(), stroke_canvas::Pace::Immediate);
    canvas.load_save_data("{}", true).expect("Failed to load");
    assert!(canvas.history().is_empty());
    assert!(canvas.layers().committed().is_blank());
}

#[test]
fn test_invalid_json_is_an_error() {
    let mut canvas = create_canvas(400.0, 400.0);
    canvas.load_history(&sample_history(), stroke_canvas::Pace::Immediate);

    let err = canvas.load_save_data("not json {", true);
    assert!(matches!(err, Err(CanvasError::InvalidJson(_))));

    // A failed load leaves the drawing untouched
    assert_eq!(canvas.history().len(), 2);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let json = json!({
        "lines": [
            {"points": [{"x": 1.0, "y": 1.0}, {"x": 2.0, "y": 2.0}], "brushRadius": 1.0, "brushColor": "#000"},
            {"points": "nope", "brushRadius": 1.0, "brushColor": "#000"},
            {"points": [{"x": 1.0, "y": 1.0}], "brushRadius": 1.0, "brushColor": "#000"},
            {"brushRadius": 1.0},
            {"points": [{"x": 5.0, "y": 5.0}, {"x": 6.0, "y": 6.0}], "brushRadius": 2.0, "brushColor": "erase"}
        ],
        "width": 400.0,
        "height": 400.0
    })
    .to_string();

    let saved = SavedHistory::from_json_lenient(&json, 400.0, 400.0).expect("Failed to parse");
    assert_eq!(saved.lines.len(), 2);
    assert_eq!(saved.lines[1].ink, Ink::Erase);
}

#[test]
fn test_paced_load_uses_load_time_offset() {
    let mut canvas = Canvas::new(CanvasConfig {
        lazy_radius: 0.0,
        load_time_offset_ms: 7,
        ..Default::default()
    });
    let json = SavedHistory::from(sample_history())
        .to_json()
        .expect("Failed to serialize");

    canvas.load_save_data(&json, false).expect("Failed to load");
    assert!(canvas.is_replaying());

    // Two points per stroke: one redraw and one commit each
    canvas.tick(13);
    assert!(canvas.history().is_empty());
    canvas.tick(14);
    assert_eq!(canvas.history().len(), 1);
    canvas.tick(28);
    assert_eq!(canvas.history().len(), 2);
    assert!(!canvas.is_replaying());
}

#[test]
fn test_config_from_json() {
    let config = CanvasConfig::from_json(
        r##"{"brush_radius": 3.5, "erase": true, "style": {"hide_grid": true}}"##,
    )
    .expect("Failed to parse config");

    assert_eq!(config.brush_radius, 3.5);
    assert!(config.erase);
    assert!(config.style.hide_grid);
    // Everything else keeps its default
    assert_eq!(config.brush_color, "#444");
    assert_eq!(config.lazy_radius, 12.0);
    assert_eq!(config.style.grid_size, 25.0);
    assert_eq!(config.ink(), Ink::Erase);

    assert!(matches!(
        CanvasConfig::from_json("[1, 2]"),
        Err(CanvasError::InvalidConfig(_))
    ));
}
