use stroke_canvas::accumulator::StrokeAccumulator;
use stroke_canvas::history::HistoryStore;
use stroke_canvas::lag::NoLag;
use stroke_canvas::model::{History, Ink, Point, Stroke};
use stroke_canvas::render::Layers;
use stroke_canvas::replay::{self, ReplayAction, ReplayEngine, ReplayTarget};
use stroke_canvas::{Canvas, CanvasConfig, CanvasEvent, Pace};

fn stroke(points: &[(f32, f32)], radius: f32, color: &str) -> Stroke {
    Stroke::new(
        points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        radius,
        Ink::color(color),
    )
}

fn sample_history() -> History {
    History::with_strokes(
        vec![
            stroke(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)], 4.0, "#f00"),
            stroke(&[(100.0, 100.0), (150.0, 120.0)], 2.0, "#00f"),
        ],
        400.0,
        400.0,
    )
}

fn create_canvas() -> Canvas {
    Canvas::new(CanvasConfig {
        lazy_radius: 0.0,
        ..Default::default()
    })
    .with_lag(Box::new(NoLag::default()))
}

#[test]
fn test_rescale_identity() {
    let history = sample_history();
    let scaled = replay::rescale(&history, 400.0, 400.0);
    assert_eq!(scaled, history.strokes);
}

#[test]
fn test_rescale_proportional() {
    let history = sample_history();
    let scaled = replay::rescale(&history, 800.0, 1200.0);

    for (original, scaled) in history.strokes.iter().zip(&scaled) {
        for (p, q) in original.points.iter().zip(&scaled.points) {
            assert_eq!(q.x, p.x * 2.0);
            assert_eq!(q.y, p.y * 3.0);
        }
        assert_eq!(scaled.brush_radius, original.brush_radius * 2.5);
        assert_eq!(scaled.ink, original.ink);
    }
}

#[test]
fn test_rescale_keeps_erase_tags() {
    let history = History::with_strokes(
        vec![Stroke::new(
            vec![Point::erase(10.0, 10.0), Point::new(20.0, 20.0)],
            5.0,
            Ink::Erase,
        )],
        100.0,
        100.0,
    );
    let scaled = replay::rescale(&history, 50.0, 50.0);
    assert!(scaled[0].points[0].is_erase());
    assert_eq!(scaled[0].points[0].x, 5.0);
    assert_eq!(scaled[0].brush_radius, 2.5);
}

#[test]
fn test_rescale_from_zero_dimensions_is_identity() {
    let mut history = sample_history();
    history.width = 0.0;
    let scaled = replay::rescale(&history, 800.0, 800.0);
    assert_eq!(scaled, history.strokes);
}

#[test]
fn test_paced_schedule_keeps_strokes_in_order() {
    let mut engine = ReplayEngine::default();
    let mut layers = Layers::default();
    let mut accumulator = StrokeAccumulator::default();
    let mut store = HistoryStore::new(400.0, 400.0);

    let committed = engine.replay(
        &sample_history(),
        400.0,
        400.0,
        Pace::Paced { interval_ms: 10 },
        ReplayTarget {
            layers: &mut layers,
            accumulator: &mut accumulator,
            history: &mut store,
        },
    );
    assert_eq!(committed, 0);

    let tasks: Vec<_> = engine
        .scheduler()
        .tasks()
        .map(|t| (t.due_ms, t.action))
        .collect();
    assert_eq!(
        tasks,
        vec![
            (10, ReplayAction::Redraw { stroke: 0, upto: 2 }),
            (20, ReplayAction::Redraw { stroke: 0, upto: 3 }),
            (30, ReplayAction::Commit { stroke: 0 }),
            (40, ReplayAction::Redraw { stroke: 1, upto: 2 }),
            (50, ReplayAction::Commit { stroke: 1 }),
        ]
    );

    let commit_a = tasks
        .iter()
        .find(|(_, a)| *a == ReplayAction::Commit { stroke: 0 })
        .map(|(due, _)| *due)
        .expect("commit of first stroke");
    assert!(
        tasks
            .iter()
            .filter(|(_, a)| matches!(a, ReplayAction::Redraw { stroke: 1, .. }))
            .all(|(due, _)| *due > commit_a)
    );
}

#[test]
fn test_paced_replay_reveals_over_time() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Paced { interval_ms: 10 });

    assert!(canvas.is_replaying());
    assert!(canvas.history().is_empty());
    assert!(canvas.layers().committed().is_blank());

    // First partial draw of stroke A
    canvas.tick(10);
    assert_eq!(canvas.layers().scratch().commands().len(), 1);
    assert!(canvas.history().is_empty());

    // Stroke A fully revealed and committed
    let events = canvas.tick(30);
    assert!(events.contains(&CanvasEvent::Changed));
    assert_eq!(canvas.history().len(), 1);
    assert!(canvas.layers().scratch().is_blank());
    assert_eq!(canvas.layers().committed().commands().len(), 1);

    // Partial B
    canvas.tick(45);
    assert_eq!(canvas.history().len(), 1);
    assert_eq!(canvas.layers().scratch().commands().len(), 1);

    canvas.tick(50);
    assert_eq!(canvas.history().len(), 2);
    assert!(!canvas.is_replaying());
    assert_eq!(canvas.history().snapshot(), sample_history());
}

#[test]
fn test_paced_and_immediate_replay_agree() {
    let mut paced = create_canvas();
    paced.load_history(&sample_history(), Pace::Paced { interval_ms: 5 });
    paced.tick(1_000);

    let mut immediate = create_canvas();
    immediate.load_history(&sample_history(), Pace::Immediate);

    assert_eq!(paced.layers().committed(), immediate.layers().committed());
    assert_eq!(paced.history().snapshot(), immediate.history().snapshot());
}

#[test]
fn test_clear_cancels_pending_replay() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Paced { interval_ms: 10 });
    canvas.tick(20);
    canvas.drain_events();

    canvas.clear();
    assert!(!canvas.is_replaying());

    let events = canvas.tick(10_000);
    assert!(!events.contains(&CanvasEvent::Changed));
    assert!(canvas.history().is_empty());
    assert!(canvas.layers().scratch().is_blank());
    assert!(canvas.layers().committed().is_blank());
}

#[test]
fn test_undo_during_paced_replay() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Paced { interval_ms: 10 });
    canvas.tick(35);
    assert_eq!(canvas.history().len(), 1);

    // Undo drops the one committed stroke and cancels the rest
    assert!(canvas.undo());
    canvas.tick(10_000);
    assert!(canvas.history().is_empty());
    assert!(canvas.layers().committed().is_blank());
    assert!(canvas.layers().scratch().is_blank());
}

#[test]
fn test_new_replay_supersedes_old_one() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Paced { interval_ms: 10 });
    canvas.tick(10);

    let single = History::with_strokes(
        vec![stroke(&[(1.0, 1.0), (2.0, 2.0)], 1.0, "#0f0")],
        400.0,
        400.0,
    );
    canvas.load_history(&single, Pace::Immediate);
    canvas.tick(10_000);

    assert_eq!(canvas.history().snapshot(), single);
    assert_eq!(canvas.layers().committed().commands().len(), 1);
}

#[test]
fn test_replay_is_not_additive() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Immediate);
    canvas.load_history(&sample_history(), Pace::Immediate);

    assert_eq!(canvas.history().len(), 2);
    assert_eq!(canvas.layers().committed().commands().len(), 2);
}

#[test]
fn test_resize_rescales_drawing() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Immediate);

    canvas.resize(800.0, 1200.0);

    let strokes = canvas.history().strokes();
    assert_eq!(canvas.history().dimensions(), (800.0, 1200.0));
    assert_eq!(strokes[0].points[2], Point::new(40.0, 60.0));
    assert_eq!(strokes[0].brush_radius, 10.0);
}

#[test]
fn test_stale_tasks_are_dropped_by_scheduler() {
    let mut scheduler = replay::Scheduler::default();
    scheduler.schedule(5, ReplayAction::Commit { stroke: 0 });
    let old = scheduler.generation();

    let new = scheduler.invalidate();
    assert_ne!(old, new);
    assert_eq!(scheduler.pending(), 0);

    scheduler.schedule(5, ReplayAction::Commit { stroke: 1 });
    let due = scheduler.take_due(5);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].generation, new);
    assert_eq!(due[0].action, ReplayAction::Commit { stroke: 1 });
}

#[test]
fn test_degenerate_resize_is_ignored() {
    let mut canvas = create_canvas();
    canvas.load_history(&sample_history(), Pace::Immediate);
    let before = canvas.history().snapshot();

    canvas.resize(0.0, 400.0);
    canvas.resize(-20.0, -20.0);
    canvas.resize(f32::NAN, 400.0);

    assert_eq!(canvas.history().snapshot(), before);
    assert_eq!(canvas.config().canvas_width, 400.0);

    // The drawing still scales normally afterwards
    canvas.resize(800.0, 800.0);
    assert_eq!(canvas.history().strokes()[0].points[0], Point::new(20.0, 20.0));
}
