use animator_core::edit::EditSession;
use animator_core::loader::{load_model, parse_model, InputFormat};
use animator_core::views::{render_frame, SvgView, TextView, VisualOutput, VisualView};
use animator_core::{AnimatorModel, Color, View};

const BUILDINGS: &str = "\
# two shapes crossing the canvas
canvas 0 0 200 100
shape R rectangle
shape C ellipse
motion R 1 0 0 20 20 255 0 0  11 100 0 20 20 0 0 255
motion R 11 100 0 20 20 0 0 255  21 100 50 20 20 0 0 255 ease_in_out
motion C 5 50 50 10 10 0 128 0  15 50 50 40 40 0 128 0
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn model() -> AnimatorModel {
    parse_model(BUILDINGS, InputFormat::Text).expect("fixture parses")
}

#[test]
fn text_round_trips_through_the_text_view() {
    init_tracing();
    let original = model();

    let mut view = TextView::new(Vec::new());
    view.render(&original).unwrap();
    let text = String::from_utf8(view.into_inner()).unwrap();

    let reparsed = parse_model(&text, InputFormat::Text).unwrap();
    assert_eq!(reparsed.ids(), original.ids());
    assert_eq!(reparsed.last_tick(), 21);
    for tick in [1, 6, 11, 16, 21, 30] {
        assert_eq!(reparsed.tween(tick), original.tween(tick), "tick {}", tick);
    }
}

#[test]
fn tween_follows_keyframes() {
    let model = model();

    let frame = model.tween(6);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame[0].id, "R");
    assert_eq!(frame[0].state.x, 50.0);

    // C has not appeared before tick 5.
    assert_eq!(model.tween(4).len(), 1);

    // Both shapes hold their final state afterwards.
    let held = model.tween(100);
    assert_eq!(held[0].state.y, 50.0);
    assert_eq!(held[1].state.width, 40.0);
    assert!(model.is_animation_done(22));
    assert!(!model.is_animation_done(21));
}

#[test]
fn svg_uses_canvas_and_speed() {
    let mut view = SvgView::new(Vec::new(), 10).unwrap();
    view.render(&model()).unwrap();
    let svg = String::from_utf8(view.into_inner()).unwrap();

    assert!(svg.contains("viewBox=\"0 0 200 100\""));
    assert!(svg.contains("<ellipse id=\"C\""));
    // tick 11 at 10 ticks/s
    assert!(svg.contains("begin=\"1100ms\" dur=\"1000ms\" attributeName=\"y\""));
    assert!(svg.contains("keySplines=\"0.364 0 0.636 1\""));
}

#[test]
fn visual_frames_are_written_per_tick() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("frames");

    let mut view = VisualView::new(VisualOutput::PngFrames { dir: frames.clone() }, 24).unwrap();
    view.render(&model()).unwrap();

    let count = std::fs::read_dir(&frames).unwrap().count();
    assert_eq!(count, 21);
    assert!(frames.join("frame_0001.png").exists());
    assert!(frames.join("frame_0021.png").exists());

    let first = render_frame(&model(), 1, Color::WHITE).unwrap();
    assert_eq!((first.width(), first.height()), (200, 100));
    assert_eq!(first.get_pixel(5, 5).0, [255, 0, 0, 255]);
}

#[test]
fn edits_can_be_saved_and_reloaded() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("edited.txt");

    let mut session = EditSession::new(model(), 1).unwrap();
    for line in [
        "ellipse",
        "add-shape S",
        "select S",
        "add-keyframe 3 10 10 5 5 0 0 0",
        "add-keyframe 30 10 10 5 5 0 0 0",
        "select R",
        "pick 21",
        "remove-keyframe",
    ] {
        session.handle_line(line);
    }
    let outcome = session.handle_line(&format!("save {}", saved.display()));
    assert!(!outcome.quit);

    let reloaded = load_model(&saved).unwrap();
    assert_eq!(reloaded.ids(), vec!["R", "C", "S"]);
    assert_eq!(reloaded.last_tick(), 30);
    assert_eq!(reloaded.keyframes("R").unwrap().len(), 2);
}

#[test]
fn json_and_script_inputs_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("anim.json");
    std::fs::write(&json, model().to_doc().to_json_pretty().unwrap()).unwrap();
    let from_json = load_model(&json).unwrap();
    assert_eq!(from_json.tween(16), model().tween(16));

    let script = dir.path().join("anim.rhai");
    std::fs::write(
        &script,
        r#"
        let anim = animation();
        anim.canvas(0, 0, 200, 100);
        anim.shape("R", "rectangle")
            .motion(1, [0, 0, 20, 20, 255, 0, 0], 11, [100, 0, 20, 20, 0, 0, 255]);
        anim
        "#,
    )
    .unwrap();
    let from_script = load_model(&script).unwrap();
    assert_eq!(from_script.tween(6), model().tween(6)[..1].to_vec());
}
