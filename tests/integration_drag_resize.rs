use desk_wm::config::WmConfig;
use desk_wm::layout::drag::DragClamp;
use desk_wm::window::{PointerOutcome, Position, Size, WindowId, WindowManager, WindowSpec};

// Default chrome: 22px title bar, 21px buttons, 12px corner handle, inside a
// 1280x800 containment region with a 30px taskbar strip.
fn wm_with(spec: WindowSpec<()>) -> (WindowManager<()>, WindowId) {
    let mut wm = WindowManager::new(WmConfig::default());
    let id = wm.open(spec);
    (wm, id)
}

fn window(resizable: bool) -> WindowSpec<()> {
    WindowSpec::new("Notepad", ())
        .with_position(100, 100)
        .with_size(300, 200)
        .with_resizable(resizable)
}

fn corner() -> Position {
    // Inside the 12px handle at the bottom-right of (100,100)+(300x200).
    Position::new(395, 295)
}

#[test]
fn title_bar_drag_follows_pointer_and_commits() {
    let (mut wm, id) = wm_with(window(true));
    let grab = Position::new(150, 110);
    assert_eq!(wm.pointer_down(grab), PointerOutcome::DragStarted(id.clone()));
    assert!(wm.is_dragging());
    assert!(wm.pointer_move(Position::new(200, 150)));
    assert_eq!(wm.window(&id).unwrap().position(), Position::new(150, 140));
    assert!(wm.pointer_up(Position::new(250, 160)));
    assert!(!wm.is_dragging());
    assert_eq!(wm.window(&id).unwrap().position(), Position::new(200, 150));
    assert_eq!(wm.window(&id).unwrap().size(), Size::new(300, 200));
}

#[test]
fn drag_is_clamped_inside_containment() {
    let (mut wm, id) = wm_with(window(true));
    wm.pointer_down(Position::new(150, 110));
    wm.pointer_move(Position::new(-500, -500));
    assert_eq!(wm.window(&id).unwrap().position(), Position::new(0, 0));
    wm.pointer_move(Position::new(5000, 5000));
    let pos = wm.window(&id).unwrap().position();
    assert_eq!(pos.x, 1280 - 300);
    assert!(pos.y + 22 <= 800);
    wm.pointer_up(Position::new(5000, 5000));
}

#[test]
fn loose_clamp_still_keeps_the_title_bar_above_the_taskbar() {
    let (mut wm, id) = wm_with(window(true).with_drag_clamp(DragClamp::keep_visible(2)));
    wm.pointer_down(Position::new(150, 110));
    wm.pointer_move(Position::new(150, 5000));
    wm.pointer_up(Position::new(150, 5000));

    // Work area is 800 minus the 30px strip; the 22px title bar ends at its edge.
    let pos = wm.window(&id).unwrap().position();
    assert_eq!(pos.y, 770 - 22);
    assert_eq!(
        wm.pointer_down(Position::new(150, pos.y + 1)),
        PointerOutcome::DragStarted(id.clone())
    );
    wm.pointer_up(Position::new(150, pos.y + 1));
}

#[test]
fn control_buttons_do_not_start_a_drag() {
    let (mut wm, id) = wm_with(window(true));
    // Close button occupies the rightmost 21px of the title bar.
    let close = Position::new(390, 110);
    assert_eq!(wm.pointer_down(close), PointerOutcome::Closed(id.clone()));
    assert!(!wm.is_dragging());
    assert!(wm.window(&id).is_none());
}

#[test]
fn maximized_windows_cannot_be_dragged_or_resized() {
    let (mut wm, id) = wm_with(window(true));
    wm.maximize(&id);
    let before = wm.window(&id).unwrap().geometry();
    assert!(!wm.begin_drag(&id, Position::new(50, 5)));
    assert!(!wm.begin_resize(&id, Position::new(1275, 765)));
    assert_eq!(
        wm.pointer_down(Position::new(50, 5)),
        PointerOutcome::Focused(id.clone())
    );
    wm.pointer_move(Position::new(400, 400));
    assert_eq!(wm.window(&id).unwrap().geometry(), before);
}

#[test]
fn resize_grows_and_respects_floor() {
    let (mut wm, id) = wm_with(window(true));
    assert_eq!(
        wm.pointer_down(corner()),
        PointerOutcome::ResizeStarted(id.clone())
    );
    wm.pointer_move(Position::new(445, 335));
    assert_eq!(wm.window(&id).unwrap().size(), Size::new(350, 240));

    // Far past the floor in both directions.
    wm.pointer_move(Position::new(-2000, -2000));
    assert_eq!(wm.window(&id).unwrap().size(), Size::new(150, 100));
    wm.pointer_up(Position::new(-2000, -2000));
    assert_eq!(wm.window(&id).unwrap().size(), Size::new(150, 100));
    assert_eq!(wm.window(&id).unwrap().position(), Position::new(100, 100));
}

#[test]
fn per_window_floor_overrides_baseline() {
    let (mut wm, id) = wm_with(window(true).with_min_size(260, 180));
    assert!(wm.begin_resize(&id, corner()));
    wm.resize_to(Position::new(0, 0));
    assert!(wm.end_resize(Position::new(0, 0)));
    assert_eq!(wm.window(&id).unwrap().size(), Size::new(260, 180));
}

#[test]
fn fixed_size_windows_never_resize() {
    let (mut wm, id) = wm_with(window(false));
    assert!(!wm.begin_resize(&id, corner()));
    // The corner is just body for a fixed-size window.
    assert_eq!(wm.pointer_down(corner()), PointerOutcome::Focused(id.clone()));
    for target in [Position::new(900, 900), Position::new(0, 0)] {
        wm.pointer_move(target);
        wm.pointer_up(target);
        assert_eq!(wm.window(&id).unwrap().size(), Size::new(300, 200));
    }
}

#[test]
fn gesture_start_focuses_window() {
    let mut wm = WindowManager::new(WmConfig::default());
    let back = wm.open(window(true));
    let front = wm.open(
        WindowSpec::new("Front", ())
            .with_position(600, 400)
            .with_size(300, 200),
    );
    assert_eq!(wm.active(), Some(&front));
    wm.pointer_down(Position::new(150, 110));
    assert_eq!(wm.active(), Some(&back));
    assert_eq!(wm.interaction_target(), Some(&back));
    wm.pointer_up(Position::new(150, 110));
    wm.check_invariants().unwrap();
}

#[test]
fn closing_mid_drag_cancels_the_gesture() {
    let (mut wm, id) = wm_with(window(true));
    wm.pointer_down(Position::new(150, 110));
    assert!(wm.is_dragging());
    wm.close(&id);
    assert!(!wm.is_dragging());
    assert!(!wm.pointer_move(Position::new(300, 300)));
    assert!(!wm.pointer_up(Position::new(300, 300)));
}

#[test]
fn topmost_window_wins_hit_testing() {
    let mut wm = WindowManager::new(WmConfig::default());
    let below = wm.open(window(true));
    let above = wm.open(
        WindowSpec::new("Above", ())
            .with_position(200, 150)
            .with_size(300, 200),
    );
    assert_eq!(wm.window_at(Position::new(250, 200)), Some(&above));
    assert_eq!(wm.window_at(Position::new(120, 120)), Some(&below));
    wm.minimize(&above);
    assert_eq!(wm.window_at(Position::new(250, 200)), Some(&below));
}
