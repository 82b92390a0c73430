use std::time::Duration;

use ratatui::layout::Rect;

use desk_wm::config::WmConfig;
use desk_wm::desktop::{ClickOutcome, Desktop, DesktopCommand, IconId, PointerTarget};
use desk_wm::launch::{AppDescriptor, LaunchRegistry};
use desk_wm::window::{PointerOutcome, Position, Size, WindowId};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// An 80x24 terminal: menu bar on row 0, taskbar on row 23.
fn desktop() -> Desktop<String> {
    let config = WmConfig::default()
        .with_containment(Rect {
            x: 0,
            y: 1,
            width: 80,
            height: 23,
        })
        .with_menu_bar_height(1)
        .with_chrome_height(1)
        .with_title_bar_height(1)
        .with_button_width(3)
        .with_resize_handle(1)
        .with_min_size(12, 4);
    let apps = LaunchRegistry::new(|n| format!("note {n}"))
        .with_untitled_layout(Position::new(40, 8), 1, Size::new(24, 8))
        .with_app(
            AppDescriptor::new("Calculator", || "0".to_string())
                .with_origin(20, 3)
                .with_step(0)
                .with_size(22, 9)
                .with_resizable(false),
        )
        .with_app(
            AppDescriptor::new("Notepad", String::new)
                .with_origin(46, 6)
                .with_step(0)
                .with_size(30, 10),
        );
    let mut desktop = Desktop::new(config, apps).unwrap();
    desktop.add_app_icons();
    desktop
}

fn icon_point(desktop: &Desktop<String>, icon: IconId) -> Position {
    let rect = desktop.icons()[icon.0].rect();
    Position::new(rect.x as i32 + 1, rect.y as i32 + 1)
}

fn calculators(desktop: &Desktop<String>) -> Vec<WindowId> {
    desktop
        .wm()
        .windows()
        .filter(|w| w.logical_kind() == Some("Calculator"))
        .map(|w| w.id().clone())
        .collect()
}

fn press(desktop: &mut Desktop<String>, x: u16, y: u16) -> PointerTarget {
    let point = Position::new(x as i32, y as i32);
    let target = desktop.pointer_down(point);
    desktop.pointer_up(point);
    target
}

#[test]
fn double_clicking_an_icon_opens_its_app_once() {
    let mut d = desktop();
    let calc_icon = IconId(0);
    let at = icon_point(&d, calc_icon);

    assert_eq!(
        d.pointer_down(at),
        PointerTarget::Icon(ClickOutcome::Selected(calc_icon))
    );
    assert!(d.wm().is_empty());
    d.tick(ms(120));
    assert_eq!(
        d.pointer_down(at),
        PointerTarget::Icon(ClickOutcome::Activated(calc_icon))
    );

    let calcs = calculators(&d);
    assert_eq!(calcs.len(), 1);
    assert_eq!(d.wm().active(), Some(&calcs[0]));
    assert_eq!(d.next_timer_deadline(), None);
    assert_eq!(d.selected_icon(), None);
}

#[test]
fn menu_entry_refocuses_a_running_app() {
    let mut d = desktop();
    let calc = d.launch("Calculator").unwrap();
    let before = d.wm().window(&calc).unwrap().geometry();
    let notes = d.launch("Notepad").unwrap();
    assert_eq!(d.wm().active(), Some(&notes));

    // "Special" sits after " File " and " View " in the menu bar.
    assert_eq!(press(&mut d, 14, 0), PointerTarget::MenuBar);
    assert_eq!(d.menu_bar().open_menu(), Some(2));
    let entries = d.menu_bar().entries(2).unwrap();
    assert_eq!(entries[0].command, DesktopCommand::Launch("Calculator".into()));
    assert_eq!(press(&mut d, 15, 2), PointerTarget::MenuBar);

    assert!(!d.menu_bar().is_open());
    assert_eq!(d.wm().len(), 2);
    assert_eq!(calculators(&d), vec![calc.clone()]);
    assert_eq!(d.wm().active(), Some(&calc));
    assert_eq!(d.wm().window(&calc).unwrap().geometry(), before);
}

#[test]
fn single_click_times_out_then_fresh_double_click_opens() {
    let mut d = desktop();
    let icon = IconId(0);
    let at = icon_point(&d, icon);

    d.pointer_down(at);
    assert_eq!(d.tick(ms(400)), vec![ClickOutcome::SelectOnly(icon)]);
    assert_eq!(d.selected_icon(), Some(icon));
    assert!(d.wm().is_empty());

    // A click after the window is a fresh first click.
    assert_eq!(
        d.pointer_down(at),
        PointerTarget::Icon(ClickOutcome::Selected(icon))
    );
    assert!(d.wm().is_empty());
    assert!(d.tick(ms(200)).is_empty());
    assert_eq!(
        d.pointer_down(at),
        PointerTarget::Icon(ClickOutcome::Activated(icon))
    );
    assert_eq!(calculators(&d).len(), 1);
}

#[test]
fn clicking_another_icon_restarts_the_click_window() {
    let mut d = desktop();
    let calc = IconId(0);
    let notes = IconId(1);
    d.pointer_down(icon_point(&d, calc));
    assert_eq!(
        d.pointer_down(icon_point(&d, notes)),
        PointerTarget::Icon(ClickOutcome::Selected(notes))
    );
    assert!(d.wm().is_empty());
    assert_eq!(d.selected_icon(), Some(notes));
    // Only the newer timer is live.
    assert_eq!(d.tick(ms(300)), vec![ClickOutcome::SelectOnly(notes)]);
}

#[test]
fn background_click_clears_selection_and_timer() {
    let mut d = desktop();
    let icon = IconId(0);
    d.pointer_down(icon_point(&d, icon));
    assert_eq!(press(&mut d, 70, 18), PointerTarget::Background);
    assert_eq!(d.selected_icon(), None);
    assert_eq!(d.next_timer_deadline(), None);
    assert!(d.tick(ms(1000)).is_empty());
}

#[test]
fn keyboard_activation_is_immediate() {
    let mut d = desktop();
    assert_eq!(d.select_next_icon(true), Some(IconId(0)));
    assert_eq!(d.next_timer_deadline(), None);
    let opened = d.activate_selected_icon().unwrap();
    assert_eq!(
        d.wm().window(&opened).unwrap().logical_kind(),
        Some("Calculator")
    );
    assert_eq!(
        d.icon_key_activate(IconId(1)),
        ClickOutcome::Activated(IconId(1))
    );
    assert_eq!(d.wm().len(), 2);
}

#[test]
fn taskbar_buttons_cycle_focus_minimize_and_restore() {
    let mut d = desktop();
    let calc = d.launch("Calculator").unwrap();
    let notes = d.launch("Notepad").unwrap();
    let calc_button = d.taskbar().button_rect(&calc).unwrap();
    let notes_button = d.taskbar().button_rect(&notes).unwrap();
    assert_eq!(calc_button.y, 23);

    // Active window's button minimizes it.
    press(&mut d, notes_button.x, notes_button.y);
    assert!(d.wm().window(&notes).unwrap().is_minimized());
    assert_eq!(d.wm().active(), Some(&calc));

    // Minimized window's button restores and focuses it.
    assert_eq!(
        press(&mut d, notes_button.x, notes_button.y),
        PointerTarget::Taskbar
    );
    assert!(!d.wm().window(&notes).unwrap().is_minimized());
    assert_eq!(d.wm().active(), Some(&notes));

    // Inactive window's button focuses it.
    press(&mut d, calc_button.x, calc_button.y);
    assert_eq!(d.wm().active(), Some(&calc));
}

#[test]
fn every_window_keeps_a_taskbar_button_when_crowded() {
    let mut d = desktop();
    let ids: Vec<WindowId> = (0..5).map(|_| d.new_window()).collect();
    assert_eq!(d.taskbar().button_ids().count(), 5);

    let last = ids[4].clone();
    d.dispatch(DesktopCommand::MinimizeActive);
    assert!(d.wm().window(&last).unwrap().is_minimized());

    let button = d.taskbar().button_rect(&last).unwrap();
    assert!(button.x + button.width <= 80);
    assert_eq!(press(&mut d, button.x, button.y), PointerTarget::Taskbar);
    assert!(!d.wm().window(&last).unwrap().is_minimized());
    assert_eq!(d.wm().active(), Some(&last));
}

#[test]
fn start_menu_launches_and_closes() {
    let mut d = desktop();
    let start = d.taskbar().start_rect();
    assert_eq!(press(&mut d, start.x, start.y), PointerTarget::Taskbar);
    assert!(d.start_menu().is_open());

    let menu = d.start_menu().rect();
    let labels: Vec<&str> = d
        .start_menu()
        .entries()
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Calculator", "Notepad", "New Window"]);

    // Second entry row, inside the border.
    assert_eq!(
        press(&mut d, menu.x + 1, menu.y + 2),
        PointerTarget::StartMenu
    );
    assert!(!d.start_menu().is_open());
    let active = d.wm().active_window().unwrap();
    assert_eq!(active.logical_kind(), Some("Notepad"));
}

#[test]
fn pressing_outside_an_open_menu_dismisses_it() {
    let mut d = desktop();
    d.dispatch(DesktopCommand::ToggleStartMenu);
    assert!(d.start_menu().is_open());
    press(&mut d, 70, 18);
    assert!(!d.start_menu().is_open());
}

#[test]
fn window_chrome_is_reachable_through_the_desktop() {
    let mut d = desktop();
    let notes = d.launch("Notepad").unwrap();
    let g = d.wm().window(&notes).unwrap().geometry();
    let title_y = g.position.y;

    // Maximize button is the second slot from the right.
    let max_x = g.right() - 3 * 2 + 1;
    assert_eq!(
        d.pointer_down(Position::new(max_x, title_y)),
        PointerTarget::Window(PointerOutcome::Maximized(notes.clone()))
    );
    let full = d.wm().window(&notes).unwrap().geometry();
    assert_eq!(full.position, Position::new(0, 1));
    assert_eq!(full.size.height, 22);

    d.dispatch(DesktopCommand::ToggleMaximizeActive);
    assert_eq!(d.wm().window(&notes).unwrap().geometry(), g);

    let close_x = g.right() - 2;
    assert_eq!(
        d.pointer_down(Position::new(close_x, title_y)),
        PointerTarget::Window(PointerOutcome::Closed(notes.clone()))
    );
    assert!(d.wm().is_empty());
    assert!(d.taskbar().button_rect(&notes).is_none());
}

#[test]
fn windows_dragged_down_stop_above_the_taskbar() {
    let mut d = desktop();
    let notes = d.launch("Notepad").unwrap();
    assert_eq!(
        d.pointer_down(Position::new(48, 6)),
        PointerTarget::Window(PointerOutcome::DragStarted(notes.clone()))
    );
    d.pointer_move(Position::new(48, 500));
    d.pointer_up(Position::new(48, 500));

    let g = d.wm().window(&notes).unwrap().geometry();
    assert_eq!(g.position, Position::new(46, 13));
    assert_eq!(g.bottom(), d.taskbar().area().y as i32);

    // The resize corner sits on the last row above the taskbar.
    assert_eq!(
        d.pointer_down(Position::new(75, 22)),
        PointerTarget::Window(PointerOutcome::ResizeStarted(notes.clone()))
    );
    d.pointer_up(Position::new(75, 22));
}

#[test]
fn screen_resize_keeps_panels_and_windows_inside() {
    let mut d = desktop();
    let notes = d.launch("Notepad").unwrap();
    d.set_screen(Rect {
        x: 0,
        y: 0,
        width: 60,
        height: 16,
    });
    let c = d.wm().config().containment;
    assert_eq!(
        c,
        Rect {
            x: 0,
            y: 1,
            width: 60,
            height: 15
        }
    );
    assert_eq!(d.taskbar().area().y, 15);
    let g = d.wm().window(&notes).unwrap().geometry();
    assert!(g.right() <= 60);
    assert!(g.bottom() <= 16);
}

#[test]
fn new_windows_cascade_and_never_deduplicate() {
    let mut d = desktop();
    let a = d.new_window();
    let b = d.new_window();
    assert_ne!(a, b);
    let pa = d.wm().window(&a).unwrap().position();
    let pb = d.wm().window(&b).unwrap().position();
    assert_eq!(pb, pa.offset(1, 1));
    assert_eq!(d.wm().window(&b).unwrap().title(), "New Window 2");
    d.shutdown();
    assert_eq!(d.next_timer_deadline(), None);
}
