//! The desktop shell: windows, icons, menus and the taskbar wired together.
//!
//! [`Desktop`] is what a front end talks to. It routes pointer presses to
//! the right surface, turns icon clicks into launches through the click
//! disambiguator, and keeps the taskbar feed in sync with the window
//! manager.

pub mod click;

use std::time::Duration;

use chrono::NaiveTime;
use ratatui::prelude::Rect;

pub use click::{ClickDisambiguator, ClickOutcome};

use crate::config::{ConfigError, WmConfig};
use crate::launch::LaunchRegistry;
use crate::layout::{rect_contains, split_chrome};
use crate::panel::{
    CLOCK_REFRESH, MenuBar, MenuBarHit, MenuHit, StartMenu, Taskbar, TaskbarHit, clock_label,
    task_click,
};
use crate::scheduler::{Scheduler, TimerQueue};
use crate::window::{PointerOutcome, Position, Size, WindowId, WindowManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconAction {
    Launch(String),
    NewWindow,
}

#[derive(Debug, Clone)]
pub struct DesktopIcon {
    pub id: IconId,
    pub label: String,
    pub action: IconAction,
    rect: Rect,
}

impl DesktopIcon {
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// Everything menus, keys and the taskbar can ask the desktop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopCommand {
    Launch(String),
    NewWindow,
    Focus(WindowId),
    Close(WindowId),
    Minimize(WindowId),
    Maximize(WindowId),
    Restore(WindowId),
    TaskClick(WindowId),
    CloseActive,
    MinimizeActive,
    ToggleMaximizeActive,
    CycleFocus,
    ToggleStartMenu,
}

/// Which surface a pointer press ended up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    MenuBar,
    StartMenu,
    Taskbar,
    Window(PointerOutcome),
    Icon(ClickOutcome<IconId>),
    Background,
}

/// Where the tray clock reads the time of day from.
pub type TimeSource = fn() -> NaiveTime;

/// Payload of the clock refresh timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockTick;

#[derive(Debug)]
pub struct Desktop<C> {
    wm: WindowManager<C>,
    apps: LaunchRegistry<C>,
    clicks: ClickDisambiguator<IconId>,
    timers: TimerQueue<IconId>,
    clock_timers: TimerQueue<ClockTick>,
    clock: Option<TimeSource>,
    icons: Vec<DesktopIcon>,
    icon_size: Size,
    screen: Rect,
    menu_bar: MenuBar,
    taskbar: Taskbar,
    start_menu: StartMenu,
    synced_revision: Option<u64>,
}

impl<C> Desktop<C> {
    pub fn new(config: WmConfig, apps: LaunchRegistry<C>) -> Result<Self, ConfigError> {
        config.validate()?;
        let c = config.containment;
        let screen = Rect {
            y: c.y.saturating_sub(config.menu_bar_height),
            height: c.height.saturating_add(config.menu_bar_height),
            ..c
        };
        let mut desktop = Self {
            clicks: ClickDisambiguator::new(config.double_click),
            timers: TimerQueue::new(),
            clock_timers: TimerQueue::new(),
            clock: None,
            menu_bar: MenuBar::new(apps.kinds()),
            start_menu: StartMenu::new(apps.kinds()),
            taskbar: Taskbar::new(),
            wm: WindowManager::new(config),
            apps,
            icons: Vec::new(),
            icon_size: Size::new(12, 3),
            screen,
            synced_revision: None,
        };
        desktop.set_screen(screen);
        Ok(desktop)
    }

    pub fn wm(&self) -> &WindowManager<C> {
        &self.wm
    }

    pub fn apps(&self) -> &LaunchRegistry<C> {
        &self.apps
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn menu_bar(&self) -> &MenuBar {
        &self.menu_bar
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn selected_icon(&self) -> Option<IconId> {
        self.clicks.selected().copied()
    }

    pub fn with_icon_size(mut self, width: u16, height: u16) -> Self {
        self.icon_size = Size::new(width, height);
        self.layout_icons();
        self
    }

    /// Show a clock in the taskbar tray and the menu bar, read from `now`
    /// and refreshed every [`CLOCK_REFRESH`] of [`Desktop::tick`] time.
    pub fn with_clock(mut self, now: TimeSource) -> Self {
        self.clock = Some(now);
        self.refresh_clock();
        self.synced_revision = None;
        self.sync_panels();
        self
    }

    fn refresh_clock(&mut self) {
        let Some(now) = self.clock else {
            return;
        };
        let label = clock_label(now());
        tracing::trace!(%label, "clock refreshed");
        self.taskbar.set_clock(Some(label.clone()));
        self.menu_bar.set_clock(Some(label));
        self.clock_timers.after(CLOCK_REFRESH, ClockTick);
    }

    pub fn add_icon(&mut self, label: impl Into<String>, action: IconAction) -> IconId {
        let id = IconId(self.icons.len());
        self.icons.push(DesktopIcon {
            id,
            label: label.into(),
            action,
            rect: Rect::default(),
        });
        self.layout_icons();
        id
    }

    /// One icon per registered application.
    pub fn add_app_icons(&mut self) {
        let kinds: Vec<String> = self.apps.kinds().map(str::to_string).collect();
        for kind in kinds {
            let label = self
                .apps
                .descriptor(&kind)
                .map(|app| app.title.clone())
                .unwrap_or_else(|| kind.clone());
            self.add_icon(label, IconAction::Launch(kind));
        }
    }

    /// Lay everything out for a new screen size. The containment region is
    /// the screen minus the menu bar; the taskbar sits at its bottom.
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
        let config = self.wm.config();
        let (menu_area, containment, _) = split_chrome(screen, config.menu_bar_height, 0);
        self.menu_bar.layout(menu_area, screen);
        if containment.height > 0 && containment.width > 0 {
            self.wm.set_containment(containment);
        }
        self.layout_icons();
        self.synced_revision = None;
        self.sync_panels();
    }

    fn taskbar_area(&self) -> Rect {
        let config = self.wm.config();
        let (_, _, strip) = split_chrome(config.containment, 0, config.chrome_height);
        strip
    }

    fn layout_icons(&mut self) {
        let c = self.wm.config().containment;
        let size = self.icon_size;
        let mut y = c.y.saturating_add(1);
        for icon in &mut self.icons {
            icon.rect = Rect {
                x: c.x.saturating_add(1),
                y,
                width: size.width,
                height: size.height,
            }
            .intersection(c);
            y = y.saturating_add(size.height).saturating_add(1);
        }
    }

    /// Recompute the taskbar feed if the window manager changed.
    fn sync_panels(&mut self) {
        let revision = self.wm.revision();
        if self.synced_revision == Some(revision) {
            return;
        }
        let area = self.taskbar_area();
        self.taskbar.layout(area, &self.wm.summaries());
        self.start_menu.layout(self.taskbar.start_rect(), self.screen);
        self.synced_revision = Some(revision);
    }

    pub fn dispatch(&mut self, command: DesktopCommand) {
        tracing::debug!(?command, "dispatch");
        match command {
            DesktopCommand::Launch(kind) => {
                self.launch(&kind);
            }
            DesktopCommand::NewWindow => {
                self.new_window();
            }
            DesktopCommand::Focus(id) => self.wm.focus(&id),
            DesktopCommand::Close(id) => {
                self.wm.close(&id);
            }
            DesktopCommand::Minimize(id) => self.wm.minimize(&id),
            DesktopCommand::Maximize(id) => self.wm.maximize(&id),
            DesktopCommand::Restore(id) => self.wm.restore(&id),
            DesktopCommand::TaskClick(id) => task_click(&mut self.wm, &id),
            DesktopCommand::CloseActive => {
                if let Some(id) = self.wm.active().cloned() {
                    self.wm.close(&id);
                }
            }
            DesktopCommand::MinimizeActive => {
                if let Some(id) = self.wm.active().cloned() {
                    self.wm.minimize(&id);
                }
            }
            DesktopCommand::ToggleMaximizeActive => {
                if let Some(id) = self.wm.active().cloned() {
                    self.wm.toggle_maximize(&id);
                }
            }
            DesktopCommand::CycleFocus => self.wm.cycle_focus(),
            DesktopCommand::ToggleStartMenu => {
                self.menu_bar.close();
                self.start_menu.toggle();
            }
        }
        self.sync_panels();
    }

    pub fn launch(&mut self, kind: &str) -> Option<WindowId> {
        let id = self.apps.launch(&mut self.wm, kind);
        self.sync_panels();
        id
    }

    pub fn new_window(&mut self) -> WindowId {
        let id = self.apps.open_untitled(&mut self.wm);
        self.sync_panels();
        id
    }

    fn activate_icon(&mut self, icon: IconId) -> Option<WindowId> {
        let action = self.icons.get(icon.0)?.action.clone();
        tracing::debug!(icon = icon.0, ?action, "icon activated");
        match action {
            IconAction::Launch(kind) => self.launch(&kind),
            IconAction::NewWindow => Some(self.new_window()),
        }
    }

    /// A single pointer click on an icon; two of these inside the
    /// double-click window activate it.
    pub fn icon_click(&mut self, icon: IconId) -> ClickOutcome<IconId> {
        if self.icons.get(icon.0).is_none() {
            return ClickOutcome::Ignored;
        }
        let outcome = self.clicks.click(icon, &mut self.timers);
        if let ClickOutcome::Activated(icon) = outcome {
            self.activate_icon(icon);
        }
        outcome
    }

    pub fn icon_double_click(&mut self, icon: IconId) -> ClickOutcome<IconId> {
        if self.icons.get(icon.0).is_none() {
            return ClickOutcome::Ignored;
        }
        let outcome = self.clicks.double_click(icon, &mut self.timers);
        self.activate_icon(icon);
        outcome
    }

    pub fn icon_key_activate(&mut self, icon: IconId) -> ClickOutcome<IconId> {
        if self.icons.get(icon.0).is_none() {
            return ClickOutcome::Ignored;
        }
        let outcome = self.clicks.key_activate(icon, &mut self.timers);
        self.activate_icon(icon);
        outcome
    }

    pub fn background_click(&mut self) -> ClickOutcome<IconId> {
        self.clicks.background_click(&mut self.timers)
    }

    /// Move the icon selection by one, wrapping around. No timer is armed.
    pub fn select_next_icon(&mut self, forward: bool) -> Option<IconId> {
        if self.icons.is_empty() {
            return None;
        }
        let count = self.icons.len();
        let next = match self.clicks.selected() {
            Some(current) if forward => (current.0 + 1) % count,
            Some(current) => (current.0 + count - 1) % count,
            None if forward => 0,
            None => count - 1,
        };
        let icon = IconId(next);
        self.clicks.select(icon, &mut self.timers);
        Some(icon)
    }

    pub fn activate_selected_icon(&mut self) -> Option<WindowId> {
        let icon = self.clicks.selected().copied()?;
        self.clicks.key_activate(icon, &mut self.timers);
        self.activate_icon(icon)
    }

    /// Advance the clock by `elapsed` and resolve any click windows that
    /// closed.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<ClickOutcome<IconId>> {
        if !self.clock_timers.advance(elapsed).is_empty() {
            self.refresh_clock();
        }
        self.timers
            .advance(elapsed)
            .into_iter()
            .map(|(token, _)| self.clicks.timeout(token))
            .filter(|outcome| *outcome != ClickOutcome::Ignored)
            .collect()
    }

    /// Time until the next pending timer, for sizing an input poll.
    pub fn next_timer_deadline(&self) -> Option<Duration> {
        match (self.timers.next_deadline(), self.clock_timers.next_deadline()) {
            (Some(click), Some(clock)) => Some(click.min(clock)),
            (click, clock) => click.or(clock),
        }
    }

    /// Route a pointer press from the top of the visual stack down: open
    /// menus, menu bar, taskbar, windows, icons, then the bare desktop.
    pub fn pointer_down(&mut self, point: Position) -> PointerTarget {
        let cell = (u16::try_from(point.x).ok()).zip(u16::try_from(point.y).ok());

        if let Some((column, row)) = cell {
            match self.menu_bar.hit_test(column, row) {
                Some(MenuBarHit::Menu(MenuHit::Entry(command))) => {
                    self.menu_bar.close();
                    self.dispatch(command);
                    return PointerTarget::MenuBar;
                }
                Some(MenuBarHit::Menu(MenuHit::Inside)) => return PointerTarget::MenuBar,
                Some(MenuBarHit::Title(menu)) => {
                    self.start_menu.close();
                    self.menu_bar.toggle(menu);
                    return PointerTarget::MenuBar;
                }
                None => {}
            }
            match self.start_menu.hit_test(column, row) {
                Some(MenuHit::Entry(command)) => {
                    self.start_menu.close();
                    self.dispatch(command);
                    return PointerTarget::StartMenu;
                }
                Some(MenuHit::Inside) => return PointerTarget::StartMenu,
                None => {}
            }
        }

        // Any press outside an open menu dismisses it.
        self.menu_bar.close();

        if let Some((column, row)) = cell
            && self.taskbar.contains(column, row)
        {
            match self.taskbar.hit_test(column, row) {
                Some(TaskbarHit::Start) => self.start_menu.toggle(),
                Some(TaskbarHit::Task(id)) => {
                    self.start_menu.close();
                    task_click(&mut self.wm, &id);
                }
                None => self.start_menu.close(),
            }
            self.sync_panels();
            return PointerTarget::Taskbar;
        }
        self.start_menu.close();

        if let Some((column, row)) = cell
            && rect_contains(self.menu_bar.area(), column, row)
        {
            return PointerTarget::MenuBar;
        }

        let outcome = self.wm.pointer_down(point);
        if outcome != PointerOutcome::Missed {
            self.sync_panels();
            return PointerTarget::Window(outcome);
        }

        let icon = cell.and_then(|(column, row)| {
            self.icons
                .iter()
                .find(|icon| rect_contains(icon.rect, column, row))
                .map(|icon| icon.id)
        });
        match icon {
            Some(icon) => PointerTarget::Icon(self.icon_click(icon)),
            None => {
                self.background_click();
                PointerTarget::Background
            }
        }
    }

    pub fn pointer_move(&mut self, point: Position) -> bool {
        self.wm.pointer_move(point)
    }

    pub fn pointer_up(&mut self, point: Position) -> bool {
        let ended = self.wm.pointer_up(point);
        self.sync_panels();
        ended
    }

    /// Tear down pending timers and any live gesture.
    pub fn shutdown(&mut self) {
        self.clicks.cancel(&mut self.timers);
        self.timers.clear();
        self.clock_timers.clear();
        self.wm.cancel_interaction();
        self.start_menu.close();
        self.menu_bar.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::AppDescriptor;

    const MS: Duration = Duration::from_millis(1);

    fn cell_config() -> WmConfig {
        WmConfig::default()
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
            .with_min_size(12, 4)
    }

    fn desktop() -> Desktop<String> {
        let apps = LaunchRegistry::new(|n| format!("note {n}"))
            .with_untitled_layout(Position::new(20, 3), 2, Size::new(24, 8))
            .with_app(
                AppDescriptor::new("Calculator", || "0".to_string())
                    .with_origin(30, 4)
                    .with_step(1)
                    .with_size(20, 10)
                    .with_resizable(false),
            );
        let mut desktop = Desktop::new(cell_config(), apps).unwrap();
        desktop.add_app_icons();
        desktop
    }

    #[test]
    fn rejects_invalid_config() {
        let apps: LaunchRegistry<()> = LaunchRegistry::new(|_| ());
        let err = Desktop::new(WmConfig::default().with_min_size(0, 0), apps).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMinimum { .. }));
    }

    #[test]
    fn layout_splits_screen() {
        let d = desktop();
        assert_eq!(d.screen().height, 24);
        assert_eq!(d.menu_bar().area().height, 1);
        assert_eq!(d.taskbar().area().y, 23);
        assert_eq!(d.icons()[0].rect().y, 2);
    }

    #[test]
    fn icon_double_click_launches_once() {
        let mut d = desktop();
        let icon = d.icons()[0].rect();
        let at = Position::new(icon.x as i32 + 1, icon.y as i32);
        assert_eq!(
            d.pointer_down(at),
            PointerTarget::Icon(ClickOutcome::Selected(IconId(0)))
        );
        assert!(d.tick(MS * 100).is_empty());
        assert_eq!(
            d.pointer_down(at),
            PointerTarget::Icon(ClickOutcome::Activated(IconId(0)))
        );
        assert_eq!(d.wm().len(), 1);
        let calc = d.wm().find_by_kind("Calculator").unwrap();
        assert_eq!(d.wm().active(), Some(&calc));
        assert_eq!(d.taskbar().button_ids().count(), 1);
    }

    #[test]
    fn slow_clicks_only_select() {
        let mut d = desktop();
        d.icon_click(IconId(0));
        assert_eq!(d.tick(MS * 400), vec![ClickOutcome::SelectOnly(IconId(0))]);
        assert_eq!(d.selected_icon(), Some(IconId(0)));
        assert!(d.wm().is_empty());
        d.icon_click(IconId(0));
        d.tick(MS * 250);
        assert_eq!(d.icon_click(IconId(0)), ClickOutcome::Activated(IconId(0)));
        assert_eq!(d.wm().len(), 1);
    }

    #[test]
    fn background_press_clears_selection() {
        let mut d = desktop();
        d.icon_click(IconId(0));
        assert_eq!(d.pointer_down(Position::new(70, 15)), PointerTarget::Background);
        assert_eq!(d.selected_icon(), None);
        assert_eq!(d.next_timer_deadline(), None);
    }

    #[test]
    fn keyboard_icon_navigation_activates_immediately() {
        let mut d = desktop();
        assert_eq!(d.select_next_icon(true), Some(IconId(0)));
        assert_eq!(d.next_timer_deadline(), None);
        let id = d.activate_selected_icon().unwrap();
        assert_eq!(d.wm().active(), Some(&id));
        assert_eq!(d.selected_icon(), None);
    }

    #[test]
    fn taskbar_press_toggles_minimize() {
        let mut d = desktop();
        let id = d.new_window();
        let rect = d.taskbar().button_rect(&id).unwrap();
        let at = Position::new(rect.x as i32 + 1, rect.y as i32);
        assert_eq!(d.pointer_down(at), PointerTarget::Taskbar);
        assert!(d.wm().window(&id).unwrap().is_minimized());
        let rect = d.taskbar().button_rect(&id).unwrap();
        d.pointer_down(Position::new(rect.x as i32 + 1, rect.y as i32));
        assert_eq!(d.wm().active(), Some(&id));
    }

    #[test]
    fn start_menu_launches_and_closes() {
        let mut d = desktop();
        let start = d.taskbar().start_rect();
        d.pointer_down(Position::new(start.x as i32, start.y as i32));
        assert!(d.start_menu().is_open());
        let menu = d.start_menu().rect();
        // First entry sits just below the top border.
        d.pointer_down(Position::new(menu.x as i32 + 1, menu.y as i32 + 1));
        assert!(!d.start_menu().is_open());
        assert!(d.wm().find_by_kind("Calculator").is_some());
    }

    #[test]
    fn menu_bar_file_new_opens_window() {
        let mut d = desktop();
        d.pointer_down(Position::new(2, 0));
        assert_eq!(d.menu_bar().open_menu(), Some(0));
        d.pointer_down(Position::new(2, 2));
        assert!(!d.menu_bar().is_open());
        assert_eq!(d.wm().len(), 1);
        assert_eq!(d.wm().active_window().unwrap().title(), "New Window 1");
    }

    #[test]
    fn window_drag_through_desktop() {
        let mut d = desktop();
        let id = d.new_window();
        let pos = d.wm().window(&id).unwrap().position();
        let grab = Position::new(pos.x + 2, pos.y);
        assert_eq!(
            d.pointer_down(grab),
            PointerTarget::Window(PointerOutcome::DragStarted(id.clone()))
        );
        assert!(d.pointer_move(grab.offset(5, 2)));
        assert!(d.pointer_up(grab.offset(5, 2)));
        assert_eq!(
            d.wm().window(&id).unwrap().position(),
            pos.offset(5, 2)
        );
    }

    #[test]
    fn commands_target_active_window() {
        let mut d = desktop();
        let a = d.new_window();
        let b = d.new_window();
        d.dispatch(DesktopCommand::ToggleMaximizeActive);
        assert!(d.wm().window(&b).unwrap().is_maximized());
        d.dispatch(DesktopCommand::MinimizeActive);
        assert_eq!(d.wm().active(), Some(&a));
        d.dispatch(DesktopCommand::CloseActive);
        assert_eq!(d.wm().active(), None);
        d.dispatch(DesktopCommand::TaskClick(b.clone()));
        assert_eq!(d.wm().active(), Some(&b));
        d.wm().check_invariants().unwrap();
    }

    thread_local! {
        static MINUTE: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
    }

    fn fake_now() -> NaiveTime {
        NaiveTime::from_hms_opt(9, MINUTE.with(|m| m.get()), 0).unwrap_or_default()
    }

    #[test]
    fn tray_clock_refreshes_on_its_timer() {
        MINUTE.with(|m| m.set(5));
        let mut d = desktop().with_clock(fake_now);
        assert_eq!(d.taskbar().clock(), Some("9:05 AM"));
        assert_eq!(d.taskbar().tray_rect().x, 70);
        assert_eq!(d.next_timer_deadline(), Some(CLOCK_REFRESH));

        MINUTE.with(|m| m.set(6));
        d.tick(CLOCK_REFRESH - MS);
        assert_eq!(d.taskbar().clock(), Some("9:05 AM"));
        d.tick(MS);
        assert_eq!(d.taskbar().clock(), Some("9:06 AM"));
        assert_eq!(d.next_timer_deadline(), Some(CLOCK_REFRESH));

        // A pending click window is sooner than the next refresh.
        d.icon_click(IconId(0));
        assert_eq!(d.next_timer_deadline(), Some(MS * 300));
        d.shutdown();
        assert_eq!(d.next_timer_deadline(), None);
    }

    #[test]
    fn shutdown_discards_pending_click() {
        let mut d = desktop();
        d.icon_click(IconId(0));
        d.shutdown();
        assert!(d.tick(MS * 1000).is_empty());
        assert!(d.wm().is_empty());
    }
}
