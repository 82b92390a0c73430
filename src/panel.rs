use std::time::Duration;

use chrono::NaiveTime;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::desktop::DesktopCommand;
use crate::layout::rect_contains;
use crate::render::{safe_set_string, truncate_to_width};
use crate::window::{WindowId, WindowManager, WindowSummary};

pub const START_LABEL: &str = "≡ Start";
const NEW_WINDOW_LABEL: &str = "New Window";
const TASK_LABEL_MAX: usize = 18;
/// Below this, task buttons give up the gap between them.
const TASK_MIN_WIDTH: u16 = 4;
/// Room for "12:00 PM" with a cell of padding either side.
const CLOCK_WIDTH: u16 = 10;

/// How often the tray clock is redrawn.
pub const CLOCK_REFRESH: Duration = Duration::from_secs(30);

/// Twelve-hour "3:07 PM" form shown in the tray and the menu bar.
pub fn clock_label(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn task_width(title: &str) -> u16 {
    title.chars().count().min(TASK_LABEL_MAX) as u16 + 2
}

/// Title squeezed into a `width` cell button, padded when there is room.
fn task_label(title: &str, width: u16) -> String {
    let width = width as usize;
    if width < 3 {
        return truncate_to_width(title, width);
    }
    let inner = width - 2;
    let label = if title.chars().count() > inner {
        let mut cut = truncate_to_width(title, inner - 1);
        cut.push('…');
        cut
    } else {
        title.to_string()
    };
    format!(" {label} ")
}

fn bar_style() -> Style {
    Style::default().bg(Color::Gray).fg(Color::Black)
}

fn menu_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn fill(buffer: &mut Buffer, rect: Rect, style: Style) {
    let rect = rect.intersection(buffer.area);
    for y in rect.y..rect.y.saturating_add(rect.height) {
        for x in rect.x..rect.x.saturating_add(rect.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

/// Taskbar button behaviour: bring back a minimized window, minimize the
/// active one, focus anything else.
pub fn task_click<C>(wm: &mut WindowManager<C>, id: &WindowId) {
    let Some(window) = wm.window(id) else {
        return;
    };
    if window.is_minimized() {
        wm.restore(id);
    } else if wm.is_active(id) {
        wm.minimize(id);
    } else {
        wm.focus(id);
    }
}

/// One clickable line of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub command: DesktopCommand,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, command: DesktopCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// A boxed list of entries hanging off an anchor.
#[derive(Debug, Clone, Default)]
struct Dropdown {
    entries: Vec<MenuEntry>,
    rect: Rect,
}

impl Dropdown {
    fn size(&self) -> (u16, u16) {
        let label = self
            .entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0) as u16;
        (label.saturating_add(4), (self.entries.len() as u16).saturating_add(2))
    }

    fn place(&mut self, x: u16, y: u16, bounds: Rect) {
        let (width, height) = self.size();
        self.rect = Rect {
            x,
            y,
            width,
            height,
        }
        .intersection(bounds);
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.rect, column, row)
    }

    fn entry_at(&self, column: u16, row: u16) -> Option<&MenuEntry> {
        if !self.contains(column, row) || row == self.rect.y {
            return None;
        }
        self.entries.get((row - self.rect.y - 1) as usize)
    }

    fn render(&self, buffer: &mut Buffer) {
        if self.rect.width == 0 || self.rect.height == 0 {
            return;
        }
        fill(buffer, self.rect, menu_style());
        let inner = self.rect.width.saturating_sub(2) as usize;
        for (idx, entry) in self.entries.iter().enumerate() {
            let y = self.rect.y.saturating_add(idx as u16 + 1);
            let text = truncate_to_width(&format!(" {}", entry.label), inner);
            safe_set_string(
                buffer,
                self.rect,
                self.rect.x.saturating_add(1),
                y,
                &text,
                menu_style(),
            );
        }
    }
}

fn launch_entries<'a>(kinds: impl IntoIterator<Item = &'a str>) -> Vec<MenuEntry> {
    kinds
        .into_iter()
        .map(|kind| MenuEntry::new(kind, DesktopCommand::Launch(kind.to_string())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskbarHit {
    Start,
    Task(WindowId),
}

#[derive(Debug, Clone)]
struct TaskButton {
    summary: WindowSummary,
    rect: Rect,
}

/// Bottom strip: start button, one button per open window, and an
/// optional clock tray at the right end.
#[derive(Debug, Default)]
pub struct Taskbar {
    area: Rect,
    start: Rect,
    tray: Rect,
    clock: Option<String>,
    buttons: Vec<TaskButton>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn start_rect(&self) -> Rect {
        self.start
    }

    pub fn tray_rect(&self) -> Rect {
        self.tray
    }

    pub fn clock(&self) -> Option<&str> {
        self.clock.as_deref()
    }

    /// Show `label` in the tray, or hide the tray with `None`. Turning the
    /// tray on or off changes the layout, so call [`Taskbar::layout`] after.
    pub fn set_clock(&mut self, label: Option<String>) {
        self.clock = label;
    }

    /// Lay out buttons for `summaries` inside `area`. When their natural
    /// widths do not fit, every button shrinks to an equal share of the
    /// strip with its label cut short, so each window keeps a button.
    pub fn layout(&mut self, area: Rect, summaries: &[WindowSummary]) {
        self.area = area;
        self.buttons.clear();
        if area.width == 0 || area.height == 0 {
            self.start = Rect::default();
            self.tray = Rect::default();
            return;
        }
        let start_width = (START_LABEL.chars().count() as u16 + 2).min(area.width);
        self.start = Rect {
            width: start_width,
            ..area
        };
        let right = area.x.saturating_add(area.width);
        self.tray = match self.clock {
            Some(_) => {
                let width = CLOCK_WIDTH.min(area.width.saturating_sub(start_width));
                Rect {
                    x: right.saturating_sub(width),
                    width,
                    ..area
                }
            }
            None => Rect::default(),
        };
        let max_x = if self.tray.width > 0 { self.tray.x } else { right };
        let first_x = self.start.x.saturating_add(start_width).saturating_add(1);
        if summaries.is_empty() || first_x >= max_x {
            return;
        }

        let available = u32::from(max_x - first_x);
        let count = summaries.len() as u32;
        let natural: u32 = summaries
            .iter()
            .map(|s| u32::from(task_width(&s.title)))
            .sum::<u32>()
            + (count - 1);
        let (cap, gap) = if natural <= available {
            (u16::MAX, 1)
        } else {
            let slot = (available / count) as u16;
            if slot > TASK_MIN_WIDTH {
                (slot - 1, 1)
            } else {
                (slot.max(1), 0)
            }
        };

        let mut x = first_x;
        for summary in summaries {
            let width = task_width(&summary.title).min(cap);
            if x.saturating_add(width) > max_x {
                tracing::warn!(window_id = %summary.id, "no room left for a taskbar button");
                break;
            }
            self.buttons.push(TaskButton {
                summary: summary.clone(),
                rect: Rect {
                    x,
                    width,
                    ..area
                },
            });
            x = x.saturating_add(width).saturating_add(gap);
        }
    }

    /// Ids with a visible button, left to right.
    pub fn button_ids(&self) -> impl Iterator<Item = &WindowId> {
        self.buttons.iter().map(|b| &b.summary.id)
    }

    pub fn button_rect(&self, id: &WindowId) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|b| b.summary.id == *id)
            .map(|b| b.rect)
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<TaskbarHit> {
        if rect_contains(self.start, column, row) {
            return Some(TaskbarHit::Start);
        }
        self.buttons
            .iter()
            .find(|b| rect_contains(b.rect, column, row))
            .map(|b| TaskbarHit::Task(b.summary.id.clone()))
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }

    pub fn render(&self, buffer: &mut Buffer, start_open: bool) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        fill(buffer, self.area, bar_style());
        let start_style = if start_open {
            highlight_style()
        } else {
            bar_style().add_modifier(Modifier::BOLD)
        };
        safe_set_string(
            buffer,
            self.area,
            self.start.x,
            self.start.y,
            &format!(" {START_LABEL} "),
            start_style,
        );
        for button in &self.buttons {
            let style = if button.summary.is_focused {
                highlight_style()
            } else if button.summary.is_minimized {
                bar_style().add_modifier(Modifier::DIM | Modifier::ITALIC)
            } else {
                bar_style()
            };
            safe_set_string(
                buffer,
                button.rect,
                button.rect.x,
                button.rect.y,
                &task_label(&button.summary.title, button.rect.width),
                style,
            );
        }
        if let Some(clock) = &self.clock {
            let width = clock.chars().count() as u16;
            let x = self
                .tray
                .x
                .saturating_add(self.tray.width.saturating_sub(width.saturating_add(1)));
            safe_set_string(buffer, self.tray, x, self.tray.y, clock, bar_style());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuHit {
    Entry(DesktopCommand),
    /// Inside an open menu, but not on an entry.
    Inside,
}

/// Launcher opened from the taskbar start button; lists every registered
/// application plus "New Window".
#[derive(Debug, Default)]
pub struct StartMenu {
    open: bool,
    dropdown: Dropdown,
}

impl StartMenu {
    pub fn new<'a>(kinds: impl IntoIterator<Item = &'a str>) -> Self {
        let mut menu = Self::default();
        menu.set_apps(kinds);
        menu
    }

    pub fn set_apps<'a>(&mut self, kinds: impl IntoIterator<Item = &'a str>) {
        let mut entries = launch_entries(kinds);
        entries.push(MenuEntry::new(NEW_WINDOW_LABEL, DesktopCommand::NewWindow));
        self.dropdown.entries = entries;
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.dropdown.entries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn rect(&self) -> Rect {
        if self.open {
            self.dropdown.rect
        } else {
            Rect::default()
        }
    }

    /// Place the menu so it rises from the start button.
    pub fn layout(&mut self, start_button: Rect, screen: Rect) {
        let (_, height) = self.dropdown.size();
        let y = start_button.y.saturating_sub(height).max(screen.y);
        self.dropdown.place(start_button.x, y, screen);
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<MenuHit> {
        if !self.open || !self.dropdown.contains(column, row) {
            return None;
        }
        Some(match self.dropdown.entry_at(column, row) {
            Some(entry) => MenuHit::Entry(entry.command.clone()),
            None => MenuHit::Inside,
        })
    }

    pub fn render(&self, buffer: &mut Buffer) {
        if self.open {
            self.dropdown.render(buffer);
        }
    }
}

#[derive(Debug, Clone)]
struct Menu {
    title: String,
    title_rect: Rect,
    dropdown: Dropdown,
}

impl Menu {
    fn new(title: &str, entries: Vec<MenuEntry>) -> Self {
        Self {
            title: title.to_string(),
            title_rect: Rect::default(),
            dropdown: Dropdown {
                entries,
                rect: Rect::default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuBarHit {
    Title(usize),
    Menu(MenuHit),
}

/// Top strip with File, View and Special menus.
#[derive(Debug)]
pub struct MenuBar {
    area: Rect,
    screen: Rect,
    menus: Vec<Menu>,
    open: Option<usize>,
    clock: Option<String>,
}

impl MenuBar {
    pub fn new<'a>(kinds: impl IntoIterator<Item = &'a str>) -> Self {
        let menus = vec![
            Menu::new(
                "File",
                vec![
                    MenuEntry::new("New", DesktopCommand::NewWindow),
                    MenuEntry::new("Close", DesktopCommand::CloseActive),
                ],
            ),
            Menu::new(
                "View",
                vec![
                    MenuEntry::new("Minimize", DesktopCommand::MinimizeActive),
                    MenuEntry::new("Maximize", DesktopCommand::ToggleMaximizeActive),
                ],
            ),
            Menu::new("Special", launch_entries(kinds)),
        ];
        Self {
            area: Rect::default(),
            screen: Rect::default(),
            menus,
            open: None,
            clock: None,
        }
    }

    pub fn set_apps<'a>(&mut self, kinds: impl IntoIterator<Item = &'a str>) {
        if let Some(special) = self.menus.iter_mut().find(|m| m.title == "Special") {
            special.dropdown.entries = launch_entries(kinds);
        }
        self.relayout();
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.menus.iter().map(|m| m.title.as_str())
    }

    pub fn entries(&self, menu: usize) -> Option<&[MenuEntry]> {
        self.menus.get(menu).map(|m| m.dropdown.entries.as_slice())
    }

    /// Time shown at the right end of the bar.
    pub fn set_clock(&mut self, label: Option<String>) {
        self.clock = label;
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn toggle(&mut self, menu: usize) {
        self.open = if self.open == Some(menu) || menu >= self.menus.len() {
            None
        } else {
            Some(menu)
        };
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn layout(&mut self, area: Rect, screen: Rect) {
        self.area = area;
        self.screen = screen;
        self.relayout();
    }

    fn relayout(&mut self) {
        let area = self.area;
        let max_x = area.x.saturating_add(area.width);
        let mut x = area.x.saturating_add(1);
        for menu in &mut self.menus {
            let width = menu.title.chars().count() as u16 + 2;
            menu.title_rect = if area.height > 0 && x.saturating_add(width) <= max_x {
                Rect {
                    x,
                    width,
                    height: 1,
                    ..area
                }
            } else {
                Rect::default()
            };
            menu.dropdown.place(
                x,
                area.y.saturating_add(area.height),
                self.screen,
            );
            x = x.saturating_add(width);
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<MenuBarHit> {
        if let Some(open) = self.open.and_then(|i| self.menus.get(i))
            && open.dropdown.contains(column, row)
        {
            return Some(MenuBarHit::Menu(
                match open.dropdown.entry_at(column, row) {
                    Some(entry) => MenuHit::Entry(entry.command.clone()),
                    None => MenuHit::Inside,
                },
            ));
        }
        self.menus
            .iter()
            .position(|m| rect_contains(m.title_rect, column, row))
            .map(MenuBarHit::Title)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }

    pub fn render(&self, buffer: &mut Buffer) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        fill(buffer, self.area, bar_style());
        for (idx, menu) in self.menus.iter().enumerate() {
            let style = if self.open == Some(idx) {
                highlight_style()
            } else {
                bar_style()
            };
            safe_set_string(
                buffer,
                self.area,
                menu.title_rect.x,
                menu.title_rect.y,
                &format!(" {} ", menu.title),
                style,
            );
        }
        if let Some(clock) = &self.clock {
            let width = clock.chars().count() as u16 + 1;
            let menus_end = self
                .menus
                .iter()
                .map(|m| m.title_rect.x.saturating_add(m.title_rect.width))
                .max()
                .unwrap_or(self.area.x);
            let x = self
                .area
                .x
                .saturating_add(self.area.width.saturating_sub(width));
            if x > menus_end {
                safe_set_string(buffer, self.area, x, self.area.y, clock, bar_style());
            }
        }
        if let Some(open) = self.open.and_then(|i| self.menus.get(i)) {
            open.dropdown.render(buffer);
        }
    }
}
