use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::{Geometry, Position, Size};
use crate::config::WmConfig;
use crate::constants::FOCUS_MARKER;
use crate::layout::resize::resize_handle_for;

/// What a pointer press landed on inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowPart {
    TitleBar,
    Minimize,
    Maximize,
    Close,
    ResizeHandle,
    Body,
}

/// Title shown in the title bar. The canonical title never changes with
/// focus; only its presentation does.
pub fn display_title(title: &str, focused: bool) -> String {
    if focused {
        format!("{FOCUS_MARKER}{title}")
    } else {
        title.to_string()
    }
}

/// Where the title bar, its control buttons and the resize handle sit
/// inside a window's outer geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    pub title_bar_height: u16,
    pub button_width: u16,
    pub resize_handle: u16,
}

impl ChromeLayout {
    pub fn from_config(config: &WmConfig) -> Self {
        Self {
            title_bar_height: config.title_bar_height,
            button_width: config.button_width,
            resize_handle: config.resize_handle,
        }
    }

    pub fn title_bar(&self, window: Geometry) -> Geometry {
        Geometry::new(
            window.position,
            Size::new(
                window.size.width,
                self.title_bar_height.min(window.size.height),
            ),
        )
    }

    /// Control buttons are right-aligned: minimize, maximize, close.
    pub fn button(&self, window: Geometry, part: WindowPart) -> Option<Geometry> {
        let slot = match part {
            WindowPart::Close => 1,
            WindowPart::Maximize => 2,
            WindowPart::Minimize => 3,
            _ => return None,
        };
        let bar = self.title_bar(window);
        let x = bar.right() - (self.button_width as i32) * slot;
        if x < bar.position.x {
            return None;
        }
        Some(Geometry::new(
            Position::new(x, bar.position.y),
            Size::new(self.button_width, bar.size.height),
        ))
    }

    /// The bottom-right handle, only offered while it can be used.
    pub fn resize_handle(
        &self,
        window: Geometry,
        resizable: bool,
        maximized: bool,
    ) -> Option<Geometry> {
        (resizable && !maximized).then(|| resize_handle_for(window, self.resize_handle))
    }

    /// Interior below the title bar.
    pub fn content_area(&self, window: Geometry) -> Geometry {
        let bar = self.title_bar(window).size.height;
        Geometry::new(
            window.position.offset(0, bar as i32),
            Size::new(window.size.width, window.size.height.saturating_sub(bar)),
        )
    }

    pub fn hit_test(
        &self,
        window: Geometry,
        resizable: bool,
        maximized: bool,
        point: Position,
    ) -> Option<WindowPart> {
        if !window.contains(point) {
            return None;
        }
        for part in [WindowPart::Close, WindowPart::Maximize, WindowPart::Minimize] {
            if self
                .button(window, part)
                .is_some_and(|button| button.contains(point))
            {
                return Some(part);
            }
        }
        if self.title_bar(window).contains(point) {
            return Some(WindowPart::TitleBar);
        }
        if self
            .resize_handle(window, resizable, maximized)
            .is_some_and(|handle| handle.contains(point))
        {
            return Some(WindowPart::ResizeHandle);
        }
        Some(WindowPart::Body)
    }
}

/// Everything a decorator needs to paint one window frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub geometry: Geometry,
    pub title: &'a str,
    pub focused: bool,
    pub maximized: bool,
    pub resizable: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Paint the frame of one window, clipped to `bounds`. Windows are painted
    /// bottom to top, so whatever lies beneath is simply overwritten.
    fn render_window(
        &self,
        buffer: &mut Buffer,
        bounds: Rect,
        chrome: &ChromeLayout,
        view: FrameView<'_>,
    );
}

/// Blue title bar for the focused window, grey for the rest.
#[derive(Debug, Default)]
pub struct ClassicDecorator;

impl WindowDecorator for ClassicDecorator {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        bounds: Rect,
        chrome: &ChromeLayout,
        view: FrameView<'_>,
    ) {
        let visible = view.geometry.visible_in(bounds);
        if visible.width == 0 || visible.height == 0 {
            return;
        }
        let header_style = if view.focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let body_style = Style::default().bg(Color::Black).fg(Color::Gray);
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Black);

        let mut put = |x: i32, y: i32, symbol: &str, style: Style| {
            if x < visible.x as i32
                || y < visible.y as i32
                || x >= visible.right() as i32
                || y >= visible.bottom() as i32
            {
                return;
            }
            if let Some(cell) = buffer.cell_mut((x as u16, y as u16)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        };

        let g = view.geometry;
        let bar = chrome.title_bar(g);
        let left = g.position.x;
        let right = g.right() - 1;
        let bottom = g.bottom() - 1;

        for y in g.position.y..g.bottom() {
            for x in left..g.right() {
                let in_bar = y < bar.bottom();
                let symbol = if in_bar {
                    " "
                } else if y == bottom && x == left {
                    "└"
                } else if y == bottom && x == right {
                    "┘"
                } else if y == bottom {
                    "─"
                } else if x == left || x == right {
                    "│"
                } else {
                    " "
                };
                let style = if in_bar {
                    header_style
                } else if symbol == " " {
                    body_style
                } else {
                    border_style
                };
                put(x, y, symbol, style);
            }
        }

        // Title, left-aligned, stopping short of the buttons.
        let title = display_title(view.title, view.focused);
        let buttons_left = chrome
            .button(g, WindowPart::Minimize)
            .map(|b| b.position.x)
            .unwrap_or(g.right());
        for (idx, ch) in title.chars().enumerate() {
            let x = left + 1 + idx as i32;
            if x >= buttons_left - 1 {
                break;
            }
            put(x, bar.position.y, &ch.to_string(), header_style);
        }

        let maximize_symbol = if view.maximized { "❐" } else { "□" };
        for (part, symbol) in [
            (WindowPart::Minimize, "_"),
            (WindowPart::Maximize, maximize_symbol),
            (WindowPart::Close, "x"),
        ] {
            if let Some(button) = chrome.button(g, part) {
                let x = button.position.x + (button.size.width as i32) / 2;
                put(x, button.position.y, symbol, header_style);
            }
        }

        if let Some(handle) = chrome.resize_handle(g, view.resizable, view.maximized) {
            put(handle.right() - 1, handle.bottom() - 1, "◢", border_style);
        }
    }
}
