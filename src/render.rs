//! Drawing the desktop into a ratatui buffer.
//!
//! [`UiFrame`] wraps the frame buffer and clips every draw call to the
//! visible area, so windows dragged partly off screen never write out of
//! bounds. [`render_desktop`] paints the whole shell bottom to top:
//! wallpaper, icons, windows, menu bar, taskbar, then any open menu.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::desktop::Desktop;
use crate::window::decorator::{FrameView, WindowDecorator};

/// Wrapper around a frame buffer that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    /// Render `widget` into `area`, clipped to the frame.
    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        let clipped = area.intersection(self.area).intersection(self.buffer.area);
        if clipped.width == 0 || clipped.height == 0 {
            return;
        }
        widget.render(clipped, self.buffer);
    }
}

/// Window content that knows how to draw itself into its client area.
pub trait ContentView {
    fn render_content(&self, frame: &mut UiFrame<'_>, area: Rect);
}

impl ContentView for String {
    fn render_content(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let text = Paragraph::new(self.as_str())
            .style(Style::default().fg(Color::Gray).bg(Color::Black))
            .wrap(Wrap { trim: false });
        frame.render_widget(text, area);
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

const ICON_GLYPH: &str = "▣";

fn wallpaper_style() -> Style {
    Style::default().bg(Color::Cyan).fg(Color::Black)
}

fn paint_wallpaper(buffer: &mut Buffer, area: Rect) {
    let area = area.intersection(buffer.area);
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(wallpaper_style());
            }
        }
    }
}

fn paint_icons<C>(desktop: &Desktop<C>, buffer: &mut Buffer) {
    let selected = desktop.selected_icon();
    for icon in desktop.icons() {
        let rect = icon.rect();
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let style = if selected == Some(icon.id) {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            wallpaper_style()
        };
        let glyph_x = rect.x + rect.width.saturating_sub(1) / 2;
        safe_set_string(buffer, rect, glyph_x, rect.y, ICON_GLYPH, wallpaper_style());
        let label = truncate_to_width(&icon.label, rect.width as usize);
        let label_x = rect.x + (rect.width - label.chars().count() as u16) / 2;
        safe_set_string(
            buffer,
            rect,
            label_x,
            rect.y.saturating_add(1),
            &label,
            style,
        );
    }
}

/// Paint the whole desktop.
pub fn render_desktop<C: ContentView>(
    desktop: &Desktop<C>,
    decorator: &dyn WindowDecorator,
    frame: &mut UiFrame<'_>,
) {
    let wm = desktop.wm();
    let containment = wm.config().containment.intersection(frame.area());
    paint_wallpaper(frame.buffer_mut(), containment);
    paint_icons(desktop, frame.buffer_mut());

    let chrome = *wm.chrome();
    for window in wm.visible_stack() {
        let geometry = window.geometry();
        decorator.render_window(
            frame.buffer_mut(),
            containment,
            &chrome,
            FrameView {
                geometry,
                title: window.title(),
                focused: wm.is_active(window.id()),
                maximized: window.is_maximized(),
                resizable: window.is_resizable(),
            },
        );
        // Inside the side and bottom borders.
        let client = chrome.content_area(geometry);
        let inner = crate::window::Geometry::new(
            client.position.offset(1, 0),
            crate::window::Size::new(
                client.size.width.saturating_sub(2),
                client.size.height.saturating_sub(1),
            ),
        )
        .visible_in(containment);
        if inner.width > 0 && inner.height > 0 {
            window.content().render_content(frame, inner);
        }
    }

    let buffer = frame.buffer_mut();
    desktop.menu_bar().render(buffer);
    desktop.taskbar().render(buffer, desktop.start_menu().is_open());
    desktop.start_menu().render(buffer);
}
