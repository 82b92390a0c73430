pub mod drag;
pub mod resize;

use ratatui::prelude::Rect;

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Carve `top` rows and `bottom` rows of chrome off `area`, returning
/// `(top_strip, middle, bottom_strip)`.
pub fn split_chrome(area: Rect, top: u16, bottom: u16) -> (Rect, Rect, Rect) {
    let top = top.min(area.height);
    let bottom = bottom.min(area.height.saturating_sub(top));
    let top_strip = Rect {
        height: top,
        ..area
    };
    let middle = Rect {
        y: area.y.saturating_add(top),
        height: area.height.saturating_sub(top).saturating_sub(bottom),
        ..area
    };
    let bottom_strip = Rect {
        y: middle.y.saturating_add(middle.height),
        height: bottom,
        ..area
    };
    (top_strip, middle, bottom_strip)
}
