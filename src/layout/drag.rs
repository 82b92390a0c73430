use ratatui::prelude::Rect;

use crate::window::{Position, Size};

/// How far a window may travel past the containment region on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisClamp {
    /// The whole window stays inside the region.
    Contain,
    /// At least this many units of the window stay inside the region.
    KeepVisible(u16),
    /// Unbounded on this axis.
    Free,
}

/// Per-window drag bounds. Regardless of the vertical setting, the title bar
/// never leaves the region, so a window can always be grabbed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragClamp {
    pub horizontal: AxisClamp,
    pub vertical: AxisClamp,
}

impl DragClamp {
    pub const CONTAIN: DragClamp = DragClamp {
        horizontal: AxisClamp::Contain,
        vertical: AxisClamp::Contain,
    };

    pub const fn keep_visible(margin: u16) -> Self {
        Self {
            horizontal: AxisClamp::KeepVisible(margin),
            vertical: AxisClamp::KeepVisible(margin),
        }
    }
}

impl Default for DragClamp {
    fn default() -> Self {
        Self::CONTAIN
    }
}

/// A live title bar drag: where the window and the pointer were when the
/// button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag {
    pub initial: Position,
    pub pointer_start: Position,
}

impl HeaderDrag {
    pub fn new(initial: Position, pointer_start: Position) -> Self {
        Self {
            initial,
            pointer_start,
        }
    }

    /// `initial + pointer delta`, clamped.
    pub fn position_for(
        &self,
        pointer: Position,
        size: Size,
        bounds: Rect,
        clamp: DragClamp,
        title_height: u16,
    ) -> Position {
        let (dx, dy) = pointer.delta_from(self.pointer_start);
        clamp_position(
            self.initial.offset(dx, dy),
            size,
            bounds,
            clamp,
            title_height,
        )
    }
}

pub fn clamp_position(
    position: Position,
    size: Size,
    bounds: Rect,
    clamp: DragClamp,
    title_height: u16,
) -> Position {
    let x = clamp_axis(
        position.x,
        size.width,
        bounds.x,
        bounds.width,
        clamp.horizontal,
    );
    let y = clamp_axis(
        position.y,
        size.height,
        bounds.y,
        bounds.height,
        clamp.vertical,
    );

    // Title bar stays fully inside vertically.
    let top = bounds.y as i32;
    let title = title_height.min(size.height).max(1) as i32;
    let lowest = (top + bounds.height as i32 - title).max(top);
    Position {
        x,
        y: y.clamp(top, lowest),
    }
}

fn clamp_axis(value: i32, extent: u16, origin: u16, span: u16, clamp: AxisClamp) -> i32 {
    let lo = origin as i32;
    let hi = lo + span as i32;
    let extent = extent as i32;
    match clamp {
        AxisClamp::Contain => value.clamp(lo, (hi - extent).max(lo)),
        AxisClamp::KeepVisible(margin) => {
            let margin = (margin as i32).min(extent).min(span as i32);
            let min = lo - extent + margin;
            let max = (hi - margin).max(min);
            value.clamp(min, max)
        }
        AxisClamp::Free => value,
    }
}
