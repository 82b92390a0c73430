pub mod decorator;
pub mod id_gen;
pub mod z_order;

mod window_manager;

use std::fmt;

use ratatui::prelude::Rect;

use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y,
};
use crate::layout::drag::DragClamp;

pub use decorator::{ChromeLayout, WindowPart, display_title};
pub use id_gen::{GlobalIds, IdGenerator, MonotonicIds, reset_global_ids};
pub use window_manager::{InvariantViolation, PointerOutcome, WindowManager};

/// Unique, immutable identifier of one open window, e.g. `calculator-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed top-left offset in the containment region's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Vector from `origin` to `self`.
    pub fn delta_from(self, origin: Position) -> (i32, i32) {
        (
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum; used to lift a size onto its floor.
    pub fn at_least(self, floor: Size) -> Self {
        Self {
            width: self.width.max(floor.width),
            height: self.height.max(floor.height),
        }
    }
}

/// Position plus size. Also the shape of a restore snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub position: Position,
    pub size: Size,
}

impl Geometry {
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            position: Position::new(rect.x as i32, rect.y as i32),
            size: Size::new(rect.width, rect.height),
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width as i32)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height as i32)
    }

    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.position.x
            && point.x < self.right()
            && point.y >= self.position.y
            && point.y < self.bottom()
    }

    /// The part of this geometry that lies inside `bounds`, as an unsigned
    /// rect. Returns an empty rect when they do not overlap.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let left = self.position.x.max(bounds.x as i32);
        let top = self.position.y.max(bounds.y as i32);
        let right = self.right().min(bounds.right() as i32);
        let bottom = self.bottom().min(bounds.bottom() as i32);
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }
}

/// Geometry state of a window. Being maximized and carrying a restore
/// snapshot are the same thing, so one cannot exist without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Normal {
        geometry: Geometry,
    },
    Maximized {
        geometry: Geometry,
        restore: Geometry,
    },
}

impl WindowState {
    pub fn geometry(&self) -> Geometry {
        match *self {
            WindowState::Normal { geometry } | WindowState::Maximized { geometry, .. } => geometry,
        }
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self, WindowState::Maximized { .. })
    }

    pub fn restore_snapshot(&self) -> Option<Geometry> {
        match *self {
            WindowState::Maximized { restore, .. } => Some(restore),
            WindowState::Normal { .. } => None,
        }
    }
}

/// The record for one open window. Only [`WindowManager`] mutates it; every
/// other component reads it through the getters.
#[derive(Debug, Clone)]
pub struct WindowEntity<C> {
    id: WindowId,
    title: String,
    logical_kind: Option<String>,
    content: C,
    state: WindowState,
    minimized: bool,
    z_index: u32,
    resizable: bool,
    min_size: Size,
    drag_clamp: DragClamp,
    creation_order: u64,
}

impl<C> WindowEntity<C> {
    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn logical_kind(&self) -> Option<&str> {
        self.logical_kind.as_deref()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn geometry(&self) -> Geometry {
        self.state.geometry()
    }

    pub fn position(&self) -> Position {
        self.geometry().position
    }

    pub fn size(&self) -> Size {
        self.geometry().size
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn is_maximized(&self) -> bool {
        self.state.is_maximized()
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn restore_snapshot(&self) -> Option<Geometry> {
        self.state.restore_snapshot()
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn drag_clamp(&self) -> DragClamp {
        self.drag_clamp
    }

    pub fn creation_order(&self) -> u64 {
        self.creation_order
    }

    /// Singleton lookup: a kind matches the logical kind, or the title for
    /// windows opened without one.
    pub fn matches_kind(&self, kind: &str) -> bool {
        self.logical_kind.as_deref() == Some(kind) || self.title == kind
    }
}

/// An open request, as sent by menus, the start menu and icon activation.
#[derive(Debug, Clone)]
pub struct WindowSpec<C> {
    pub title: String,
    pub logical_kind: Option<String>,
    pub content: C,
    pub position: Position,
    pub size: Size,
    pub resizable: bool,
    /// Overrides the configured baseline floor.
    pub min_size: Option<Size>,
    /// Overrides the configured drag clamp.
    pub drag_clamp: Option<DragClamp>,
}

impl<C> WindowSpec<C> {
    pub fn new(title: impl Into<String>, content: C) -> Self {
        Self {
            title: title.into(),
            logical_kind: None,
            content,
            position: Position::new(DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y),
            size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            resizable: true,
            min_size: None,
            drag_clamp: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.logical_kind = Some(kind.into());
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_min_size(mut self, width: u16, height: u16) -> Self {
        self.min_size = Some(Size::new(width, height));
        self
    }

    pub fn with_drag_clamp(mut self, clamp: DragClamp) -> Self {
        self.drag_clamp = Some(clamp);
        self
    }
}

/// One row of the taskbar feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSummary {
    pub id: WindowId,
    pub title: String,
    pub is_focused: bool,
    pub is_minimized: bool,
}
