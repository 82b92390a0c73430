//! Shared crate-wide constants.

use std::time::Duration;

/// Baseline width floor applied to every window unless its application kind
/// asks for a larger one.
pub const DEFAULT_MIN_WIDTH: u16 = 150;

/// Baseline height floor, see [`DEFAULT_MIN_WIDTH`].
pub const DEFAULT_MIN_HEIGHT: u16 = 100;

/// Geometry used when an open request does not carry its own.
pub const DEFAULT_WINDOW_X: i32 = 50;
pub const DEFAULT_WINDOW_Y: i32 = 50;
pub const DEFAULT_WINDOW_WIDTH: u16 = 300;
pub const DEFAULT_WINDOW_HEIGHT: u16 = 200;

/// Height of the fixed taskbar strip that a maximized window must leave
/// uncovered at the bottom of the containment region.
pub const TASKBAR_HEIGHT: u16 = 30;

/// Height of the menu bar across the top of the screen. Windows live below
/// it.
pub const MENU_BAR_HEIGHT: u16 = 22;

/// Height of a window's title bar. Pointer presses inside it (outside the
/// control buttons) start a drag.
pub const TITLE_BAR_HEIGHT: u16 = 22;

/// Width of each title bar control button (minimize, maximize, close).
pub const CONTROL_BUTTON_WIDTH: u16 = 21;

/// Edge length of the square bottom-right resize handle.
pub const RESIZE_HANDLE_SIZE: u16 = 12;

/// Two clicks on the same icon closer together than this activate it.
///
/// Anything slower is treated as two independent single clicks. The value
/// matches the conventional desktop double-click interval.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Title prefix drawn in front of the focused window's title.
pub const FOCUS_MARKER: &str = "■ ";
