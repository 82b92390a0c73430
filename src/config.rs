use std::time::Duration;

use ratatui::prelude::Rect;
use thiserror::Error;

use crate::constants::{
    CONTROL_BUTTON_WIDTH, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DOUBLE_CLICK_WINDOW,
    MENU_BAR_HEIGHT, RESIZE_HANDLE_SIZE, TASKBAR_HEIGHT, TITLE_BAR_HEIGHT,
};
use crate::layout::drag::DragClamp;
use crate::window::{Geometry, Position, Size};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("containment region must be non-empty, got {width}x{height}")]
    EmptyContainment { width: u16, height: u16 },
    #[error("minimum window size must be non-zero, got {width}x{height}")]
    ZeroMinimum { width: u16, height: u16 },
    #[error("chrome height {chrome} leaves no room in a {height} tall region")]
    ChromeTooTall { chrome: u16, height: u16 },
    #[error("double-click window must be greater than zero")]
    ZeroDoubleClick,
}

/// Window manager settings. Defaults describe a browser-sized desktop in
/// pixels; the terminal front end scales them down to cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmConfig {
    /// Region windows are dragged and sized within (desktop minus menu bar).
    pub containment: Rect,
    /// Strip at the bottom of the containment region a maximized window
    /// leaves uncovered.
    pub chrome_height: u16,
    /// Menu bar strip above the containment region.
    pub menu_bar_height: u16,
    /// Baseline floor for windows that do not bring their own.
    pub min_size: Size,
    pub title_bar_height: u16,
    pub button_width: u16,
    pub resize_handle: u16,
    pub drag_clamp: DragClamp,
    pub double_click: Duration,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            containment: Rect {
                x: 0,
                y: 0,
                width: 1280,
                height: 800,
            },
            chrome_height: TASKBAR_HEIGHT,
            menu_bar_height: MENU_BAR_HEIGHT,
            min_size: Size::new(DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT),
            title_bar_height: TITLE_BAR_HEIGHT,
            button_width: CONTROL_BUTTON_WIDTH,
            resize_handle: RESIZE_HANDLE_SIZE,
            drag_clamp: DragClamp::default(),
            double_click: DOUBLE_CLICK_WINDOW,
        }
    }
}

impl WmConfig {
    pub fn with_containment(mut self, containment: Rect) -> Self {
        self.containment = containment;
        self
    }

    pub fn with_chrome_height(mut self, height: u16) -> Self {
        self.chrome_height = height;
        self
    }

    pub fn with_menu_bar_height(mut self, height: u16) -> Self {
        self.menu_bar_height = height;
        self
    }

    pub fn with_min_size(mut self, width: u16, height: u16) -> Self {
        self.min_size = Size::new(width, height);
        self
    }

    pub fn with_title_bar_height(mut self, height: u16) -> Self {
        self.title_bar_height = height;
        self
    }

    pub fn with_button_width(mut self, width: u16) -> Self {
        self.button_width = width;
        self
    }

    pub fn with_resize_handle(mut self, size: u16) -> Self {
        self.resize_handle = size;
        self
    }

    pub fn with_drag_clamp(mut self, clamp: DragClamp) -> Self {
        self.drag_clamp = clamp;
        self
    }

    pub fn with_double_click(mut self, window: Duration) -> Self {
        self.double_click = window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.containment;
        if c.width == 0 || c.height == 0 {
            return Err(ConfigError::EmptyContainment {
                width: c.width,
                height: c.height,
            });
        }
        if self.min_size.width == 0 || self.min_size.height == 0 {
            return Err(ConfigError::ZeroMinimum {
                width: self.min_size.width,
                height: self.min_size.height,
            });
        }
        if self.chrome_height >= c.height {
            return Err(ConfigError::ChromeTooTall {
                chrome: self.chrome_height,
                height: c.height,
            });
        }
        if self.double_click.is_zero() {
            return Err(ConfigError::ZeroDoubleClick);
        }
        Ok(())
    }

    /// The containment region minus the bottom chrome strip. Windows are
    /// kept inside this while dragged so the taskbar never covers them.
    pub fn work_area(&self) -> Rect {
        let c = self.containment;
        Rect {
            height: c.height.saturating_sub(self.chrome_height),
            ..c
        }
    }

    /// Geometry of a maximized window: the whole work area.
    pub fn maximized_geometry(&self) -> Geometry {
        let area = self.work_area();
        Geometry::new(
            Position::new(area.x as i32, area.y as i32),
            Size::new(area.width, area.height),
        )
    }
}
