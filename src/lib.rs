//! Core of a desktop shell: overlapping windows with focus and stacking,
//! title bar dragging, corner resizing, minimize/maximize, an app launch
//! registry, desktop icons with single/double click disambiguation, a
//! taskbar and a start menu. A crossterm/ratatui front end renders it in a
//! terminal.

pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod launch;
pub mod layout;
pub mod panel;
pub mod render;
pub mod scheduler;
pub mod tracing_sub;
pub mod window;
