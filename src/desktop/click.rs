//! Single-click select versus double-click activate for desktop icons.
//!
//! The first click selects the icon and arms a timer. A second click on the
//! same icon before the timer fires activates it. If the timer fires first
//! the icon simply stays selected, and the next click starts over. Keyboard
//! activation bypasses the timer entirely.

use std::time::Duration;

use crate::scheduler::{Scheduler, TimerToken};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickState<I> {
    Idle,
    PendingSingle { icon: I, timer: TimerToken },
}

/// What a click, key press or timer did to the icon selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome<I> {
    /// Icon selected; a double click may still follow.
    Selected(I),
    /// Open or focus the icon's window.
    Activated(I),
    /// The double-click window passed. The icon stays selected.
    SelectOnly(I),
    /// Selection cleared by a click on the desktop background.
    Cleared,
    /// A timer that no longer matches the pending click.
    Ignored,
}

#[derive(Debug)]
pub struct ClickDisambiguator<I> {
    state: ClickState<I>,
    selected: Option<I>,
    window: Duration,
}

impl<I: Clone + PartialEq + std::fmt::Debug> ClickDisambiguator<I> {
    pub fn new(window: Duration) -> Self {
        Self {
            state: ClickState::Idle,
            selected: None,
            window,
        }
    }

    pub fn selected(&self) -> Option<&I> {
        self.selected.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ClickState::PendingSingle { .. })
    }

    pub fn click(&mut self, icon: I, scheduler: &mut impl Scheduler<I>) -> ClickOutcome<I> {
        match std::mem::replace(&mut self.state, ClickState::Idle) {
            ClickState::PendingSingle { icon: pending, timer } if pending == icon => {
                scheduler.cancel(timer);
                self.selected = None;
                tracing::debug!(icon = ?icon, "double click");
                ClickOutcome::Activated(icon)
            }
            previous => {
                if let ClickState::PendingSingle { timer, .. } = previous {
                    scheduler.cancel(timer);
                }
                let timer = scheduler.after(self.window, icon.clone());
                self.state = ClickState::PendingSingle {
                    icon: icon.clone(),
                    timer,
                };
                self.selected = Some(icon.clone());
                tracing::trace!(icon = ?icon, "single click pending");
                ClickOutcome::Selected(icon)
            }
        }
    }

    /// Feed back a fired timer. Tokens that do not belong to the pending
    /// click are stale and ignored.
    pub fn timeout(&mut self, token: TimerToken) -> ClickOutcome<I> {
        match &self.state {
            ClickState::PendingSingle { icon, timer } if *timer == token => {
                let icon = icon.clone();
                self.state = ClickState::Idle;
                tracing::trace!(icon = ?icon, "double-click window elapsed");
                ClickOutcome::SelectOnly(icon)
            }
            _ => ClickOutcome::Ignored,
        }
    }

    /// A click on empty desktop clears the selection and any pending click.
    pub fn background_click(&mut self, scheduler: &mut impl Scheduler<I>) -> ClickOutcome<I> {
        self.cancel(scheduler);
        self.selected = None;
        ClickOutcome::Cleared
    }

    /// Enter or Space on an icon: immediate, no timer.
    pub fn key_activate(&mut self, icon: I, scheduler: &mut impl Scheduler<I>) -> ClickOutcome<I> {
        self.cancel(scheduler);
        self.selected = None;
        ClickOutcome::Activated(icon)
    }

    /// A native double-click event, for hosts that deliver one.
    pub fn double_click(&mut self, icon: I, scheduler: &mut impl Scheduler<I>) -> ClickOutcome<I> {
        self.key_activate(icon, scheduler)
    }

    /// Keyboard navigation: move the selection without arming anything.
    pub fn select(&mut self, icon: I, scheduler: &mut impl Scheduler<I>) {
        self.cancel(scheduler);
        self.selected = Some(icon);
    }

    /// Disarm the pending timer, if any. The selection is left alone.
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler<I>) {
        if let ClickState::PendingSingle { timer, .. } =
            std::mem::replace(&mut self.state, ClickState::Idle)
        {
            scheduler.cancel(timer);
        }
    }
}
