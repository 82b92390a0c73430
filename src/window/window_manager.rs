use std::collections::HashSet;

use ratatui::prelude::Rect;
use thiserror::Error;

use super::decorator::{ChromeLayout, WindowPart};
use super::id_gen::{IdGenerator, MonotonicIds};
use super::z_order;
use super::{
    Geometry, Position, WindowEntity, WindowId, WindowSpec, WindowState, WindowSummary,
};
use crate::config::WmConfig;
use crate::layout::drag::{HeaderDrag, clamp_position};
use crate::layout::resize::ResizeDrag;

/// A broken window manager invariant, reported by
/// [`WindowManager::check_invariants`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("window id {0} appears more than once")]
    DuplicateId(WindowId),
    #[error("z-index {z} is shared by {first} and {second}")]
    DuplicateZIndex {
        z: u32,
        first: WindowId,
        second: WindowId,
    },
    #[error("active window {0} is not open")]
    ActiveMissing(WindowId),
    #[error("active window {0} is minimized")]
    ActiveMinimized(WindowId),
    #[error("active window {active} is below visible window {above}")]
    ActiveNotTopmost { active: WindowId, above: WindowId },
    #[error("no active window while {0} is visible")]
    NoActiveWindow(WindowId),
    #[error("window {id} is {width}x{height}, below its floor")]
    BelowMinimum { id: WindowId, width: u16, height: u16 },
}

/// What a pointer press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The press hit no window; it belongs to the desktop underneath.
    Missed,
    Focused(WindowId),
    DragStarted(WindowId),
    ResizeStarted(WindowId),
    Minimized(WindowId),
    Maximized(WindowId),
    Restored(WindowId),
    Closed(WindowId),
}

/// The pointer-exclusive gesture in progress, if any.
#[derive(Debug, Clone)]
enum Interaction {
    Idle,
    Dragging { id: WindowId, drag: HeaderDrag },
    Resizing { id: WindowId, drag: ResizeDrag },
}

impl Interaction {
    fn target(&self) -> Option<&WindowId> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. } | Interaction::Resizing { id, .. } => Some(id),
        }
    }
}

/// Owns every open window, their stacking order and the active window.
///
/// All operations are total: an id that is not open (for example because
/// the window was closed while a timer or gesture referencing it was still
/// in flight) turns the call into a no-op.
#[derive(Debug)]
pub struct WindowManager<C> {
    windows: Vec<WindowEntity<C>>,
    active: Option<WindowId>,
    ids: Box<dyn IdGenerator>,
    config: WmConfig,
    chrome: ChromeLayout,
    interaction: Interaction,
    next_creation: u64,
    revision: u64,
}

impl<C> WindowManager<C> {
    pub fn new(config: WmConfig) -> Self {
        Self::with_id_generator(config, MonotonicIds::new())
    }

    pub fn with_id_generator(config: WmConfig, ids: impl IdGenerator + 'static) -> Self {
        let chrome = ChromeLayout::from_config(&config);
        Self {
            windows: Vec::new(),
            active: None,
            ids: Box::new(ids),
            config,
            chrome,
            interaction: Interaction::Idle,
            next_creation: 0,
            revision: 0,
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn chrome(&self) -> &ChromeLayout {
        &self.chrome
    }

    /// Bumped on every externally visible change; consumers such as the
    /// taskbar recompute their feed when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move to a new containment region (the screen was resized). Maximized
    /// windows refill it; normal windows are clamped back inside.
    pub fn set_containment(&mut self, containment: Rect) {
        if self.config.containment == containment {
            return;
        }
        tracing::debug!(?containment, "containment region changed");
        self.config.containment = containment;
        let full = self.config.maximized_geometry();
        let work_area = self.config.work_area();
        let title_height = self.chrome.title_bar_height;
        for window in &mut self.windows {
            window.state = match window.state {
                WindowState::Maximized { restore, .. } => WindowState::Maximized {
                    geometry: full,
                    restore,
                },
                WindowState::Normal { geometry } => {
                    let position = clamp_position(
                        geometry.position,
                        geometry.size,
                        work_area,
                        window.drag_clamp,
                        title_height,
                    );
                    WindowState::Normal {
                        geometry: Geometry::new(position, geometry.size),
                    }
                }
            };
        }
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Open windows in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowEntity<C>> {
        self.windows.iter()
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowEntity<C>> {
        self.index_of(id).map(|i| &self.windows[i])
    }

    /// The caller-owned payload of a window.
    pub fn content_mut(&mut self, id: &WindowId) -> Option<&mut C> {
        let index = self.index_of(id)?;
        Some(&mut self.windows[index].content)
    }

    pub fn active(&self) -> Option<&WindowId> {
        self.active.as_ref()
    }

    pub fn active_window(&self) -> Option<&WindowEntity<C>> {
        self.active.as_ref().and_then(|id| self.window(id))
    }

    pub fn is_active(&self, id: &WindowId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Every open window from bottom to top, minimized ones included.
    pub fn stacking_order(&self) -> Vec<&WindowEntity<C>> {
        z_order::stacking_order(&self.windows)
            .into_iter()
            .map(|i| &self.windows[i])
            .collect()
    }

    /// Paint order: non-minimized windows from bottom to top.
    pub fn visible_stack(&self) -> Vec<&WindowEntity<C>> {
        self.stacking_order()
            .into_iter()
            .filter(|w| !w.minimized)
            .collect()
    }

    /// Topmost open window of `kind`, matched against logical kind or title.
    pub fn find_by_kind(&self, kind: &str) -> Option<WindowId> {
        z_order::stacking_order(&self.windows)
            .into_iter()
            .rev()
            .map(|i| &self.windows[i])
            .find(|w| w.matches_kind(kind))
            .map(|w| w.id.clone())
    }

    /// Taskbar feed, in creation order so buttons keep their slots.
    pub fn summaries(&self) -> Vec<WindowSummary> {
        self.windows
            .iter()
            .map(|w| WindowSummary {
                id: w.id.clone(),
                title: w.title.clone(),
                is_focused: self.is_active(&w.id),
                is_minimized: w.minimized,
            })
            .collect()
    }

    /// Open a window. A request carrying a logical kind that is already open
    /// focuses the existing window and returns its id instead.
    pub fn open(&mut self, spec: WindowSpec<C>) -> WindowId {
        if let Some(kind) = spec.logical_kind.as_deref()
            && let Some(existing) = self.find_by_kind(kind)
        {
            tracing::debug!(window_id = %existing, kind, "kind already open, focusing it");
            self.focus(&existing);
            return existing;
        }

        let id = self.ids.next_id(spec.logical_kind.as_deref());
        let min_size = spec.min_size.unwrap_or(self.config.min_size);
        let z_index = z_order::claim_top(&mut self.windows);
        let creation_order = self.next_creation;
        self.next_creation += 1;

        let entity = WindowEntity {
            id: id.clone(),
            title: spec.title,
            logical_kind: spec.logical_kind,
            content: spec.content,
            state: WindowState::Normal {
                geometry: Geometry::new(spec.position, spec.size.at_least(min_size)),
            },
            minimized: false,
            z_index,
            resizable: spec.resizable,
            min_size,
            drag_clamp: spec.drag_clamp.unwrap_or(self.config.drag_clamp),
            creation_order,
        };
        tracing::debug!(
            window_id = %id,
            kind = entity.logical_kind.as_deref().unwrap_or("-"),
            z_index,
            "opened window"
        );
        self.windows.push(entity);
        self.revision += 1;
        self.focus(&id);
        id
    }

    /// Remove a window and hand its content back. If it was active, the
    /// highest remaining visible window takes over.
    pub fn close(&mut self, id: &WindowId) -> Option<C> {
        let Some(index) = self.index_of(id) else {
            tracing::trace!(window_id = %id, "close ignored, window not open");
            return None;
        };
        tracing::debug!(window_id = %id, "closing window");
        let removed = self.windows.remove(index);
        self.cancel_interaction_for(id);
        z_order::normalize(&mut self.windows);
        if self.is_active(id) {
            self.select_fallback_focus();
        }
        self.revision += 1;
        Some(removed.content)
    }

    pub fn minimize(&mut self, id: &WindowId) {
        let Some(index) = self.index_of(id) else {
            tracing::trace!(window_id = %id, "minimize ignored, window not open");
            return;
        };
        let window = &mut self.windows[index];
        if window.minimized {
            return;
        }
        // A restore snapshot cannot outlive the maximized state.
        if let WindowState::Maximized { restore, .. } = window.state {
            window.state = WindowState::Normal { geometry: restore };
        }
        window.minimized = true;
        tracing::debug!(window_id = %id, "minimized window");
        self.cancel_interaction_for(id);
        if self.is_active(id) {
            self.select_fallback_focus();
        }
        self.revision += 1;
    }

    /// Same as [`WindowManager::toggle_maximize`]: maximizing an already
    /// maximized window restores it.
    pub fn maximize(&mut self, id: &WindowId) {
        self.toggle_maximize(id);
    }

    pub fn toggle_maximize(&mut self, id: &WindowId) {
        let Some(index) = self.index_of(id) else {
            tracing::trace!(window_id = %id, "maximize ignored, window not open");
            return;
        };
        let window = &mut self.windows[index];
        match window.state {
            WindowState::Maximized { .. } => self.restore(id),
            WindowState::Normal { geometry } => {
                window.state = WindowState::Maximized {
                    geometry: self.config.maximized_geometry(),
                    restore: geometry,
                };
                window.minimized = false;
                tracing::debug!(window_id = %id, "maximized window");
                self.cancel_interaction_for(id);
                self.revision += 1;
                self.focus(id);
            }
        }
    }

    /// Put a maximized window back exactly where it was, then focus it. On a
    /// window that is not maximized this only focuses.
    pub fn restore(&mut self, id: &WindowId) {
        let Some(index) = self.index_of(id) else {
            tracing::trace!(window_id = %id, "restore ignored, window not open");
            return;
        };
        let window = &mut self.windows[index];
        if let WindowState::Maximized { restore, .. } = window.state {
            window.state = WindowState::Normal { geometry: restore };
            tracing::debug!(window_id = %id, "restored window");
            self.revision += 1;
        }
        self.focus(id);
    }

    /// Raise a window to the top and make it active. Focusing a minimized
    /// window brings it back. Redundant calls change nothing.
    pub fn focus(&mut self, id: &WindowId) {
        let Some(index) = self.index_of(id) else {
            tracing::trace!(window_id = %id, "focus ignored, window not open");
            return;
        };
        let mut changed = false;
        if self.windows[index].minimized {
            self.windows[index].minimized = false;
            changed = true;
        }
        changed |= z_order::bring_to_front(&mut self.windows, index);
        if !self.is_active(id) {
            self.active = Some(id.clone());
            changed = true;
        }
        if changed {
            tracing::debug!(
                window_id = %id,
                z_index = self.windows[index].z_index,
                "focused window"
            );
            self.revision += 1;
        }
    }

    /// Raise the bottom-most visible window, so repeated calls walk through
    /// every visible window.
    pub fn cycle_focus(&mut self) {
        let next = z_order::stacking_order(&self.windows)
            .into_iter()
            .find(|&i| !self.windows[i].minimized)
            .map(|i| self.windows[i].id.clone());
        if let Some(id) = next {
            self.focus(&id);
        }
    }

    pub fn set_title(&mut self, id: &WindowId, title: impl Into<String>) {
        if let Some(index) = self.index_of(id) {
            self.windows[index].title = title.into();
            self.revision += 1;
        }
    }

    /// Topmost visible window under `point`.
    pub fn window_at(&self, point: Position) -> Option<&WindowId> {
        self.hit_test(point).map(|(index, _)| &self.windows[index].id)
    }

    /// Route a pointer press to the window chrome under it.
    pub fn pointer_down(&mut self, point: Position) -> PointerOutcome {
        if !matches!(self.interaction, Interaction::Idle) {
            // The release of the previous gesture never arrived.
            self.interaction = Interaction::Idle;
        }
        let Some((index, part)) = self.hit_test(point) else {
            return PointerOutcome::Missed;
        };
        let id = self.windows[index].id.clone();
        match part {
            WindowPart::Close => {
                self.close(&id);
                PointerOutcome::Closed(id)
            }
            WindowPart::Minimize => {
                self.minimize(&id);
                PointerOutcome::Minimized(id)
            }
            WindowPart::Maximize => {
                if self.windows[index].is_maximized() {
                    self.restore(&id);
                    PointerOutcome::Restored(id)
                } else {
                    self.toggle_maximize(&id);
                    PointerOutcome::Maximized(id)
                }
            }
            WindowPart::TitleBar => {
                if self.begin_drag(&id, point) {
                    PointerOutcome::DragStarted(id)
                } else {
                    self.focus(&id);
                    PointerOutcome::Focused(id)
                }
            }
            WindowPart::ResizeHandle => {
                if self.begin_resize(&id, point) {
                    PointerOutcome::ResizeStarted(id)
                } else {
                    self.focus(&id);
                    PointerOutcome::Focused(id)
                }
            }
            WindowPart::Body => {
                self.focus(&id);
                PointerOutcome::Focused(id)
            }
        }
    }

    /// Forward pointer motion to the live gesture. Returns whether anything
    /// moved.
    pub fn pointer_move(&mut self, point: Position) -> bool {
        match self.interaction {
            Interaction::Dragging { .. } => self.drag_to(point),
            Interaction::Resizing { .. } => self.resize_to(point),
            Interaction::Idle => false,
        }
    }

    /// Finish the live gesture. Returns whether one was active.
    pub fn pointer_up(&mut self, point: Position) -> bool {
        match self.interaction {
            Interaction::Dragging { .. } => self.end_drag(point),
            Interaction::Resizing { .. } => self.end_resize(point),
            Interaction::Idle => false,
        }
    }

    /// Window currently being dragged or resized.
    pub fn interaction_target(&self) -> Option<&WindowId> {
        self.interaction.target()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.interaction, Interaction::Resizing { .. })
    }

    pub fn cancel_interaction(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Start a title bar drag. Maximized and minimized windows do not move.
    pub fn begin_drag(&mut self, id: &WindowId, pointer: Position) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let window = &self.windows[index];
        if window.minimized || window.is_maximized() {
            return false;
        }
        let drag = HeaderDrag::new(window.position(), pointer);
        self.focus(id);
        self.interaction = Interaction::Dragging {
            id: id.clone(),
            drag,
        };
        tracing::trace!(window_id = %id, "drag started");
        true
    }

    pub fn drag_to(&mut self, pointer: Position) -> bool {
        let (id, drag) = match &self.interaction {
            Interaction::Dragging { id, drag } => (id.clone(), *drag),
            _ => return false,
        };
        let Some(index) = self.index_of(&id) else {
            self.interaction = Interaction::Idle;
            return false;
        };
        let window = &mut self.windows[index];
        let WindowState::Normal { geometry } = window.state else {
            self.interaction = Interaction::Idle;
            return false;
        };
        let position = drag.position_for(
            pointer,
            geometry.size,
            self.config.work_area(),
            window.drag_clamp,
            self.chrome.title_bar_height,
        );
        if position == geometry.position {
            return false;
        }
        window.state = WindowState::Normal {
            geometry: Geometry::new(position, geometry.size),
        };
        self.revision += 1;
        true
    }

    pub fn end_drag(&mut self, pointer: Position) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.drag_to(pointer);
        if let Some(id) = self.interaction.target() {
            tracing::debug!(
                window_id = %id,
                position = ?self.window(id).map(|w| w.position()),
                "drag committed"
            );
        }
        self.interaction = Interaction::Idle;
        true
    }

    /// Start a resize from the bottom-right handle. Rejected for fixed-size,
    /// maximized and minimized windows.
    pub fn begin_resize(&mut self, id: &WindowId, pointer: Position) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let window = &self.windows[index];
        if !window.resizable || window.minimized || window.is_maximized() {
            tracing::trace!(window_id = %id, "resize rejected");
            return false;
        }
        let drag = ResizeDrag::new(window.size(), pointer);
        self.focus(id);
        self.interaction = Interaction::Resizing {
            id: id.clone(),
            drag,
        };
        tracing::trace!(window_id = %id, "resize started");
        true
    }

    pub fn resize_to(&mut self, pointer: Position) -> bool {
        let (id, drag) = match &self.interaction {
            Interaction::Resizing { id, drag } => (id.clone(), *drag),
            _ => return false,
        };
        let Some(index) = self.index_of(&id) else {
            self.interaction = Interaction::Idle;
            return false;
        };
        let window = &mut self.windows[index];
        let WindowState::Normal { geometry } = window.state else {
            self.interaction = Interaction::Idle;
            return false;
        };
        let size = drag.size_for(pointer, window.min_size);
        if size == geometry.size {
            return false;
        }
        window.state = WindowState::Normal {
            geometry: Geometry::new(geometry.position, size),
        };
        self.revision += 1;
        true
    }

    pub fn end_resize(&mut self, pointer: Position) -> bool {
        if !self.is_resizing() {
            return false;
        }
        self.resize_to(pointer);
        if let Some(id) = self.interaction.target() {
            tracing::debug!(
                window_id = %id,
                size = ?self.window(id).map(|w| w.size()),
                "resize committed"
            );
        }
        self.interaction = Interaction::Idle;
        true
    }

    /// Verify the structural invariants. Meant for tests and debug checks.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut ids = HashSet::new();
        for w in &self.windows {
            if !ids.insert(&w.id) {
                return Err(InvariantViolation::DuplicateId(w.id.clone()));
            }
            if !w.is_maximized()
                && (w.size().width < w.min_size.width || w.size().height < w.min_size.height)
            {
                return Err(InvariantViolation::BelowMinimum {
                    id: w.id.clone(),
                    width: w.size().width,
                    height: w.size().height,
                });
            }
        }
        let order = z_order::stacking_order(&self.windows);
        for pair in order.windows(2) {
            let (a, b) = (&self.windows[pair[0]], &self.windows[pair[1]]);
            if a.z_index == b.z_index {
                return Err(InvariantViolation::DuplicateZIndex {
                    z: a.z_index,
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
        let topmost = z_order::topmost_visible(&self.windows).map(|i| &self.windows[i]);
        match (&self.active, topmost) {
            (None, None) => Ok(()),
            (None, Some(visible)) => Err(InvariantViolation::NoActiveWindow(visible.id.clone())),
            (Some(active), top) => {
                let Some(window) = self.window(active) else {
                    return Err(InvariantViolation::ActiveMissing(active.clone()));
                };
                if window.minimized {
                    return Err(InvariantViolation::ActiveMinimized(active.clone()));
                }
                match top {
                    Some(top) if top.id != *active => Err(InvariantViolation::ActiveNotTopmost {
                        active: active.clone(),
                        above: top.id.clone(),
                    }),
                    _ => Ok(()),
                }
            }
        }
    }

    fn index_of(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == *id)
    }

    fn hit_test(&self, point: Position) -> Option<(usize, WindowPart)> {
        z_order::stacking_order(&self.windows)
            .into_iter()
            .rev()
            .filter(|&i| !self.windows[i].minimized)
            .find_map(|i| {
                let w = &self.windows[i];
                self.chrome
                    .hit_test(w.geometry(), w.resizable, w.is_maximized(), point)
                    .map(|part| (i, part))
            })
    }

    fn select_fallback_focus(&mut self) {
        self.active = z_order::topmost_visible(&self.windows).map(|i| self.windows[i].id.clone());
        match &self.active {
            Some(id) => tracing::debug!(window_id = %id, "focus fell back"),
            None => tracing::debug!("no visible window left to focus"),
        }
    }

    fn cancel_interaction_for(&mut self, id: &WindowId) {
        if self.interaction.target() == Some(id) {
            tracing::trace!(window_id = %id, "dropping gesture on departing window");
            self.interaction = Interaction::Idle;
        }
    }
}
