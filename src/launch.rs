//! Launchable applications and their singleton-per-kind behaviour.

use std::fmt;

use crate::window::{Position, Size, WindowId, WindowManager, WindowSpec};

type ContentFactory<C> = Box<dyn Fn() -> C>;
type UntitledFactory<C> = Box<dyn Fn(u32) -> C>;

/// How to open one kind of application.
pub struct AppDescriptor<C> {
    pub kind: String,
    pub title: String,
    /// Where the first window lands before cascading.
    pub origin: Position,
    /// Offset applied per launch on both axes.
    pub step: i32,
    pub size: Size,
    pub resizable: bool,
    pub min_size: Option<Size>,
    factory: ContentFactory<C>,
}

impl<C> AppDescriptor<C> {
    pub fn new(kind: impl Into<String>, factory: impl Fn() -> C + 'static) -> Self {
        let kind = kind.into();
        Self {
            title: kind.clone(),
            kind,
            origin: Position::new(100, 80),
            step: 10,
            size: Size::new(300, 200),
            resizable: true,
            min_size: None,
            factory: Box::new(factory),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = Position::new(x, y);
        self
    }

    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
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

    fn spec(&self, launch: u32) -> WindowSpec<C> {
        let offset = self.step.saturating_mul(launch as i32);
        let mut spec = WindowSpec::new(self.title.clone(), (self.factory)())
            .with_kind(self.kind.clone())
            .with_position(
                self.origin.x.saturating_add(offset),
                self.origin.y.saturating_add(offset),
            )
            .with_size(self.size.width, self.size.height)
            .with_resizable(self.resizable);
        if let Some(min) = self.min_size {
            spec = spec.with_min_size(min.width, min.height);
        }
        spec
    }
}

impl<C> fmt::Debug for AppDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("origin", &self.origin)
            .field("step", &self.step)
            .field("size", &self.size)
            .field("resizable", &self.resizable)
            .field("min_size", &self.min_size)
            .finish_non_exhaustive()
    }
}

/// Registered applications plus the "New Window" template. Every launch
/// advances one shared counter that drives cascading placement.
pub struct LaunchRegistry<C> {
    apps: Vec<AppDescriptor<C>>,
    launches: u32,
    untitled_origin: Position,
    untitled_step: i32,
    untitled_size: Size,
    untitled: UntitledFactory<C>,
}

impl<C> LaunchRegistry<C> {
    /// `untitled` builds the content of a "New Window {n}" window.
    pub fn new(untitled: impl Fn(u32) -> C + 'static) -> Self {
        Self {
            apps: Vec::new(),
            launches: 0,
            untitled_origin: Position::new(100, 80),
            untitled_step: 20,
            untitled_size: Size::new(300, 180),
            untitled: Box::new(untitled),
        }
    }

    pub fn with_untitled_layout(mut self, origin: Position, step: i32, size: Size) -> Self {
        self.untitled_origin = origin;
        self.untitled_step = step;
        self.untitled_size = size;
        self
    }

    /// Add an application. A second descriptor for a kind replaces the first.
    pub fn register(&mut self, app: AppDescriptor<C>) {
        if let Some(existing) = self.apps.iter_mut().find(|a| a.kind == app.kind) {
            *existing = app;
        } else {
            self.apps.push(app);
        }
    }

    pub fn with_app(mut self, app: AppDescriptor<C>) -> Self {
        self.register(app);
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(|a| a.kind.as_str())
    }

    pub fn descriptor(&self, kind: &str) -> Option<&AppDescriptor<C>> {
        self.apps.iter().find(|a| a.kind == kind)
    }

    /// Number of windows opened through this registry so far.
    pub fn launches(&self) -> u32 {
        self.launches
    }

    /// Focus the open window of `kind`, or open one. Returns `None` for a
    /// kind nobody registered.
    pub fn launch(&mut self, wm: &mut WindowManager<C>, kind: &str) -> Option<WindowId> {
        if let Some(existing) = wm.find_by_kind(kind) {
            tracing::debug!(window_id = %existing, kind, "already running, focusing");
            wm.focus(&existing);
            return Some(existing);
        }
        let Some(app) = self.apps.iter().find(|a| a.kind == kind) else {
            tracing::warn!(kind, "launch requested for unknown kind");
            return None;
        };
        self.launches += 1;
        let spec = app.spec(self.launches);
        Some(wm.open(spec))
    }

    /// Open a fresh "New Window {n}". These never deduplicate.
    pub fn open_untitled(&mut self, wm: &mut WindowManager<C>) -> WindowId {
        self.launches += 1;
        let n = self.launches;
        let offset = self.untitled_step.saturating_mul(n as i32);
        let spec = WindowSpec::new(format!("New Window {n}"), (self.untitled)(n))
            .with_position(
                self.untitled_origin.x.saturating_add(offset),
                self.untitled_origin.y.saturating_add(offset),
            )
            .with_size(self.untitled_size.width, self.untitled_size.height);
        wm.open(spec)
    }
}

impl<C> fmt::Debug for LaunchRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchRegistry")
            .field("apps", &self.apps)
            .field("launches", &self.launches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WmConfig;

    fn registry() -> LaunchRegistry<String> {
        LaunchRegistry::new(|n| format!("blank {n}"))
            .with_app(
                AppDescriptor::new("Calculator", || "0".to_string())
                    .with_origin(150, 120)
                    .with_size(215, 310)
                    .with_resizable(false),
            )
            .with_app(
                AppDescriptor::new("Resume", || "cv".to_string())
                    .with_title("Resume.txt")
                    .with_origin(180, 140),
            )
    }

    #[test]
    fn launch_cascades_by_shared_counter() {
        let mut wm = WindowManager::new(WmConfig::default());
        let mut apps = registry();
        let calc = apps.launch(&mut wm, "Calculator").unwrap();
        let w = wm.window(&calc).unwrap();
        assert_eq!(w.position(), Position::new(160, 130));
        assert!(!w.is_resizable());
        assert_eq!(w.content(), "0");

        let blank = apps.open_untitled(&mut wm);
        let w = wm.window(&blank).unwrap();
        assert_eq!(w.title(), "New Window 2");
        assert_eq!(w.position(), Position::new(140, 120));
        assert_eq!(w.logical_kind(), None);

        let resume = apps.launch(&mut wm, "Resume").unwrap();
        assert_eq!(wm.window(&resume).unwrap().position(), Position::new(210, 170));
        assert_eq!(wm.window(&resume).unwrap().title(), "Resume.txt");
    }

    #[test]
    fn relaunch_focuses_without_advancing() {
        let mut wm = WindowManager::new(WmConfig::default());
        let mut apps = registry();
        let calc = apps.launch(&mut wm, "Calculator").unwrap();
        let before = wm.window(&calc).unwrap().geometry();
        apps.open_untitled(&mut wm);
        assert_eq!(apps.launch(&mut wm, "Calculator"), Some(calc.clone()));
        assert_eq!(wm.len(), 2);
        assert_eq!(apps.launches(), 2);
        assert_eq!(wm.active(), Some(&calc));
        assert_eq!(wm.window(&calc).unwrap().geometry(), before);
    }

    #[test]
    fn unknown_kind_opens_nothing() {
        let mut wm = WindowManager::new(WmConfig::default());
        let mut apps = registry();
        assert_eq!(apps.launch(&mut wm, "Solitaire"), None);
        assert!(wm.is_empty());
    }

    #[test]
    fn untitled_windows_never_deduplicate() {
        let mut wm = WindowManager::new(WmConfig::default());
        let mut apps = registry();
        let a = apps.open_untitled(&mut wm);
        let b = apps.open_untitled(&mut wm);
        assert_ne!(a, b);
        assert_eq!(wm.len(), 2);
        assert_eq!(wm.window(&b).unwrap().content(), "blank 2");
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut apps = registry();
        apps.register(AppDescriptor::new("Calculator", || "1".to_string()).with_size(400, 400));
        assert_eq!(apps.kinds().collect::<Vec<_>>(), vec!["Calculator", "Resume"]);
        assert_eq!(apps.descriptor("Calculator").unwrap().size, Size::new(400, 400));
    }
}
