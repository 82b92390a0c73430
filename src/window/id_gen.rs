use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::WindowId;

/// Supplies ids for newly opened windows.
pub trait IdGenerator: fmt::Debug {
    fn next_id(&mut self, kind: Option<&str>) -> WindowId;
}

/// Counter owned by a single window manager. Ids restart at 1 for every new
/// instance, which keeps tests independent of each other.
#[derive(Debug, Default, Clone)]
pub struct MonotonicIds {
    last: u64,
}

impl MonotonicIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for MonotonicIds {
    fn next_id(&mut self, kind: Option<&str>) -> WindowId {
        self.last += 1;
        format_id(kind, self.last)
    }
}

static GLOBAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-wide counter shared by every manager using it, so ids stay unique
/// across several desktops in one process.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalIds;

impl IdGenerator for GlobalIds {
    fn next_id(&mut self, kind: Option<&str>) -> WindowId {
        let n = GLOBAL_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        format_id(kind, n)
    }
}

/// Rewind the process-wide counter. Only meant for tests.
pub fn reset_global_ids() {
    GLOBAL_COUNTER.store(0, Ordering::Relaxed);
}

fn format_id(kind: Option<&str>, n: u64) -> WindowId {
    WindowId::new(format!("{}-{}", kind_slug(kind), n))
}

/// Kebab-case form of a logical kind: `"Resume Viewer"` -> `resume-viewer`.
pub fn kind_slug(kind: Option<&str>) -> String {
    let Some(kind) = kind else {
        return "new-window".to_string();
    };
    let mut slug = String::with_capacity(kind.len());
    let mut pending_dash = false;
    for ch in kind.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "window".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_ids_are_prefixed_and_increasing() {
        let mut ids = MonotonicIds::new();
        assert_eq!(ids.next_id(Some("Calculator")).as_str(), "calculator-1");
        assert_eq!(ids.next_id(None).as_str(), "new-window-2");
        assert_eq!(ids.next_id(Some("Calculator")).as_str(), "calculator-3");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(kind_slug(Some("Resume  Viewer")), "resume-viewer");
        assert_eq!(kind_slug(Some("--Notepad!")), "notepad");
        assert_eq!(kind_slug(Some("???")), "window");
    }

    #[test]
    fn global_ids_reset_rewinds() {
        // Other tests in this binary never touch the global counter.
        reset_global_ids();
        let mut a = GlobalIds;
        let mut b = GlobalIds;
        assert_eq!(a.next_id(None).as_str(), "new-window-1");
        assert_eq!(b.next_id(Some("Notepad")).as_str(), "notepad-2");
        reset_global_ids();
        assert_eq!(a.next_id(None).as_str(), "new-window-1");
    }
}
