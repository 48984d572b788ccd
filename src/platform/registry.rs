// ── Per-window event registry ─────────────────────────────────────────────────
//
// The window procedure is a free function; it cannot see the `GlWindow` that
// owns the HWND it was called for.  Instead of stashing an instance pointer in
// the window's user data, it files events here under the window's identity and
// `pump_events` collects them after the message queue has been drained.
//
// Pure Rust so it is testable on every host; the Win32 backend keeps one
// instance per thread.  Message decoding lives here for the same reason.

use std::collections::HashMap;

use super::{SizeKind, WindowEvent};

/// `WM_SIZE` wParam values.
pub(crate) const SIZE_MINIMIZED: usize = 1;
pub(crate) const SIZE_MAXIMIZED: usize = 2;

/// `WM_ACTIVATE` low word when the window is being deactivated.
pub(crate) const WA_INACTIVE: usize = 0;

/// Decode `WM_SIZE`: the new client width and height sit in the low and high
/// words of `lparam`, the kind of change in `wparam`.
pub(crate) fn size_event(wparam: usize, lparam: isize) -> WindowEvent {
    let width = (lparam & 0xFFFF) as i32;
    let height = ((lparam >> 16) & 0xFFFF) as i32;
    let kind = match wparam {
        SIZE_MINIMIZED => SizeKind::Minimized,
        SIZE_MAXIMIZED => SizeKind::Maximized,
        _ => SizeKind::Restored,
    };
    WindowEvent::Resized {
        width,
        height,
        kind,
    }
}

/// Decode `WM_ACTIVATE`; the high word (minimized flag) is ignored.
pub(crate) fn activate_event(wparam: usize) -> WindowEvent {
    WindowEvent::Activated((wparam & 0xFFFF) != WA_INACTIVE)
}

/// Pending events for each tracked window, keyed by the raw window identity.
#[derive(Debug, Default)]
pub(crate) struct EventRegistry {
    queues: HashMap<isize, Vec<WindowEvent>>,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start accepting events for `key`.
    pub(crate) fn track(&mut self, key: isize) {
        self.queues.entry(key).or_default();
    }

    /// Stop accepting events for `key` and drop anything still pending.
    pub(crate) fn untrack(&mut self, key: isize) {
        self.queues.remove(&key);
    }

    #[cfg(test)]
    pub(crate) fn is_tracked(&self, key: isize) -> bool {
        self.queues.contains_key(&key)
    }

    /// File `event` for `key`.  Events for untracked windows are dropped;
    /// returns whether the event was kept.
    pub(crate) fn push(&mut self, key: isize, event: WindowEvent) -> bool {
        match self.queues.get_mut(&key) {
            Some(queue) => {
                queue.push(event);
                true
            }
            None => false,
        }
    }

    /// Move every pending event for `key` to `out`, oldest first.
    pub(crate) fn drain_into(&mut self, key: isize, out: &mut Vec<WindowEvent>) {
        if let Some(queue) = self.queues.get_mut(&key) {
            out.append(queue);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
