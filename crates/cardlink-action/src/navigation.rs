//! Host window capabilities: history, new browsing contexts, and the
//! `location-changed` notification that tells the frontend router to react.

use serde::Serialize;

use crate::signal::{emit, SignalTarget, LOCATION_CHANGED};

/// The top-level window the dashboard runs in.
pub trait HostWindow: SignalTarget {
    /// Append `path` to the session history.
    fn push_state(&self, path: &str);

    /// Replace the current history entry with `path`.
    fn replace_state(&self, path: &str);

    /// Open `url` in a new browsing context.
    fn open_window(&self, url: &str);
}

#[derive(Serialize)]
struct LocationChanged {
    replace: bool,
}

/// Move the frontend to `path` and announce it on the window.
pub fn navigate<W: HostWindow + ?Sized>(window: &W, path: &str, replace: bool) {
    if replace {
        window.replace_state(path);
    } else {
        window.push_state(path);
    }
    tracing::debug!(path = %path, replace, "Navigated");
    emit(window, LOCATION_CHANGED, Some(&LocationChanged { replace }), None);
}
