//! Resolution of the currently focused top-level window.

use tracing::trace;

use crate::error::DeskwatchResult;
use crate::events::{Atom, WindowId};
use crate::window_system::WindowSystem;

/// Turns the window manager's active-window hint into a window handle.
///
/// The hint is the `_NET_ACTIVE_WINDOW` property on the root window
/// (Extended Window Manager Hints). Resolution is done fresh for every
/// dispatch cycle and never cached; any failure yields `None`.
pub struct ActiveWindowResolver {
    net_active_window: Atom,
}

impl ActiveWindowResolver {
    pub fn new(ws: &dyn WindowSystem) -> DeskwatchResult<Self> {
        Ok(Self {
            net_active_window: ws.intern_atom("_NET_ACTIVE_WINDOW")?,
        })
    }

    /// The focused window, or `None` if the hint is missing, zero, or
    /// names a window that no longer exists.
    pub fn resolve(&self, ws: &dyn WindowSystem) -> Option<WindowId> {
        let id = match ws.window_property(ws.root(), self.net_active_window) {
            Ok(Some(id)) => id,
            Ok(None) => return None,
            Err(err) => {
                trace!(error = %err, "active window hint unreadable");
                return None;
            }
        };
        // Zero is the protocol's "no window".
        if id == 0 || !ws.window_exists(id) {
            return None;
        }
        Some(id)
    }
}
