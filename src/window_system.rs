//! Adapter interface to the window system.
//!
//! Everything the dispatcher and the handlers need from X11 goes through
//! this trait, so the core can be driven by a scripted implementation in
//! tests. The only production implementation is [`crate::x11::X11WindowSystem`].

use std::time::Duration;

use crate::error::DeskwatchResult;
use crate::events::{Atom, DesktopEvent, EventMask, WindowId};

pub trait WindowSystem {
    /// The root window, ancestor of all others.
    fn root(&self) -> WindowId;

    /// Direct children of `window`.
    fn children(&self, window: WindowId) -> DeskwatchResult<Vec<WindowId>>;

    /// Ask the server to deliver the masked event classes for `window`.
    fn set_event_mask(&self, window: WindowId, mask: EventMask) -> DeskwatchResult<()>;

    /// Push buffered requests out to the server.
    fn flush(&self) -> DeskwatchResult<()>;

    /// Bounded wait for the next event. Returns `None` on timeout.
    ///
    /// This is the loop's only suspension point; an error here means the
    /// connection is gone.
    fn wait_event(&mut self, timeout: Duration) -> DeskwatchResult<Option<DesktopEvent>>;

    /// Non-blocking check for an already-pending event.
    fn poll_event(&mut self) -> DeskwatchResult<Option<DesktopEvent>>;

    /// Intern `name`, returning its atom.
    fn intern_atom(&self, name: &str) -> DeskwatchResult<Atom>;

    /// Read a 32-bit scalar property off `window`, `None` if unset.
    fn window_property(&self, window: WindowId, property: Atom) -> DeskwatchResult<Option<u32>>;

    /// Whether `window` currently resolves to a live handle.
    fn window_exists(&self, window: WindowId) -> bool;

    /// Window title, preferring the EWMH name over the legacy one.
    fn window_title(&self, window: WindowId) -> Option<String>;

    /// The `(instance, class)` pair from `WM_CLASS`.
    fn window_class(&self, window: WindowId) -> Option<(String, String)>;
}
