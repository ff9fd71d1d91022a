//! Handler capability contract.

use std::path::PathBuf;

use crate::error::DeskwatchResult;
use crate::events::{DesktopEvent, EventKind, EventMask, WindowId};
use crate::window_system::WindowSystem;

/// Shared context handed to handler constructors.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Directory a handler may keep its data under.
    pub config_dir: PathBuf,
}

/// A consumer of desktop events.
///
/// Handlers declare the event classes they want delivered ([`Self::mask`])
/// and the event kinds they consume ([`Self::subscriptions`]); the
/// dispatcher only ever calls [`Self::handle`] for subscribed kinds, with
/// the active window already resolved. Hooks run on the loop thread, so
/// they must not block for long.
pub trait EventHandler {
    /// Stable name used in log output.
    fn name(&self) -> &'static str;

    /// Event classes the window system should deliver for this handler.
    fn mask(&self) -> EventMask {
        EventMask::EMPTY
    }

    /// Event kinds this handler consumes.
    fn subscriptions(&self) -> &'static [EventKind];

    /// Called once per subscribed event, with the currently focused window.
    fn handle(
        &mut self,
        ws: &dyn WindowSystem,
        event: &DesktopEvent,
        focused: WindowId,
    ) -> DeskwatchResult<()>;

    /// Called when the event wait times out with nothing pending.
    fn idle(&mut self) -> DeskwatchResult<()> {
        Ok(())
    }

    /// Called exactly once, by the process owner, at shutdown.
    fn close(&mut self) -> DeskwatchResult<()> {
        Ok(())
    }
}
