mod active_window;
mod config;
mod csv_writer;
mod dispatch;
mod error;
mod events;
mod handler;
mod registry;
mod throttle;
mod window_system;

pub mod handlers;
pub mod x11;

use std::sync::atomic::AtomicBool;

use tracing::warn;

pub use active_window::ActiveWindowResolver;
pub use config::MonitorConfig;
pub use csv_writer::CsvWriter;
pub use dispatch::Dispatcher;
pub use error::{DeskwatchError, DeskwatchResult};
pub use events::{Atom, DesktopEvent, EventKind, EventMask, WindowId};
pub use handler::{EventHandler, HandlerContext};
pub use registry::{HandlerCtor, HandlerRegistry};
pub use throttle::Throttle;
pub use window_system::WindowSystem;

/// Watch the desktop session until `stop` is set.
///
/// Connects to the X server, instantiates every registered handler, runs
/// the dispatch loop, and closes every handler once the loop has ended,
/// whether it ended cleanly or with an error. Close failures are logged
/// and never mask the loop's own result.
pub fn watch(
    config: MonitorConfig,
    registry: &HandlerRegistry,
    stop: &AtomicBool,
) -> DeskwatchResult<()> {
    let ws = x11::X11WindowSystem::connect(config.poll_interval)?;
    let ctx = HandlerContext {
        config_dir: config.config_dir.clone(),
    };
    let handlers = registry.instantiate(&ws, &ctx)?;

    let mut dispatcher = Dispatcher::new(ws, handlers, config);
    let result = dispatcher.run(stop);

    for mut handler in dispatcher.into_handlers() {
        if let Err(err) = handler.close() {
            warn!(handler = handler.name(), error = %err, "close failed");
        }
    }
    result
}
