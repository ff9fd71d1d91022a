//! The event loop: demultiplexes window-system events onto handlers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace, warn};

use crate::active_window::ActiveWindowResolver;
use crate::config::MonitorConfig;
use crate::error::DeskwatchResult;
use crate::events::{DesktopEvent, EventKind, EventMask, WindowId};
use crate::handler::EventHandler;
use crate::window_system::WindowSystem;

/// Single-threaded dispatcher over a window system and an ordered set of
/// handlers.
///
/// The combined interest mask is the union of every handler's mask plus
/// substructure notification, so newly created windows can be picked up
/// and masked as well. Handler callbacks for a given event kind always run
/// in registration order, and a failing callback never affects the ones
/// after it.
pub struct Dispatcher<W: WindowSystem> {
    ws: W,
    handlers: Vec<Box<dyn EventHandler>>,
    mask: EventMask,
    cache: HashMap<EventKind, Vec<usize>>,
    config: MonitorConfig,
}

impl<W: WindowSystem> Dispatcher<W> {
    /// Construction is deliberately infallible: the handlers stay owned by
    /// the dispatcher on every failure path, so the process owner can
    /// always run the close pass after [`Self::run`] returns.
    pub fn new(ws: W, handlers: Vec<Box<dyn EventHandler>>, config: MonitorConfig) -> Self {
        let mut mask = EventMask::SUBSTRUCTURE_NOTIFY;
        for handler in &handlers {
            mask |= handler.mask();
        }
        Self {
            ws,
            handlers,
            mask,
            cache: HashMap::new(),
            config,
        }
    }

    /// The union of every handler's mask plus substructure notification.
    pub fn combined_mask(&self) -> EventMask {
        self.mask
    }

    /// Run until `stop` is observed set.
    ///
    /// The flag is checked once per outer iteration, between bursts: an
    /// in-progress drain or idle pass always completes first. Any error
    /// escaping this method means the window-system connection is unusable
    /// and the monitor should shut down.
    pub fn run(&mut self, stop: &AtomicBool) -> DeskwatchResult<()> {
        let resolver = ActiveWindowResolver::new(&self.ws)?;
        self.install_masks()?;

        while !stop.load(Ordering::Acquire) {
            match self.ws.wait_event(self.config.idle_timeout)? {
                Some(event) => {
                    // Drain the whole burst before blocking again.
                    self.dispatch(&resolver, event);
                    while let Some(event) = self.ws.poll_event()? {
                        self.dispatch(&resolver, event);
                    }
                }
                None => self.idle(),
            }
        }
        debug!("stop signal observed, leaving event loop");
        Ok(())
    }

    /// Hand the handlers back to the owner for the close pass. The
    /// dispatcher never calls close itself.
    pub fn into_handlers(self) -> Vec<Box<dyn EventHandler>> {
        self.handlers
    }

    /// The adapter this dispatcher drives.
    pub fn window_system(&self) -> &W {
        &self.ws
    }

    /// Tell the root and every existing child that we care about the
    /// combined mask. Failure here is fatal: without the masks the loop
    /// would wait forever on events the server never sends.
    fn install_masks(&mut self) -> DeskwatchResult<()> {
        let root = self.ws.root();
        self.ws.set_event_mask(root, self.mask)?;
        for child in self.ws.children(root)? {
            self.ws.set_event_mask(child, self.mask)?;
        }
        self.ws.flush()
    }

    fn dispatch(&mut self, resolver: &ActiveWindowResolver, event: DesktopEvent) {
        if let DesktopEvent::Created { window } = event {
            self.on_create_notify(window);
            return;
        }

        let Some(focused) = resolver.resolve(&self.ws) else {
            trace!(event = %event.kind(), "no active window, dropping event");
            return;
        };

        let kind = event.kind();
        if !self.cache.contains_key(&kind) {
            let interested: Vec<usize> = self
                .handlers
                .iter()
                .enumerate()
                .filter(|(_, handler)| handler.subscriptions().contains(&kind))
                .map(|(index, _)| index)
                .collect();
            trace!(event = %kind, handlers = interested.len(), "caching dispatch entry");
            self.cache.insert(kind, interested);
        }

        for index in self.cache[&kind].clone() {
            let handler = &mut self.handlers[index];
            if let Err(err) = handler.handle(&self.ws, &event, focused) {
                warn!(
                    handler = handler.name(),
                    event = %kind,
                    error = %err,
                    "handler failed"
                );
            }
        }
    }

    /// A window was created: extend the combined mask to it so it emits
    /// the events handlers asked for. No handler sees this event.
    fn on_create_notify(&mut self, window: WindowId) {
        let applied = self
            .ws
            .set_event_mask(window, self.mask)
            .and_then(|()| self.ws.flush());
        if let Err(err) = applied {
            // The window may already be gone again.
            debug!(window, error = %err, "could not mask new window");
        }
    }

    fn idle(&mut self) {
        for handler in &mut self.handlers {
            if let Err(err) = handler.idle() {
                warn!(handler = handler.name(), error = %err, "idle hook failed");
            }
        }
    }
}
