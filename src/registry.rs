//! Compiled-in handler registry.
//!
//! The original design discovered handlers by importing a plugin tree at
//! runtime; here the built-in handlers are a static list and user handlers
//! are added through an explicit registration call before the loop starts.

use tracing::{debug, warn};

use crate::error::{DeskwatchError, DeskwatchResult};
use crate::handler::{EventHandler, HandlerContext};
use crate::window_system::WindowSystem;

/// Constructs one handler instance.
pub type HandlerCtor =
    fn(&dyn WindowSystem, &HandlerContext) -> DeskwatchResult<Box<dyn EventHandler>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Builtin,
    User,
}

struct Registration {
    name: &'static str,
    ctor: HandlerCtor,
    origin: Origin,
}

/// Append-only, ordered list of handler constructors.
///
/// Registration order is invocation order for every event type: a
/// deterministic scheduling decision, not a priority system. There is no
/// removal.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<Registration>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in handler registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("activity", crate::handlers::activity::ActivityRecorder::create);
        registry
    }

    /// Register a built-in handler. A construction failure of a built-in
    /// aborts startup.
    pub fn register(&mut self, name: &'static str, ctor: HandlerCtor) {
        self.entries.push(Registration {
            name,
            ctor,
            origin: Origin::Builtin,
        });
    }

    /// Register a user handler. Construction is best-effort: a failure is
    /// logged and the handler skipped.
    pub fn register_user(&mut self, name: &'static str, ctor: HandlerCtor) {
        self.entries.push(Registration {
            name,
            ctor,
            origin: Origin::User,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered handler names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Construct every registered handler, preserving registration order.
    pub fn instantiate(
        &self,
        ws: &dyn WindowSystem,
        ctx: &HandlerContext,
    ) -> DeskwatchResult<Vec<Box<dyn EventHandler>>> {
        let mut handlers = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match (entry.ctor)(ws, ctx) {
                Ok(handler) => {
                    debug!(handler = entry.name, "handler initialized");
                    handlers.push(handler);
                }
                Err(err) if entry.origin == Origin::User => {
                    warn!(handler = entry.name, error = %err, "skipping user handler");
                }
                Err(err) => {
                    return Err(DeskwatchError::HandlerInit {
                        name: entry.name,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(handlers)
    }
}
