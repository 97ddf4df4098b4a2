use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub type ActionHandler = Box<dyn Fn() + Send + Sync>;

/// Registry of callbacks run when a menu action is activated.
///
/// Modules that care about a menu action register a handler for its name at
/// startup; the frontend calls [`ActionHandlers::dispatch`] when the item is
/// activated.
#[derive(Default)]
pub struct ActionHandlers {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers every application needs; `Quit` cancels `shutdown`.
    pub fn with_builtin(shutdown: CancellationToken) -> Self {
        let mut handlers = Self::new();
        handlers.register("Quit", move || {
            info!("Quit requested from menu");
            shutdown.cancel();
        });
        handlers
    }

    /// Register `handler` for `action`, replacing any previous one.
    ///
    /// Returns `true` if a handler was replaced.
    pub fn register(&mut self, action: impl Into<String>, handler: impl Fn() + Send + Sync + 'static) -> bool {
        self.handlers
            .insert(action.into(), Box::new(handler))
            .is_some()
    }

    pub fn lookup(&self, action: &str) -> Option<&ActionHandler> {
        self.handlers.get(action)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Run the handler for `action`. Returns `false` when nothing handles it.
    pub fn dispatch(&self, action: &str) -> bool {
        match self.lookup(action) {
            Some(handler) => {
                debug!(action, "Dispatching menu action");
                handler();
                true
            }
            None => {
                debug!(action, "Unhandled menu action");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
