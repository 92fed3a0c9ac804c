use std::{collections::HashMap, fmt};

type Handler<P> = Box<dyn FnMut(&P) -> anyhow::Result<()>>;
type ErrorHandler = Box<dyn FnMut(&str, anyhow::Error)>;

/// Identity of a registered handler, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration<P> {
    id: HandlerId,
    once: bool,
    handler: Handler<P>,
}

/// Synchronous, single-threaded publish/subscribe keyed by string.
///
/// Handlers run in registration order. A failing handler never prevents the ones after it from
/// running; its error goes to the error handler, or to the log when there is none.
pub struct EventBus<P> {
    handlers: HashMap<String, Vec<Registration<P>>>,
    next_id: u64,
    on_error: Option<ErrorHandler>,
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        EventBus {
            handlers: HashMap::new(),
            next_id: 0,
            on_error: None,
        }
    }
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus passing handler failures to `on_error` together with the key being emitted.
    pub fn with_error_handler(on_error: impl FnMut(&str, anyhow::Error) + 'static) -> Self {
        EventBus {
            on_error: Some(Box::new(on_error)),
            ..Self::default()
        }
    }

    pub fn on(&mut self, key: impl Into<String>, handler: impl FnMut(&P) -> anyhow::Result<()> + 'static) -> HandlerId {
        self.register(key.into(), false, Box::new(handler))
    }

    /// Registers a handler that is removed right after its first invocation.
    pub fn once(&mut self, key: impl Into<String>, handler: impl FnMut(&P) -> anyhow::Result<()> + 'static) -> HandlerId {
        self.register(key.into(), true, Box::new(handler))
    }

    pub fn off(&mut self, key: &str, id: HandlerId) {
        let Some(registrations) = self.handlers.get_mut(key) else {
            return;
        };

        if let Some(position) = registrations.iter().position(|registration| registration.id == id) {
            registrations.remove(position);
        }

        if registrations.is_empty() {
            self.handlers.remove(key);
        }
    }

    /// Runs every handler registered for `key` and returns how many ran.
    pub fn emit(&mut self, key: &str, payload: &P) -> usize {
        let Some(registrations) = self.handlers.get_mut(key) else {
            return 0;
        };

        for registration in registrations.iter_mut() {
            if let Err(error) = (registration.handler)(payload) {
                match self.on_error.as_mut() {
                    Some(on_error) => on_error(key, error),
                    None => tracing::warn!("handler for `{key}` failed: {error:#}"),
                }
            }
        }

        let invoked = registrations.len();
        registrations.retain(|registration| !registration.once);

        if registrations.is_empty() {
            self.handlers.remove(key);
        }

        invoked
    }

    pub fn handler_count(&self, key: &str) -> usize {
        self.handlers.get(key).map(Vec::len).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn register(&mut self, key: String, once: bool, handler: Handler<P>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        self.handlers.entry(key).or_default().push(Registration { id, once, handler });

        id
    }
}

impl<P> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.handlers.keys().collect::<Vec<_>>();
        keys.sort();

        f.debug_struct("EventBus")
            .field("keys", &keys)
            .field("has_error_handler", &self.on_error.is_some())
            .finish()
    }
}
