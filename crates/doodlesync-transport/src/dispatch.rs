//! Subscription table keyed by message kind.

use std::collections::HashMap;

use doodlesync_protocol::{Message, MessageKind};

/// A subscriber callback. Runs on the client's driver task, so it must be
/// quick and must not block.
pub type Handler = Box<dyn FnMut(&Message) + Send + 'static>;

/// Token returned by `on`, used to unregister that handler with `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Ordered handler lists per [`MessageKind`].
///
/// Handlers of the same kind run in registration order for every matching
/// message.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<MessageKind, Vec<(HandlerId, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `kind`.
    pub fn on(&mut self, kind: MessageKind, id: HandlerId, handler: Handler) {
        self.handlers.entry(kind).or_default().push((id, handler));
    }

    /// Removes the handler registered under `id` for `kind`. Returns
    /// whether anything was removed.
    pub fn off(&mut self, kind: MessageKind, id: HandlerId) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(h, _)| *h != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(&kind);
        }
        removed
    }

    /// Invokes every handler registered for `message`'s kind. Returns the
    /// number of handlers invoked.
    pub fn dispatch(&mut self, message: &Message) -> usize {
        match self.handlers.get_mut(&message.kind()) {
            Some(list) => {
                for (_, handler) in list.iter_mut() {
                    handler(message);
                }
                list.len()
            }
            None => 0,
        }
    }

    /// Drops every registration.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
