//! Cross-frame message channel
//!
//! Embedded frames post untrusted messages back to the host page. Handlers
//! subscribe to a channel and receive every inbound message; filtering by
//! origin is up to the handler.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A message posted by an embedded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Origin of the sending frame, e.g. `https://platform.twitter.com`
    pub origin: String,
    pub data: Value,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Handle to a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub type MessageHandler = Arc<dyn Fn(&InboundMessage) + Send + Sync>;

/// Registration surface for inbound message handlers.
pub trait MessageChannel: Send + Sync {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId;

    /// Remove a handler. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-process message channel that dispatches synchronously.
#[derive(Default)]
pub struct MessageBus {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<SubscriptionId, MessageHandler>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message to every current handler.
    pub fn dispatch(&self, message: &InboundMessage) {
        // Snapshot so handlers may (un)subscribe while running
        let handlers: Vec<MessageHandler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for handler in handlers {
            handler(message);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl MessageChannel for MessageBus {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handler);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
