//! Host collaborators
//!
//! Small seams to the surrounding application: transient notices, the
//! online/offline status, clipboard access and the cross-frame message
//! channel.

mod clipboard;
mod messages;

pub use clipboard::{ClipboardSource, MemoryClipboard, SystemClipboard};
pub use messages::{InboundMessage, MessageBus, MessageChannel, MessageHandler, SubscriptionId};

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

// ─────────────────────────────────────────────────────────────────────────────
// Notices
// ─────────────────────────────────────────────────────────────────────────────

/// Shows short transient messages to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

/// Notifier that keeps every notice, for inspection by headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connectivity
// ─────────────────────────────────────────────────────────────────────────────

/// Reports whether the host currently has network access.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity flag toggled by the host.
#[derive(Debug)]
pub struct OnlineStatus(AtomicBool);

impl OnlineStatus {
    pub fn new(online: bool) -> Self {
        Self(AtomicBool::new(online))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Default for OnlineStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for OnlineStatus {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
