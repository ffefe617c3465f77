//! Clipboard access
//!
//! Manual paste-as-card reads plain text from the clipboard. The system
//! implementation uses the arboard crate.

use crate::error::{Error, Result};
use arboard::Clipboard;
use async_trait::async_trait;
use std::sync::Mutex;

/// Source of clipboard text.
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// Read the clipboard as plain text. An empty clipboard yields `""`.
    async fn read_text(&self) -> Result<String>;
}

/// The operating system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn read_text(&self) -> Result<String> {
        let mut clipboard = Clipboard::new()?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(Error::Clipboard(e.to_string())),
        }
    }
}

/// Clipboard held in memory, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<String>,
}

impl MemoryClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self
            .text
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = text.into();
    }
}

#[async_trait]
impl ClipboardSource for MemoryClipboard {
    async fn read_text(&self) -> Result<String> {
        Ok(self
            .text
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_roundtrip() {
        let clipboard = MemoryClipboard::new("https://example.com");
        assert_eq!(clipboard.read_text().await.unwrap(), "https://example.com");

        clipboard.set_text("");
        assert_eq!(clipboard.read_text().await.unwrap(), "");
    }
}
