//! Social-post frame resize protocol
//!
//! Post frames report their rendered height through cross-frame messages.
//! The listener filters by origin, decodes the vendor payload, resizes
//! every live frame (and its container) showing that post, and remembers
//! the height for the next render.

use super::element::Element;
use super::height_cache::EmbedHeightCache;
use super::social::POST_ID_ATTRIBUTE;
use super::SOCIAL_CONTAINER_CLASS;
use crate::host::{InboundMessage, MessageHandler};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The only origin allowed to resize frames.
pub const RESIZE_ORIGIN: &str = "https://platform.twitter.com";

const RESIZE_METHOD: &str = "twttr.private.resize";

// ─────────────────────────────────────────────────────────────────────────────
// Payload
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "twttr.embed")]
    embed: EmbedPayload,
}

#[derive(Debug, Deserialize)]
struct EmbedPayload {
    method: String,
    #[serde(default)]
    params: Vec<ResizeParams>,
}

#[derive(Debug, Deserialize)]
struct ResizeParams {
    data: ResizeData,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct ResizeData {
    tweet_id: String,
}

/// A decoded resize notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeNotice {
    pub post_id: String,
    /// Height reported by the frame
    pub height: f64,
}

impl ResizeNotice {
    /// Decode a message. `None` for foreign origins, other methods or
    /// malformed payloads.
    pub fn from_message(message: &InboundMessage) -> Option<Self> {
        if message.origin != RESIZE_ORIGIN {
            return None;
        }
        let envelope = Envelope::deserialize(&message.data).ok()?;
        if envelope.embed.method != RESIZE_METHOD {
            return None;
        }
        let params = envelope.embed.params.into_iter().next()?;
        if !params.height.is_finite() || params.post_id_is_empty() {
            return None;
        }
        Some(Self {
            post_id: params.data.tweet_id,
            height: params.height,
        })
    }

    /// Height applied to frames: one pixel more than reported.
    pub fn applied_height(&self) -> u32 {
        (self.height.max(0.0).round() as u32).saturating_add(1)
    }
}

impl ResizeParams {
    fn post_id_is_empty(&self) -> bool {
        self.data.tweet_id.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Live Frames
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a frame mounted in the [`FrameRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone)]
struct MountedFrame {
    post_id: String,
    frame_height: Option<u32>,
    container_height: Option<u32>,
}

/// Social-post frames currently shown by the host.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    next_handle: AtomicU64,
    frames: Mutex<BTreeMap<FrameHandle, MountedFrame>>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the post frames of a social container. Other elements are
    /// ignored and yield no handles.
    pub fn mount(&self, container: &Element) -> Vec<FrameHandle> {
        if !container.has_class(SOCIAL_CONTAINER_CLASS) {
            return Vec::new();
        }

        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        container
            .children()
            .iter()
            .filter(|child| child.tag() == "iframe")
            .filter_map(|frame| {
                let post_id = frame.attr(POST_ID_ATTRIBUTE)?;
                let handle = FrameHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
                frames.insert(
                    handle,
                    MountedFrame {
                        post_id: post_id.to_string(),
                        frame_height: frame.height(),
                        container_height: container.height(),
                    },
                );
                Some(handle)
            })
            .collect()
    }

    /// Forget a frame the host has removed.
    pub fn unmount(&self, handle: FrameHandle) -> bool {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle)
            .is_some()
    }

    /// Set frame and container height for every frame showing `post_id`.
    /// Returns the number of frames updated.
    pub fn apply_height(&self, post_id: &str, height_px: u32) -> usize {
        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = 0;
        for frame in frames.values_mut().filter(|f| f.post_id == post_id) {
            frame.frame_height = Some(height_px);
            frame.container_height = Some(height_px);
            updated += 1;
        }
        updated
    }

    pub fn frame_height(&self, handle: FrameHandle) -> Option<u32> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle)
            .and_then(|f| f.frame_height)
    }

    pub fn container_height(&self, handle: FrameHandle) -> Option<u32> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle)
            .and_then(|f| f.container_height)
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listener
// ─────────────────────────────────────────────────────────────────────────────

/// Applies resize notices to live frames and the height cache.
#[derive(Debug, Clone)]
pub struct ResizeListener {
    heights: Arc<EmbedHeightCache>,
    frames: Arc<FrameRegistry>,
}

impl ResizeListener {
    pub fn new(heights: Arc<EmbedHeightCache>, frames: Arc<FrameRegistry>) -> Self {
        Self { heights, frames }
    }

    /// Handle one inbound message. Returns `true` if any frame was resized.
    ///
    /// The height is cached only when a live frame shows the post.
    pub fn handle(&self, message: &InboundMessage) -> bool {
        let Some(notice) = ResizeNotice::from_message(message) else {
            return false;
        };

        let height = notice.applied_height();
        let updated = self.frames.apply_height(&notice.post_id, height);
        if updated == 0 {
            return false;
        }

        debug!(
            "Resized {} frame(s) for post {} to {}px",
            updated, notice.post_id, height
        );
        self.heights.record(&notice.post_id, height);
        true
    }

    /// Wrap the listener as a message channel handler.
    pub fn into_handler(self) -> MessageHandler {
        Arc::new(move |message: &InboundMessage| {
            self.handle(message);
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
