//! End-to-end conversion flows through the public API, against a scripted
//! transport and an in-memory document.

use async_trait::async_trait;
use auto_card_embed::convert::CARD_FAILED_NOTICE;
use auto_card_embed::editor::{shared, EditorPosition, SharedEditor, TextDocument};
use auto_card_embed::embed::{embed_block, ERROR_CLASS, SOCIAL_CONTAINER_CLASS};
use auto_card_embed::fetch::{FetchResult, Transport};
use auto_card_embed::host::{InboundMessage, MessageBus, OnlineStatus, RecordingNotifier};
use auto_card_embed::menu::PasteChoice;
use auto_card_embed::{
    AutoCardEmbed, ConversionOutcome, Error, PasteDecision, PasteEvent, Result, Settings,
    UrlCategory,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

const ARTICLE_URL: &str = "https://example.com/article";
const ARTICLE_HTML: &str = r#"<html><head>
  <title>Fallback title</title>
  <meta property="og:title" content="Rust &amp; Markdown">
  <meta property="og:description" content="Cards from links">
  <meta property="og:url" content="https://blog.example.com/article">
  <meta property="og:image" content="/cover.png">
  <link rel="icon" href="/favicon.ico">
</head></html>"#;

const ARTICLE_CARD: &str = "\n```cardlink\n\
url: https://example.com/article\n\
title: \"Rust & Markdown\"\n\
description: \"Cards from links\"\n\
host: blog.example.com\n\
favicon: https://example.com/favicon.ico\n\
image: https://example.com/cover.png\n\
```\n";

// ─────────────────────────────────────────────────────────────────────────────
// Scripted transport
// ─────────────────────────────────────────────────────────────────────────────

/// Serves fixed pages; unknown URLs fail. With a gate, every request waits
/// for one `Notify` permit before answering.
#[derive(Default)]
struct ScriptedTransport {
    pages: HashMap<String, String>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<FetchResult> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.pages.get(url) {
            Some(html) => Ok(FetchResult::new(200, html.clone())),
            None => Err(Error::Http(format!("no route to {}", url))),
        }
    }
}

fn service(transport: ScriptedTransport) -> (AutoCardEmbed, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let service = AutoCardEmbed::new(Settings::default(), Arc::new(transport))
        .with_notifier(notifier.clone())
        .with_connectivity(Arc::new(OnlineStatus::new(true)));
    (service, notifier)
}

/// Yield until the document contains `needle`.
async fn wait_for(editor: &SharedEditor<TextDocument>, needle: &str) {
    loop {
        if editor.lock().await.content().contains(needle) {
            return;
        }
        tokio::task::yield_now().await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flows
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_paste_menu_then_card() {
    let (service, notifier) = service(ScriptedTransport::default().page(ARTICLE_URL, ARTICLE_HTML));
    let editor = shared(TextDocument::new("Reading list:\n"));

    let decision = service.on_paste(&PasteEvent::text(format!("  {}\n", ARTICLE_URL)));
    let (url, menu) = match decision {
        PasteDecision::Intercept {
            url,
            category,
            menu,
        } => {
            assert_eq!(category, UrlCategory::General);
            (url, menu)
        }
        PasteDecision::Default => panic!("URL paste should be intercepted"),
    };
    let choices: Vec<PasteChoice> = menu.iter().map(|item| item.action).collect();
    assert_eq!(
        choices,
        vec![
            PasteChoice::Card,
            PasteChoice::LinkWithTitle,
            PasteChoice::PlainUrl
        ]
    );

    let outcome = service.choose(&editor, &url, PasteChoice::Card).await;

    assert_eq!(outcome, ConversionOutcome::Converted);
    assert_eq!(
        editor.lock().await.content(),
        format!("Reading list:\n{}", ARTICLE_CARD)
    );
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_non_url_and_file_pastes_pass_through() {
    let (service, _) = service(ScriptedTransport::default());
    assert_eq!(
        service.on_paste(&PasteEvent::text("two words")),
        PasteDecision::Default
    );
    assert_eq!(
        service.on_paste(&PasteEvent::text("https://example.com/photo.png")),
        PasteDecision::Default
    );
    assert_eq!(
        service.on_paste(&PasteEvent {
            text: ARTICLE_URL.to_string(),
            has_files: true,
        }),
        PasteDecision::Default
    );
}

#[tokio::test]
async fn test_embed_choice_inserts_block() {
    let (service, _) = service(ScriptedTransport::default());
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    let editor = shared(TextDocument::new(""));

    let outcome = service.choose(&editor, url, PasteChoice::Embed).await;

    assert_eq!(outcome, ConversionOutcome::Inserted);
    assert_eq!(editor.lock().await.content(), embed_block(url));
}

#[tokio::test]
async fn test_edit_during_fetch_is_preserved() {
    let gate = Arc::new(Notify::new());
    let (service, _) = service(
        ScriptedTransport::default()
            .page(ARTICLE_URL, ARTICLE_HTML)
            .gated(gate.clone()),
    );
    let start = "Notes: ".len();
    let editor = shared(TextDocument::with_selection(
        format!("Notes: {}", ARTICLE_URL),
        start,
        start + ARTICLE_URL.len(),
    ));

    let user = async {
        wait_for(&editor, "[Fetching Data#").await;
        editor.lock().await.insert_at(0, "# Inbox\n");
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(service.convert_url_to_card(&editor, ARTICLE_URL), user);

    assert_eq!(outcome, ConversionOutcome::Converted);
    assert_eq!(
        editor.lock().await.content(),
        format!("# Inbox\nNotes: {}", ARTICLE_CARD)
    );
}

#[tokio::test]
async fn test_deleted_placeholder_is_abandoned() {
    let gate = Arc::new(Notify::new());
    let (service, notifier) = service(
        ScriptedTransport::default()
            .page(ARTICLE_URL, ARTICLE_HTML)
            .gated(gate.clone()),
    );
    let editor = shared(TextDocument::new(""));

    let user = async {
        wait_for(&editor, "[Fetching Data#").await;
        editor.lock().await.set_content("rewritten by hand");
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(service.convert_url_to_card(&editor, ARTICLE_URL), user);

    assert_eq!(outcome, ConversionOutcome::Abandoned);
    assert_eq!(editor.lock().await.content(), "rewritten by hand");
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_reverts_to_selection() {
    let (service, notifier) = service(ScriptedTransport::default());
    let editor = shared(TextDocument::with_selection(
        "[docs](https://unreachable.example)",
        0,
        35,
    ));

    let outcome = service
        .convert_url_to_card(&editor, "https://unreachable.example")
        .await;

    assert_eq!(outcome, ConversionOutcome::Reverted);
    assert_eq!(
        editor.lock().await.content(),
        "[docs](https://unreachable.example)"
    );
    assert_eq!(notifier.notices(), vec![CARD_FAILED_NOTICE]);
}

#[tokio::test]
async fn test_enhance_selection_with_mixed_results() {
    let other = "https://example.org/other";
    let (service, notifier) = service(
        ScriptedTransport::default()
            .page(ARTICLE_URL, ARTICLE_HTML)
            .page(other, "<title>Other</title>"),
    );
    let text = format!(
        "- {}\n- [broken](https://down.example)\n- {}\n",
        ARTICLE_URL, other
    );
    let len = text.len();
    let editor = shared(TextDocument::with_selection(text, 0, len));

    let outcomes = service.enhance_selected_url(&editor).await;

    assert_eq!(
        outcomes,
        vec![
            ConversionOutcome::Converted,
            ConversionOutcome::Reverted,
            ConversionOutcome::Converted
        ]
    );
    assert_eq!(
        editor.lock().await.content(),
        format!(
            "- {}\n- [broken](https://down.example)\n- {}\n",
            ARTICLE_CARD,
            "\n```cardlink\nurl: https://example.org/other\ntitle: \"Other\"\n```\n"
        )
    );
    assert_eq!(notifier.notices(), vec![CARD_FAILED_NOTICE]);
}

#[tokio::test]
async fn test_enhance_expands_to_link_under_cursor() {
    let (service, _) = service(ScriptedTransport::default().page(ARTICLE_URL, ARTICLE_HTML));
    let mut doc = TextDocument::new(format!("See [this]({}) for more", ARTICLE_URL));
    doc.set_cursor(EditorPosition::new(0, 7));
    let editor = shared(doc);

    let outcomes = service.enhance_selected_url(&editor).await;

    assert_eq!(outcomes, vec![ConversionOutcome::Converted]);
    assert_eq!(
        editor.lock().await.content(),
        format!("See {} for more", ARTICLE_CARD)
    );
}

#[tokio::test]
async fn test_embed_render_and_resize() {
    let (mut service, _) = service(ScriptedTransport::default());
    let bus = Arc::new(MessageBus::new());
    assert!(service.load(bus.clone()));

    let rendered = service.render_embed("url: https://x.com/someone/status/777", false);
    assert!(rendered.element.has_class(SOCIAL_CONTAINER_CLASS));
    assert_eq!(rendered.frames.len(), 1);

    let resize = |origin: &str, height: f64| {
        InboundMessage::new(
            origin,
            json!({
                "twttr.embed": {
                    "method": "twttr.private.resize",
                    "params": [{ "data": { "tweet_id": "777" }, "height": height }]
                }
            }),
        )
    };

    // Foreign origins are ignored
    bus.dispatch(&resize("https://evil.example", 900.0));
    assert_eq!(service.height_cache().get("777"), None);

    bus.dispatch(&resize("https://platform.twitter.com", 480.4));
    assert_eq!(service.frames().frame_height(rendered.frames[0]), Some(481));
    assert_eq!(service.frames().container_height(rendered.frames[0]), Some(481));
    assert_eq!(service.height_cache().get("777"), Some(481));

    assert_eq!(service.release_embed(&rendered), 1);
    assert!(service.frames().is_empty());

    assert!(service.unload());
    assert_eq!(bus.handler_count(), 0);
}

#[tokio::test]
async fn test_disabled_embed_renders_error() {
    let settings = Settings {
        enable_youtube_embed: false,
        ..Settings::default()
    };
    let service = AutoCardEmbed::new(settings, Arc::new(ScriptedTransport::default()));

    let rendered = service.render_embed("url: https://youtu.be/dQw4w9WgXcQ", false);

    assert!(rendered.element.has_class(ERROR_CLASS));
    assert!(rendered.frames.is_empty());
}
