//! Card block and title-link text formats
//!
//! The card block field order (`url`, `title`, `description`, `host`,
//! `favicon`, `image`) is read back by downstream renderers and must not
//! change.

use super::LinkMetadata;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt::Write as _;

/// Fence language of card blocks.
pub const CARD_BLOCK_LANGUAGE: &str = "cardlink";

/// Characters YAML would reject or fold inside a quoted scalar.
fn needs_unicode_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}'
        )
}

/// Wrap a value as a YAML double-quoted scalar.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_unicode_escape(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render metadata as a fenced card block, surrounded by newlines.
///
/// `title` and `description` are always quoted; absent optional fields are
/// omitted entirely.
pub fn render_card(metadata: &LinkMetadata) -> String {
    let mut lines = vec![format!("\n```{}", CARD_BLOCK_LANGUAGE)];
    lines.push(format!("url: {}", metadata.url));
    lines.push(format!("title: {}", quote(&metadata.title)));
    if let Some(description) = &metadata.description {
        lines.push(format!("description: {}", quote(description)));
    }
    if let Some(host) = &metadata.host {
        lines.push(format!("host: {}", host));
    }
    if let Some(favicon) = &metadata.favicon {
        lines.push(format!("favicon: {}", favicon));
    }
    if let Some(image) = &metadata.image {
        lines.push(format!("image: {}", image));
    }
    lines.push("```\n".to_string());
    lines.join("\n")
}

/// Replace leading tabs with one space each so YAML accepts the block.
pub(crate) fn normalize_indentation(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let tabs = line.len() - line.trim_start_matches('\t').len();
            format!("{}{}", " ".repeat(tabs), &line[tabs..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Deserialize)]
struct CardFields {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    host: Option<String>,
    favicon: Option<String>,
    image: Option<String>,
}

/// Parse the body of a card block (without fences) back into metadata.
///
/// # Errors
///
/// Returns `Error::BlockParse` for invalid YAML or a missing `url`/`title`.
pub fn parse_card_block(source: &str) -> Result<LinkMetadata> {
    let missing = |field: &str| Error::BlockParse {
        kind: CARD_BLOCK_LANGUAGE,
        message: format!("missing required field `{}`", field),
    };
    if source.trim().is_empty() {
        return Err(missing("url"));
    }

    let fields: Option<CardFields> =
        serde_yaml::from_str(&normalize_indentation(source)).map_err(|e| Error::BlockParse {
            kind: CARD_BLOCK_LANGUAGE,
            message: e.to_string(),
        })?;

    let fields = fields.ok_or_else(|| missing("url"))?;
    let url = fields.url.ok_or_else(|| missing("url"))?;
    let title = fields.title.ok_or_else(|| missing("title"))?;

    Ok(LinkMetadata {
        url,
        title,
        description: fields.description,
        host: fields.host,
        favicon: fields.favicon,
        image: fields.image,
    })
}

/// Strip the fence lines from a rendered card block.
pub fn card_block_body(block: &str) -> Option<&str> {
    let start = block.find(&format!("```{}", CARD_BLOCK_LANGUAGE))?;
    let after_fence = &block[start..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let body_end = body.find("```")?;
    Some(&body[..body_end])
}

/// Escape characters that would end a markdown link label early.
fn escape_link_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

/// Render `[title](url)`.
pub fn render_title_link(title: &str, url: &str) -> String {
    format!("[{}]({})", escape_link_label(title), url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn full_metadata() -> LinkMetadata {
        LinkMetadata {
            url: "https://example.com/page".to_string(),
            title: "Example".to_string(),
            description: Some("A page".to_string()),
            host: Some("example.com".to_string()),
            favicon: Some("https://example.com/favicon.ico".to_string()),
            image: Some("https://example.com/cover.png".to_string()),
        }
    }

    #[test]
    fn test_minimal_card_has_two_fields() {
        let meta = LinkMetadata::new("https://example.com/page", "Example Page");
        assert_eq!(
            render_card(&meta),
            "\n```cardlink\nurl: https://example.com/page\ntitle: \"Example Page\"\n```\n"
        );
    }

    #[test]
    fn test_full_card_field_order() {
        let rendered = render_card(&full_metadata());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "```cardlink",
                "url: https://example.com/page",
                "title: \"Example\"",
                "description: \"A page\"",
                "host: example.com",
                "favicon: https://example.com/favicon.ico",
                "image: https://example.com/cover.png",
                "```",
            ]
        );
    }

    #[test]
    fn test_optional_field_inserts_one_line_in_place() {
        let mut meta = LinkMetadata::new("https://example.com", "T");
        meta.image = Some("https://example.com/i.png".to_string());
        let without_host = render_card(&meta);

        meta.host = Some("example.com".to_string());
        let with_host = render_card(&meta);

        let before: Vec<&str> = without_host.lines().collect();
        let after: Vec<&str> = with_host.lines().collect();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[4], "host: example.com");
        assert_eq!(&after[..4], &before[..4]);
        assert_eq!(&after[5..], &before[4..]);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let meta = LinkMetadata::new("https://example.com", r#"Say "hi" \o/"#);
        let rendered = render_card(&meta);
        assert!(rendered.contains(r#"title: "Say \"hi\" \\o/""#));
    }

    #[test]
    fn test_render_then_parse_is_lossless() {
        let mut meta = full_metadata();
        meta.title = "Quote \" and backslash \\ and\ttab".to_string();
        meta.description = Some("line one\nline two".to_string());

        let rendered = render_card(&meta);
        let body = card_block_body(&rendered).unwrap();
        assert_eq!(parse_card_block(body).unwrap(), meta);
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let meta = LinkMetadata::new("https://example.com", "bell\u{7}x");
        assert!(render_card(&meta).contains(r#"title: "bell\u0007x""#));
    }

    #[test]
    fn test_control_and_separator_characters_survive_parse() {
        for title in [
            "bell\u{7}x",
            "del\u{7f}x",
            "nel\u{85}here",
            "nul\u{0} esc\u{1b}",
            "line\u{2028}para\u{2029}end",
            "bom\u{feff}",
        ] {
            let mut meta = LinkMetadata::new("https://example.com", title);
            meta.description = Some(format!("desc {}", title));

            let rendered = render_card(&meta);
            let body = card_block_body(&rendered).unwrap();
            assert_eq!(parse_card_block(body).unwrap(), meta, "title {:?}", title);
        }
    }

    #[test]
    fn test_parse_tab_indented_block() {
        let source = "url: https://example.com\ntitle: \"T\"\n\t";
        let meta = parse_card_block(source).unwrap();
        assert_eq!(meta.url, "https://example.com");
    }

    #[test]
    fn test_parse_missing_title() {
        let err = parse_card_block("url: https://example.com\n").unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert!(matches!(
            parse_card_block(""),
            Err(Error::BlockParse { .. })
        ));
        assert!(matches!(
            parse_card_block("url: [unclosed"),
            Err(Error::BlockParse { .. })
        ));
    }

    #[test]
    fn test_title_link() {
        assert_eq!(
            render_title_link("Example", "https://example.com"),
            "[Example](https://example.com)"
        );
        assert_eq!(
            render_title_link("[draft] notes", "https://example.com"),
            "[\\[draft\\] notes](https://example.com)"
        );
    }
}
