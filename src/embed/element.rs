//! Minimal HTML element model for embed markup
//!
//! Embeds are built as element trees so the resize listener can find and
//! restyle frames, and serialized to escaped HTML for the host to mount.

use std::fmt::Write as _;

/// An HTML element with classes, attributes, an optional height style,
/// text content and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    height_px: Option<u32>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            height_px: None,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Height applied as an inline `style`.
    pub fn height(&self) -> Option<u32> {
        self.height_px
    }

    pub fn set_height(&mut self, height_px: u32) {
        self.height_px = Some(height_px);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Serialize to HTML with escaped attribute values and text.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(
                out,
                " class=\"{}\"",
                html_escape::encode_double_quoted_attribute(&self.classes.join(" "))
            );
        }
        for (name, value) in &self.attributes {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name,
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        if let Some(height) = self.height_px {
            let _ = write!(out, " style=\"height: {}px\"", height);
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&html_escape::encode_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }

        let _ = write!(out, "</{}>", self.tag);
    }
}
