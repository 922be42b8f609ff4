// src/extractors/linearize.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use scraper::{node::Node, Html};

// Elements whose text is never part of the rendered document.
const NON_RENDERED_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// A parsed filing that can be read back as plain-text lines in reading order.
///
/// Every text node becomes its own line (block and inline boundaries alike), each
/// node is trimmed, and empty lines are dropped. `lines()` can be called any
/// number of times; each call walks the parsed tree from the start.
pub struct LinearDocument {
    html: Html,
}

impl LinearDocument {
    /// Parses raw filing bytes. The bytes must be UTF-8.
    pub fn parse(raw: &[u8]) -> Result<Self, ExtractError> {
        let text = std::str::from_utf8(raw).map_err(|e| {
            ExtractError::MalformedDocument(format!("document is not valid UTF-8: {}", e))
        })?;
        Ok(Self::parse_str(text))
    }

    pub fn parse_str(text: &str) -> Self {
        let html = Html::parse_document(text);
        tracing::debug!("Parsed document ({} bytes, {} parser complaints)", text.len(), html.errors.len());
        Self { html }
    }

    /// Lazily yields the document's lines. No line contains a line-break character.
    ///
    /// Each text node is trimmed as a whole before it is split, so whitespace at the
    /// start of a wrapped line stays part of that line.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Text(text) if is_rendered(node.parent().map(|p| p.value())) => Some(&**text),
                _ => None,
            })
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .flat_map(|text| text.split(is_line_break))
            .filter(|line| !line.is_empty())
    }
}

fn is_rendered(parent: Option<&Node>) -> bool {
    match parent.and_then(Node::as_element) {
        Some(element) => !NON_RENDERED_ELEMENTS.contains(&element.name()),
        None => true,
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}
