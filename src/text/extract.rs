//! HTML to plain-text extraction
//!
//! Strips `<script>` and `<style>` subtrees, then normalizes the remaining text:
//! - every line is trimmed
//! - runs separated by two or more spaces become separate lines
//! - blank lines are dropped

use scraper::{ElementRef, Html, Node};

/// Elements whose contents never count as visible text
const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Extracts the visible text from an HTML document
///
/// # Example
///
/// ```
/// use koala::text::extract_text;
///
/// let html = "<html><head><style>p { color: red }</style></head>\
///             <body><p>Hello</p><script>alert(1)</script><p>World</p></body></html>";
/// assert_eq!(extract_text(html), "HelloWorld");
/// ```
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    normalize_whitespace(&raw)
}

/// Appends the text of `element` and its descendants, skipping hidden subtrees
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Trims lines, breaks multi-headlines on double spaces, drops blank chunks
fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
