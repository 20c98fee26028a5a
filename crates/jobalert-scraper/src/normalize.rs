//! Text normalization for posting descriptions.

use scraper::{Html, Node};

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Converts rendered markup into matchable text: tags stripped, hidden element
/// content dropped, whitespace collapsed to single spaces, lower-cased.
///
/// Plain text input passes through with only whitespace and case normalized.
#[must_use]
pub fn normalize_description(markup: &str) -> String {
    let document = Html::parse_document(markup);

    let mut pieces: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            pieces.push(text);
        }
    }

    collapse_whitespace(&pieces.join(" ")).to_lowercase()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
