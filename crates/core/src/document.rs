//! Plain-text extraction from rich-document JSON trees.
//!
//! Section content is stored as a nested editor document (paragraphs,
//! headings, marks) whose leaves carry a `text` field. Diffing compares the
//! flattened text, not the tree, so two structurally different documents
//! with the same visible text must extract to equal strings.

use serde_json::Value;

/// Extract plain text from a rich-document JSON tree.
///
/// Walks the tree depth-first in document order and collects every string
/// `text` leaf, joined with newlines. Documents with no recognizable
/// text-bearing structure fall back to their canonical JSON serialization
/// so that a deterministic string is always produced for comparison.
/// `None` content extracts to the empty string.
pub fn extract_text(content: Option<&Value>) -> String {
    let Some(value) = content else {
        return String::new();
    };
    if value.is_null() {
        return String::new();
    }

    let mut texts: Vec<&str> = Vec::new();
    walk(value, &mut texts);

    if texts.is_empty() {
        // serde_json::Map is BTreeMap-backed, so serialization is already
        // canonical (sorted keys) at every nesting level.
        value.to_string()
    } else {
        texts.join("\n")
    }
}

fn walk<'a>(node: &'a Value, texts: &mut Vec<&'a str>) {
    match node {
        Value::Array(items) => {
            for item in items {
                walk(item, texts);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                texts.push(text);
            }
            if let Some(children) = map.get("content") {
                walk(children, texts);
            }
        }
        _ => {}
    }
}
