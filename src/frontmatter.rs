//! Best-effort extraction of the front-matter header from a source document.
//!
//! A document may begin with a fenced metadata block:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2024-01-01
//! ---
//! # Hello
//! ```
//!
//! Block lines are split on the first `:`; both halves are trimmed. Lines
//! without a `:` are skipped. A document without a well-formed block is
//! treated as having no metadata at all, with the full input as the body.
//! Parsing never fails.

use std::collections::HashMap;

/// The metadata mapping extracted from a document's header block. Keys are
/// free-form; the builder recognizes `title`, `date`, `slug`, and `excerpt`.
pub type FrontMatter = HashMap<String, String>;

const OPEN_FENCE: &str = "---\n";
const CLOSE_FENCE: &str = "\n---\n";

/// Splits a source document into its front-matter mapping and body. The body
/// is everything after the closing fence's trailing newline, unchanged.
pub fn parse(raw: &str) -> (FrontMatter, &str) {
    let mut meta = FrontMatter::new();

    let rest = match raw.strip_prefix(OPEN_FENCE) {
        Some(rest) => rest,
        None => return (meta, raw),
    };

    let (block, body) = match rest.find(CLOSE_FENCE) {
        Some(i) => (&rest[..i], &rest[i + CLOSE_FENCE.len()..]),
        None => return (meta, raw),
    };

    for line in block.lines() {
        if let Some((key, value)) = line.split_once(':') {
            meta.insert(key.trim().to_owned(), value.trim().to_owned());
        }
    }

    (meta, body)
}
