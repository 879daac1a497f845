//! Line classification.
//!
//! Every physical line of a config file falls into exactly one of five
//! classes. Classification is purely syntactic and does not depend on what
//! came before:
//!
//! ```text
//! [section-name]          -> SectionHeader
//! item_name = <literal>   -> ItemStart
//! # text  /  ; text       -> Comment
//! (empty or whitespace)   -> Blank
//! anything else           -> Continuation
//! ```

use regex::Regex;
use std::sync::LazyLock;

static SECTION_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[([A-Za-z0-9_-]+)\]\s*$").expect("Invalid section header regex")
});

static ITEM_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)\s*=\s*(.*?)\s*$").expect("Invalid item start regex")
});

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[#;]\s*(.*)$").expect("Invalid comment regex"));

static SECTION_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid section name regex"));

static ITEM_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid item name regex"));

/// The class of a single physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    SectionHeader(&'a str),
    ItemStart { name: &'a str, value: &'a str },
    Comment(&'a str),
    Blank,
    Continuation(&'a str),
}

/// Classifies one line of text.
///
/// # Example
/// ```
/// use gait_config::line::{classify, Line};
///
/// assert_eq!(classify("[general]"), Line::SectionHeader("general"));
/// assert_eq!(
///     classify("timeout = 45"),
///     Line::ItemStart { name: "timeout", value: "45" }
/// );
/// assert_eq!(classify("  2, 3]"), Line::Continuation("2, 3]"));
/// ```
pub fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = SECTION_HEADER_REGEX.captures(line) {
        return Line::SectionHeader(caps.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(caps) = ITEM_START_REGEX.captures(line) {
        return Line::ItemStart {
            name: caps.get(1).map_or("", |m| m.as_str()),
            value: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = COMMENT_REGEX.captures(line) {
        return Line::Comment(caps.get(1).map_or("", |m| m.as_str()));
    }
    if line.trim().is_empty() {
        return Line::Blank;
    }
    Line::Continuation(line.trim())
}

/// Whether `name` can be written as a `[section]` header.
pub fn is_section_name(name: &str) -> bool {
    SECTION_NAME_REGEX.is_match(name)
}

/// Whether `name` can start an item definition.
pub fn is_item_name(name: &str) -> bool {
    ITEM_NAME_REGEX.is_match(name)
}
