//! Updating an existing tree from new config text.
//!
//! Only keys present in both trees are touched. Unknown sections and items
//! in the new text are skipped with a warning; the destination never gains
//! or loses a key, and its comments stay as they are.

use crate::error::Result;
use crate::parser::parse;
use crate::tree::ConfigTree;
use std::fmt;

/// A `section.item` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ItemKey {
    pub section: String,
    pub item: String,
}

impl ItemKey {
    pub fn new(section: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.item)
    }
}

/// What an update changed and what it skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<ItemKey>,
    pub unknown_sections: Vec<String>,
    pub unknown_items: Vec<ItemKey>,
}

impl UpdateReport {
    /// True when every key in the source was applied.
    pub fn is_clean(&self) -> bool {
        self.unknown_sections.is_empty() && self.unknown_items.is_empty()
    }
}

/// Update `dest` from config text, returning it for chaining.
///
/// Fails only when `text` does not parse; `dest` is untouched in that case.
///
/// # Example
/// ```
/// use gait_config::{parse, update};
///
/// let mut cfg = parse("[A]\nx = 1\n").unwrap();
/// update(&mut cfg, "[A]\nx = 2\n[B]\ny = 5\n").unwrap();
/// assert_eq!(cfg.value("A", "x").unwrap().as_int(), Some(2));
/// assert!(!cfg.contains_section("B"));
/// ```
pub fn update<'a>(dest: &'a mut ConfigTree, text: &str) -> Result<&'a mut ConfigTree> {
    update_with_report(dest, text)?;
    Ok(dest)
}

/// Like [`update`], returning what was applied and skipped.
pub fn update_with_report(dest: &mut ConfigTree, text: &str) -> Result<UpdateReport> {
    let source = parse(text)?;
    Ok(merge(dest, &source))
}

/// Copy values of keys that exist in both trees from `source` into `dest`.
pub fn merge(dest: &mut ConfigTree, source: &ConfigTree) -> UpdateReport {
    let mut report = UpdateReport::default();

    for (section_name, section) in source.sections() {
        let Some(dest_section) = dest.get_section_mut(section_name) else {
            tracing::warn!(section = %section_name, "Section does not exist, skipping");
            report.unknown_sections.push(section_name.to_string());
            continue;
        };
        for (item_name, item) in section.items() {
            let key = ItemKey::new(section_name, item_name);
            match dest_section.item_mut(item_name) {
                Ok(dest_item) => {
                    dest_item.assign_definition(item);
                    report.updated.push(key);
                }
                Err(_) => {
                    tracing::warn!(item = %key, "Item does not exist, skipping");
                    report.unknown_items.push(key);
                }
            }
        }
    }

    tracing::debug!(
        updated = report.updated.len(),
        skipped = report.unknown_sections.len() + report.unknown_items.len(),
        "Config update applied"
    );
    report
}
