//! The in-memory config tree: sections holding items.

use crate::error::{Error, Result};
use crate::line::{is_item_name, is_section_name};
use crate::literal::parse_literal;
use crate::value::Value;
use crate::writer;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// A single named value definition.
///
/// `lines` holds the definition as written: the value text of the first
/// line followed by any stripped continuation lines. Their concatenation
/// always parses to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    name: String,
    lines: Vec<String>,
    value: Value,
    comment: Vec<String>,
}

impl Item {
    /// Create an item from a value, laying out its definition canonically.
    ///
    /// # Example
    /// ```
    /// use gait_config::{Item, Value};
    ///
    /// let item = Item::new("timeout", 45).unwrap();
    /// assert_eq!(item.definition(), "timeout = 45");
    /// assert!(Item::new("bad-name", 1).is_err());
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        if !is_item_name(&name) {
            return Err(Error::InvalidName { kind: "item", name });
        }
        let value = value.into();
        value
            .check_representable()
            .map_err(|reason| Error::Unrepresentable { reason })?;
        let lines = writer::layout_value(&name, &value);
        Ok(Self {
            name,
            lines,
            value,
            comment: Vec::new(),
        })
    }

    /// Builds an item from buffered definition lines, evaluating them.
    pub(crate) fn from_lines(
        name: String,
        lines: Vec<String>,
        line: Option<usize>,
    ) -> Result<Self> {
        let text = lines.concat();
        let value = parse_literal(&text).map_err(|e| Error::InvalidLiteral {
            item: name.clone(),
            text: text.clone(),
            line,
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            lines,
            value,
            comment: Vec::new(),
        })
    }

    pub fn with_comment<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_comment(lines);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the value and regenerate the definition text. The comment
    /// block is left alone.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        value
            .check_representable()
            .map_err(|reason| Error::Unrepresentable { reason })?;
        self.lines = writer::layout_value(&self.name, &value);
        self.value = value;
        Ok(())
    }

    /// Take over another item's definition, keeping this item's comment.
    pub(crate) fn assign_definition(&mut self, other: &Item) {
        self.lines = other.lines.clone();
        self.value = other.value.clone();
    }

    /// Decode the value into any deserializable type.
    ///
    /// # Example
    /// ```
    /// use gait_config::Item;
    ///
    /// let item = Item::new("passband", vec![200, 400]).unwrap();
    /// let band: (u32, u32) = item.get().unwrap();
    /// assert_eq!(band, (200, 400));
    /// ```
    pub fn get<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.to_json()).map_err(|e| Error::Decode {
            key: self.name.clone(),
            message: e.to_string(),
        })
    }

    /// Definition lines as stored (continuation lines without indentation).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The literal text of the value, all lines joined.
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    pub fn is_multiline(&self) -> bool {
        self.lines.len() > 1
    }

    /// The full `name = value` definition with continuation lines aligned.
    pub fn definition(&self) -> String {
        writer::definition_lines(self).join("\n")
    }

    /// Comment lines, joined with newlines.
    pub fn comment(&self) -> String {
        self.comment.join("\n")
    }

    pub fn comment_lines(&self) -> &[String] {
        &self.comment
    }

    pub fn set_comment<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment = split_comment(lines);
    }

    /// First comment line with its first letter upper-cased.
    pub fn description(&self) -> Option<String> {
        describe(&self.comment)
    }
}

/// A named group of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    items: BTreeMap<String, Item>,
    comment: Vec<String>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_comment(lines);
        self
    }

    /// Get an item, failing with `KeyNotFound`.
    pub fn item(&self, name: &str) -> Result<&Item> {
        self.items.get(name).ok_or_else(|| Error::key_not_found(name))
    }

    pub fn item_mut(&mut self, name: &str) -> Result<&mut Item> {
        self.items
            .get_mut(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Result<&Value> {
        self.item(name).map(Item::value)
    }

    /// Set the value of an item, creating the item when it does not exist.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.items.get_mut(name) {
            Some(item) => item.set_value(value),
            None => {
                let item = Item::new(name, value)?;
                self.items.insert(item.name.clone(), item);
                Ok(())
            }
        }
    }

    /// Insert a whole item, returning any item it replaced.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.name.clone(), item)
    }

    pub fn remove(&mut self, name: &str) -> Option<Item> {
        self.items.remove(name)
    }

    /// Items in name order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_multiline_items(&self) -> bool {
        self.items.values().any(Item::is_multiline)
    }

    pub fn comment(&self) -> String {
        self.comment.join("\n")
    }

    pub fn comment_lines(&self) -> &[String] {
        &self.comment
    }

    pub fn set_comment<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment = split_comment(lines);
    }

    pub fn description(&self) -> Option<String> {
        describe(&self.comment)
    }
}

/// The whole parsed config: sections by name.
///
/// # Example
/// ```
/// use gait_config::ConfigTree;
///
/// let tree = ConfigTree::parse("[general]\ntimeout = 45\n").unwrap();
/// assert_eq!(tree.value("general", "timeout").unwrap().as_int(), Some(45));
/// assert!(tree.value("general", "missing").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    sections: BTreeMap<String, Section>,
    trailing_comment: Vec<String>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config text with the default options.
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::parse(text)
    }

    /// Render the tree as canonical text.
    pub fn dump(&self) -> String {
        writer::dump(self)
    }

    /// Update values of existing keys from config text.
    pub fn update(&mut self, text: &str) -> Result<&mut Self> {
        crate::update::update(self, text)
    }

    /// Get a section, failing with `KeyNotFound`.
    pub fn section(&self, name: &str) -> Result<&Section> {
        self.sections
            .get(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Result<&mut Section> {
        self.sections
            .get_mut(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub(crate) fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Insert a section, returning the one it replaced.
    pub fn insert_section(&mut self, name: &str, section: Section) -> Result<Option<Section>> {
        if !is_section_name(name) {
            return Err(Error::InvalidName {
                kind: "section",
                name: name.to_string(),
            });
        }
        Ok(self.sections.insert(name.to_string(), section))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    /// Sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item(&self, section: &str, item: &str) -> Result<&Item> {
        self.section(section)?
            .get(item)
            .ok_or_else(|| Error::key_not_found(format!("{section}.{item}")))
    }

    pub fn value(&self, section: &str, item: &str) -> Result<&Value> {
        self.item(section, item).map(Item::value)
    }

    /// Decode a value into any deserializable type.
    pub fn get<T: DeserializeOwned>(&self, section: &str, item: &str) -> Result<T> {
        self.item(section, item)?
            .get()
            .map_err(|e| match e {
                Error::Decode { message, .. } => Error::Decode {
                    key: format!("{section}.{item}"),
                    message,
                },
                other => other,
            })
    }

    /// Set a value, creating the section and item as needed.
    pub fn set(&mut self, section: &str, item: &str, value: impl Into<Value>) -> Result<()> {
        if let Some(existing) = self.sections.get_mut(section) {
            return existing.set(item, value);
        }
        let new_item = Item::new(item, value)?;
        let mut new_section = Section::new();
        new_section.insert(new_item);
        self.insert_section(section, new_section)?;
        Ok(())
    }

    /// Comment lines found after the last definition.
    pub fn trailing_comment(&self) -> &[String] {
        &self.trailing_comment
    }

    pub fn set_trailing_comment<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailing_comment = split_comment(lines);
    }

    /// All values as a JSON object of objects.
    pub fn to_json(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for (name, section) in &self.sections {
            let items = section
                .items
                .iter()
                .map(|(k, item)| (k.clone(), item.value.to_json()))
                .collect();
            root.insert(name.clone(), serde_json::Value::Object(items));
        }
        serde_json::Value::Object(root)
    }
}

/// One stored line per physical `#` line. Embedded newlines split a line
/// and leading whitespace is dropped, as the parser would drop it.
fn split_comment<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    for line in lines {
        let line: String = line.into();
        out.extend(
            line.split('\n')
                .map(|part| part.trim_end_matches('\r').trim_start().to_string()),
        );
    }
    out
}

fn describe(comment: &[String]) -> Option<String> {
    let first = comment.first()?;
    let mut chars = first.chars();
    let head = chars.next()?;
    Some(head.to_uppercase().chain(chars).collect())
}
