//! Config text parser.
//!
//! Lines are classified one at a time and fed to an accumulator that
//! buffers item definitions until a boundary closes them. A definition
//! spans contiguous continuation lines; a section header, a new item, a
//! comment or a blank line ends it. Comment lines are collected and
//! attached to the next section or item.
//!
//! Parsing is all-or-nothing: the tree is only handed out once every line
//! has been consumed without error.

use crate::error::{Error, Result};
use crate::line::{Line, classify};
use crate::tree::{ConfigTree, Item, Section};

/// What to do when a section or item name appears twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Fail with `DuplicateKey` / `DuplicateSection`.
    #[default]
    Reject,
    /// The later definition replaces the earlier one.
    Overwrite,
}

/// Options for [`parse_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

/// Parse config text with the default options.
///
/// # Example
/// ```
/// use gait_config::parse;
///
/// let tree = parse("# lab settings\n[general]\n# nexus path\nnexus_path = 'C:/Vicon'\n").unwrap();
/// let item = tree.item("general", "nexus_path").unwrap();
/// assert_eq!(item.value().as_str(), Some("C:/Vicon"));
/// assert_eq!(item.description().as_deref(), Some("Nexus path"));
/// ```
pub fn parse(text: &str) -> Result<ConfigTree> {
    parse_with(text, &ParseOptions::default())
}

/// Parse config text.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<ConfigTree> {
    let mut acc = Accumulator::new(options);
    let mut count = 0;
    for (idx, line) in text.lines().enumerate() {
        acc.feed(idx + 1, classify(line))?;
        count += 1;
    }
    let tree = acc.finish()?;
    tracing::debug!(lines = count, sections = tree.len(), "Parsed config");
    Ok(tree)
}

/// An item whose definition is still being collected.
struct OpenItem {
    name: String,
    line: usize,
    lines: Vec<String>,
    comment: Vec<String>,
}

struct Accumulator<'o> {
    options: &'o ParseOptions,
    tree: ConfigTree,
    current_section: Option<String>,
    open: Option<OpenItem>,
    pending_comment: Vec<String>,
}

impl<'o> Accumulator<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            tree: ConfigTree::new(),
            current_section: None,
            open: None,
            pending_comment: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: Line<'_>) -> Result<()> {
        match line {
            Line::SectionHeader(name) => {
                self.close_item()?;
                self.open_section(line_no, name)
            }
            Line::ItemStart { name, value } => {
                self.close_item()?;
                self.open_item(line_no, name, value)
            }
            Line::Comment(text) => {
                self.close_item()?;
                self.pending_comment.push(text.to_string());
                Ok(())
            }
            Line::Blank => self.close_item(),
            Line::Continuation(text) => match self.open.as_mut() {
                Some(open) => {
                    open.lines.push(text.to_string());
                    Ok(())
                }
                None => Err(Error::LineOutsideDefinition {
                    line: line_no,
                    text: text.to_string(),
                }),
            },
        }
    }

    fn open_section(&mut self, line_no: usize, name: &str) -> Result<()> {
        if self.tree.contains_section(name)
            && self.options.duplicate_keys == DuplicateKeyPolicy::Reject
        {
            return Err(Error::DuplicateSection {
                line: line_no,
                section: name.to_string(),
            });
        }
        let section = Section::new().with_comment(std::mem::take(&mut self.pending_comment));
        self.tree.insert_section(name, section)?;
        self.current_section = Some(name.to_string());
        Ok(())
    }

    fn open_item(&mut self, line_no: usize, name: &str, value: &str) -> Result<()> {
        let Some(section_name) = self.current_section.as_deref() else {
            return Err(Error::ItemOutsideSection {
                line: line_no,
                item: name.to_string(),
            });
        };
        let duplicate = self
            .tree
            .get_section(section_name)
            .is_some_and(|s| s.contains(name));
        if duplicate && self.options.duplicate_keys == DuplicateKeyPolicy::Reject {
            return Err(Error::DuplicateKey {
                line: line_no,
                section: section_name.to_string(),
                item: name.to_string(),
            });
        }
        self.open = Some(OpenItem {
            name: name.to_string(),
            line: line_no,
            lines: vec![value.to_string()],
            comment: std::mem::take(&mut self.pending_comment),
        });
        Ok(())
    }

    /// Evaluate the open item, if any, and add it to the current section.
    fn close_item(&mut self) -> Result<()> {
        let Some(open) = self.open.take() else {
            return Ok(());
        };
        let item = Item::from_lines(open.name, open.lines, Some(open.line))?
            .with_comment(open.comment);
        let section = self
            .current_section
            .as_deref()
            .and_then(|name| self.tree.get_section_mut(name))
            .ok_or_else(|| Error::ItemOutsideSection {
                line: open.line,
                item: item.name().to_string(),
            })?;
        section.insert(item);
        Ok(())
    }

    fn finish(mut self) -> Result<ConfigTree> {
        self.close_item()?;
        self.tree.set_trailing_comment(std::mem::take(&mut self.pending_comment));
        Ok(self.tree)
    }
}
