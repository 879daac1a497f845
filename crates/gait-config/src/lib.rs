//! Comment-preserving config engine for the gait lab toolkit
//!
//! Parses an INI-like format with typed literal values into a tree of
//! sections and items, writes it back in canonical form, and updates an
//! existing tree from new text without adding or removing keys.
//!
//! ```text
//! # lab settings
//! [general]
//! # nexus path
//! nexus_path = "C:/Vicon"
//! emg_passband = [10,
//!                 400]
//! ```
//!
//! Values are literals only: numbers, strings, `True`/`False`, and nested
//! lists, tuples and dicts. Nothing in a config file is ever executed.

pub mod error;
pub mod io;
pub mod line;
pub mod literal;
pub mod loader;
pub mod parser;
pub mod tree;
pub mod update;
pub mod value;
pub mod writer;

pub use error::{Error, Result};
pub use literal::{LiteralError, parse_literal};
pub use loader::{ConfigLoader, LoadedConfig};
pub use parser::{DuplicateKeyPolicy, ParseOptions, parse, parse_with};
pub use tree::{ConfigTree, Item, Section};
pub use update::{ItemKey, UpdateReport, merge, update, update_with_report};
pub use value::Value;
pub use writer::{canonicalize, dump};
