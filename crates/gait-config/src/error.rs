//! Error types for gait-config

use std::path::PathBuf;

/// Result type for gait-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, accessing or persisting a config
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: continuation outside of an item definition: {text}")]
    LineOutsideDefinition { line: usize, text: String },

    #[error("line {line}: item '{item}' is defined outside of a section")]
    ItemOutsideSection { line: usize, item: String },

    #[error("invalid literal for item '{item}'{}: {reason} (in `{text}`)", line_suffix(.line))]
    InvalidLiteral {
        item: String,
        text: String,
        line: Option<usize>,
        reason: String,
    },

    #[error("line {line}: duplicate definition of '{item}' in section [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        item: String,
    },

    #[error("line {line}: section [{section}] is defined twice")]
    DuplicateSection { line: usize, section: String },

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    #[error("Value has no literal form: {reason}")]
    Unrepresentable { reason: String },

    #[error("Cannot decode {key}: {message}")]
    Decode { key: String, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" on line {line}"),
        None => String::new(),
    }
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// True for errors raised while turning text into a tree.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::LineOutsideDefinition { .. }
                | Self::ItemOutsideSection { .. }
                | Self::InvalidLiteral { .. }
                | Self::DuplicateKey { .. }
                | Self::DuplicateSection { .. }
        )
    }

    /// Line number the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::LineOutsideDefinition { line, .. }
            | Self::ItemOutsideSection { line, .. }
            | Self::DuplicateKey { line, .. }
            | Self::DuplicateSection { line, .. } => Some(*line),
            Self::InvalidLiteral { line, .. } => *line,
            _ => None,
        }
    }
}
