//! Error types for configuration, layout queries and extraction.

use thiserror::Error;

/// Problems with the requested run configuration.
///
/// These are detected before any output is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No output driver is registered under the requested name.
    #[error("Unknown driver: {name} (available: {available})")]
    UnknownDriver { name: String, available: String },

    /// Unrecognized language standard.
    #[error("Unknown language standard: {0}")]
    UnknownStandard(String),

    /// The language standard does not apply to the input language.
    #[error("Language standard {std} is not valid for {language}")]
    StandardMismatch { std: String, language: String },

    /// Unrecognized source language name.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// The target triple could not be turned into target data.
    #[error("Invalid target {triple}: {message}")]
    InvalidTarget { triple: String, message: String },

    /// Two requested outputs cannot be produced together.
    #[error("Conflicting output configuration: {0}")]
    Conflict(String),

    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create an invalid target error.
    pub fn invalid_target(triple: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            triple: triple.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// A layout oracle could not answer a size, alignment or offset query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The type has no layout (function types, `void`).
    #[error("Type has no layout: {0}")]
    NoLayout(String),

    /// The record has no definition.
    #[error("Record is incomplete: {0}")]
    Incomplete(String),

    /// The size in bits does not fit in a `u64`.
    #[error("Type is too large: {0}")]
    TooLarge(String),

    /// The type depends on a template parameter.
    #[error("Type is dependent: {0}")]
    Dependent(String),

    /// The base is not a (virtual) base of the record.
    #[error("{base} is not a base of {record}")]
    NotABase { record: String, base: String },

    /// The layout does not cover a field the record declares.
    #[error("No offset for field {index} of {record}")]
    MissingField { record: String, index: usize },

    /// The record contains itself by value.
    #[error("Record contains itself: {0}")]
    Recursive(String),
}

/// Fatal errors during an extraction pass.
///
/// Per-declaration problems (invalid declarations, typedefs of invalid
/// records) are not errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A layout query failed for a type that must have a layout.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The output sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
