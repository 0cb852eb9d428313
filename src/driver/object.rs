//! Ordered JSON object members.

use std::fmt::Display;

/// A JSON string literal for `text`, quoted and escaped.
pub(super) fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Key/value pairs of one JSON object, in output order.
///
/// Values are rendered when added; nested values (types, lists) are written
/// by the driver after a bare key instead.
#[derive(Debug, Default)]
pub(super) struct Members {
    pairs: Vec<(&'static str, String)>,
}

impl Members {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// A number or literal, written as-is.
    pub(super) fn raw(mut self, key: &'static str, value: impl Display) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub(super) fn quoted(mut self, key: &'static str, value: &str) -> Self {
        self.pairs.push((key, quote(value)));
        self
    }

    pub(super) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `, "key": value` for every pair.
    pub(super) fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.pairs {
            out.push_str(", \"");
            out.push_str(key);
            out.push_str("\": ");
            out.push_str(value);
        }
        out
    }
}
