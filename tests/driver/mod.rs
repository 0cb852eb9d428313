//! Output driver tests
//!
//! - JSON documents produced by whole extraction runs
//! - Driver table lookup and the configured entry point

pub mod tests_json_document;
