//! The extracted declaration and type model.
//!
//! This is what output drivers consume. It is independent of any front-end:
//! types are value trees, cross-references are registry ids, and locations
//! are plain strings.

mod decl;
mod template;
mod types;

pub use decl::*;
pub use template::{TemplateArg, TemplateArgs};
pub use types::*;
