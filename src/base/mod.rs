//! Foundation types shared by every other module.
//!
//! - [`SourceLocation`] - where a declaration was written
//! - [`ScopeId`] - numeric identity of an entity in the identity registry
//! - Reserved names shared with the macro-constant synthesizer
//!
//! This module has NO dependencies on other bindscan modules.

mod position;

pub use position::SourceLocation;

/// Numeric identity assigned by the identity registry.
///
/// `0` is reserved for "no scope" (the global scope, or an entity that
/// never needed an identity).
pub type ScopeId = u32;

/// The id that stands for the global scope.
pub const GLOBAL_SCOPE: ScopeId = 0;

/// Prefix of the synthetic variables the macro-constant synthesizer emits.
///
/// A variable named `__bindscan_FOO` is reported as `FOO`, located at the
/// definition of the macro `FOO`.
pub const MACRO_CONSTANT_PREFIX: &str = "__bindscan_";

/// Strip the macro-constant prefix from a variable name, if present.
pub fn strip_macro_prefix(name: &str) -> Option<&str> {
    name.strip_prefix(MACRO_CONSTANT_PREFIX)
}
