//! # bindscan
//!
//! Extracts an FFI-oriented model of the declarations in a C, C++ or
//! Objective-C translation unit and streams it, one declaration at a time,
//! to a pluggable output driver.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver          → OutputDriver contract, driver table, JSON driver
//!   ↓
//! extract         → Extraction engine, identity registry, template post-pass
//!   ↓
//! model           → Type / Decl value model handed to drivers
//!   ↓
//! source          → AstProvider + LayoutOracle seams, in-memory unit, targets
//!   ↓
//! base            → SourceLocation, scope ids, reserved names
//! ```
//!
//! `macro_constants` and `config` sit beside this stack.

// ============================================================================
// MODULES (dependency order: base → source → model → extract → driver)
// ============================================================================

/// Foundation types: SourceLocation, ScopeId, reserved names
pub mod base;

/// Front-end seam: AST provider and layout oracle traits, target data
pub mod source;

/// Declaration and type model consumed by drivers
pub mod model;

/// Extraction engine and identity registry
pub mod extract;

/// Output drivers
pub mod driver;

/// Synthesized declarations for object-like macros
pub mod macro_constants;

/// Run configuration
pub mod config;

/// Error types
pub mod error;

use std::io::Write;

use tracing::debug;

pub use config::{ExtractConfig, Language};
pub use driver::{JsonDriver, OutputDriver, available_drivers, make_driver};
pub use error::{ConfigError, ExtractError, LayoutError};
pub use extract::{ExtractSummary, Extraction, Extractor, Registry, extract};
pub use source::{AstProvider, LayoutOracle, NaturalLayout, TargetInfo, TranslationUnit};

/// Extra documents a run can produce beside the declaration stream.
#[derive(Default)]
pub struct SideOutputs<'s> {
    /// Receives synthesized macro constants, with `#define` lines when
    /// `with_macro_defs` is set.
    pub macros: Option<&'s mut dyn Write>,
    /// Receives explicit template instantiations; required when
    /// `template_instantiations` is set.
    pub templates: Option<&'s mut dyn Write>,
}

impl SideOutputs<'_> {
    /// Reject flags that ask for a side output with nowhere to go.
    fn check(&self, config: &ExtractConfig) -> Result<(), ConfigError> {
        if config.with_macro_defs && self.macros.is_none() {
            return Err(ConfigError::Conflict(
                "with-macro-defs needs a macro output".to_string(),
            ));
        }
        if config.template_instantiations && self.templates.is_none() {
            return Err(ConfigError::Conflict(
                "template-instantiations needs a template output".to_string(),
            ));
        }
        Ok(())
    }
}

/// Extract `ast` into `sink` as `config` describes, using natural layout
/// for the configured target.
pub fn run<'w, A: AstProvider>(
    config: &ExtractConfig,
    ast: &A,
    sink: impl Write + 'w,
) -> Result<Extraction, ExtractError> {
    run_with(config, ast, sink, SideOutputs::default())
}

/// [`run`], also writing macro constants and template instantiations to
/// `side`.
///
/// Macro constants are written before extraction starts. Template
/// instantiations are written after it finishes, only when
/// `template_instantiations` is set.
pub fn run_with<'w, A: AstProvider>(
    config: &ExtractConfig,
    ast: &A,
    sink: impl Write + 'w,
    side: SideOutputs<'_>,
) -> Result<Extraction, ExtractError> {
    config.validate()?;
    side.check(config)?;
    let layout = NaturalLayout::new(ast, config.target()?);
    let mut driver = make_driver(&config.driver, Box::new(sink))?;

    if let Some(mut out) = side.macros {
        let written = macro_constants::write_macro_constants(ast.macros(), &mut out, config.with_macro_defs)?;
        debug!(written, "wrote macro constants");
    }

    let extraction = extract(ast, &layout, driver.as_mut(), config.namespace.as_deref())?;

    match side.templates {
        Some(mut out) if config.template_instantiations => {
            let written = extract::write_template_instantiations(ast, &extraction.registry, &mut out)?;
            debug!(written, "wrote template instantiations");
        }
        Some(_) => debug!("template output given without template-instantiations; left empty"),
        None => {}
    }
    Ok(extraction)
}
