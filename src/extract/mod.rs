//! The extraction engine.
//!
//! [`Extractor`] walks top-level declaration groups in front-end order,
//! recurses into namespaces, `extern "C"` blocks and records, turns each
//! supported declaration into a [`Decl`], and streams it to an
//! [`OutputDriver`] immediately. There is no second pass: a declaration
//! refers to entities written later only through registry ids.
//!
//! Anonymous records never appear on their own at their declaration. When a
//! type refers to one, the record is queued and written just before the
//! declaration that uses it, once.

mod decls;
mod registry;
mod templates;
mod types;

pub use registry::Registry;
pub use templates::write_template_instantiations;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::driver::OutputDriver;
use crate::error::ExtractError;
use crate::model::Decl;
use crate::source::{AstProvider, DeclId, DeclKind, LayoutOracle};

/// Counters for one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Declarations written to the driver.
    pub emitted: usize,
    /// Invalid declarations and typedefs of invalid records.
    pub skipped_invalid: usize,
    /// Anonymous records reached at top level of a scope.
    pub dropped_anonymous: usize,
    /// Named declarations written as unhandled stubs.
    pub unhandled: usize,
}

/// What a finished pass leaves behind.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub summary: ExtractSummary,
    pub registry: Registry,
}

/// Single-pass, streaming declaration extractor.
pub struct Extractor<'a, A, L, D: ?Sized> {
    ast: &'a A,
    layout: &'a L,
    driver: &'a mut D,
    registry: Registry,
    /// Enclosing namespace or record of the declaration being handled.
    scope: Option<DeclId>,
    /// At least one declaration has been written.
    mid: bool,
    /// Canonical declarations already turned into a `Decl`.
    seen: FxHashSet<DeclId>,
    /// Anonymous records referenced but not yet written.
    pending: Vec<DeclId>,
    summary: ExtractSummary,
}

impl<'a, A, L, D> Extractor<'a, A, L, D>
where
    A: AstProvider,
    L: LayoutOracle,
    D: OutputDriver + ?Sized,
{
    pub fn new(ast: &'a A, layout: &'a L, driver: &'a mut D) -> Self {
        Self {
            ast,
            layout,
            driver,
            registry: Registry::new(),
            scope: None,
            mid: false,
            seen: FxHashSet::default(),
            pending: Vec::new(),
            summary: ExtractSummary::default(),
        }
    }

    /// Write the document header and, if given, the namespace announcement.
    pub fn begin(&mut self, namespace: Option<&str>) -> Result<(), ExtractError> {
        self.driver.write_header()?;
        if let Some(ns) = namespace {
            self.driver.write_namespace(ns)?;
        }
        Ok(())
    }

    /// Handle one group of top-level declarations, in order.
    pub fn handle_top_level(&mut self, group: &[DeclId]) -> Result<(), ExtractError> {
        for &decl in group {
            self.handle_decl(decl, None)?;
        }
        Ok(())
    }

    /// Write the footer and hand back the registry and counters.
    pub fn finish(self) -> Result<Extraction, ExtractError> {
        self.driver.write_footer()?;
        debug!(
            emitted = self.summary.emitted,
            skipped_invalid = self.summary.skipped_invalid,
            dropped_anonymous = self.summary.dropped_anonymous,
            unhandled = self.summary.unhandled,
            "extraction finished"
        );
        Ok(Extraction {
            summary: self.summary,
            registry: self.registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn summary(&self) -> ExtractSummary {
        self.summary
    }

    // ========================================================================
    // TRAVERSAL
    // ========================================================================

    fn handle_decl(&mut self, d: DeclId, scope: Option<DeclId>) -> Result<(), ExtractError> {
        let ast = self.ast;
        let node = ast.decl(d);
        if node.is_invalid {
            warn!(name = %node.name, kind = node.kind_name(), "Skipping invalid declaration");
            self.summary.skipped_invalid += 1;
            return Ok(());
        }

        let saved = std::mem::replace(&mut self.scope, scope);
        let result = self.dispatch(d);
        self.scope = saved;
        result
    }

    fn handle_decl_context(&mut self, members: &[DeclId], scope: Option<DeclId>) -> Result<(), ExtractError> {
        for &member in members {
            self.handle_decl(member, scope)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, d: DeclId) -> Result<(), ExtractError> {
        let ast = self.ast;
        let node = ast.decl(d);
        match &node.kind {
            DeclKind::Namespace(ns) => {
                let decl = self.make_namespace(d);
                self.proc(d, Some(decl))?;
                self.handle_decl_context(&ns.members, Some(d))
            }
            DeclKind::LinkageSpec(block) => self.handle_decl_context(&block.members, self.scope),
            DeclKind::Var(var) => {
                let decl = self.make_var(d, var)?;
                self.proc(d, Some(decl))
            }
            DeclKind::Field(_) | DeclKind::IndirectField | DeclKind::Method(_) | DeclKind::FunctionTemplate => {
                trace!(name = %node.name, kind = node.kind_name(), "member handled with its parent");
                Ok(())
            }
            DeclKind::Function(function) => {
                let decl = self.make_function(d, function)?;
                self.proc(d, Some(Decl::Function(decl)))
            }
            DeclKind::Record(record) => {
                let decl = if record.cxx.is_some() {
                    self.make_cxx_record(d, true)?
                } else {
                    self.make_record(d, true)?
                };
                self.proc(d, decl)?;
                self.handle_decl_context(&record.members, Some(d))
            }
            DeclKind::Enum(e) => {
                let decl = self.make_enum(d, e);
                self.proc(d, Some(decl))
            }
            DeclKind::Typedef(typedef) => {
                let decl = self.make_typedef(d, typedef)?;
                self.proc(d, decl)
            }
            DeclKind::TypeAlias(alias) => {
                let decl = self.make_type_alias(d, alias)?;
                self.proc(d, Some(decl))
            }
            DeclKind::TypeAliasTemplate(t) => {
                let decl = self.make_type_alias_template(d, t)?;
                self.proc(d, Some(decl))
            }
            DeclKind::VarTemplate(t) => {
                let decl = self.make_var_template(d, t)?;
                self.proc(d, Some(decl))
            }
            DeclKind::ClassTemplate | DeclKind::ObjCImplementation | DeclKind::ObjCMethod(_) => {
                trace!(name = %node.name, kind = node.kind_name(), "not extracted");
                Ok(())
            }
            DeclKind::Using | DeclKind::UsingShadow | DeclKind::UsingDirective => {
                let decl = self.make_using(d);
                self.proc(d, Some(decl))
            }
            DeclKind::ObjCInterface(iface) => {
                let decl = self.make_objc_interface(d, iface)?;
                self.proc(d, Some(decl))
            }
            DeclKind::ObjCCategory(category) => {
                let decl = self.make_objc_category(d, category)?;
                self.proc(d, Some(decl))
            }
            DeclKind::ObjCProtocol(protocol) => {
                let decl = self.make_objc_protocol(d, protocol)?;
                self.proc(d, Some(decl))
            }
            DeclKind::Other(other) if other.is_named => {
                debug!(name = %node.name, kind = %other.kind_name, "unhandled declaration kind");
                self.summary.unhandled += 1;
                let decl = self.make_unhandled(d, &other.kind_name);
                self.proc(d, Some(decl))
            }
            DeclKind::Other(other) => {
                trace!(kind = %other.kind_name, "skipping unnamed declaration");
                Ok(())
            }
        }
    }

    // ========================================================================
    // EMISSION
    // ========================================================================

    /// Stamp `decl` with its scope and location, then write it.
    fn proc(&mut self, source: DeclId, decl: Option<Decl>) -> Result<(), ExtractError> {
        self.flush_pending()?;
        let Some(mut decl) = decl else {
            return Ok(());
        };

        decl.info_mut().ns = self.registry.add_decl(self.ast, self.scope);
        if decl.info().location.is_empty() {
            decl.info_mut().location = self.location_of(source);
        }

        if self.mid {
            self.driver.write_between()?;
        } else {
            self.mid = true;
        }
        trace!(name = decl.name(), kind = decl.kind_name(), "writing declaration");
        self.driver.write_decl(&decl)?;
        self.summary.emitted += 1;
        Ok(())
    }

    /// Write queued anonymous records ahead of the declaration that needs them.
    fn flush_pending(&mut self) -> Result<(), ExtractError> {
        let pending = std::mem::take(&mut self.pending);
        for record in pending {
            if self.seen.contains(&self.ast.canonical_decl(record)) {
                continue;
            }
            let is_cxx = self
                .ast
                .decl(record)
                .as_record()
                .is_some_and(|r| r.cxx.is_some());
            let decl = if is_cxx {
                self.make_cxx_record(record, false)?
            } else {
                self.make_record(record, false)?
            };
            self.proc(record, decl)?;
        }
        Ok(())
    }

    fn location_of(&self, d: DeclId) -> String {
        self.ast
            .decl(d)
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// Run a whole pass over `ast`: header, every top-level declaration, footer.
pub fn extract<A, L, D>(
    ast: &A,
    layout: &L,
    driver: &mut D,
    namespace: Option<&str>,
) -> Result<Extraction, ExtractError>
where
    A: AstProvider,
    L: LayoutOracle,
    D: OutputDriver + ?Sized,
{
    let mut extractor = Extractor::new(ast, layout, driver);
    extractor.begin(namespace)?;
    extractor.handle_top_level(ast.top_level_decls())?;
    extractor.finish()
}
