//! Identity registry: stable numeric ids for scopes and records.
//!
//! Ids are handed out on first request, starting at 1, and keyed by the
//! canonical declaration so every redeclaration of an entity shares one id.
//! `0` always means "global scope / none".

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::base::{GLOBAL_SCOPE, ScopeId};
use crate::source::{AstProvider, DeclId};

#[derive(Debug, Clone)]
pub struct Registry {
    ids: FxHashMap<DeclId, ScopeId>,
    next: ScopeId,
    /// C++ declarations in first-registration order.
    cxx_decls: IndexSet<DeclId>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            next: 1,
            cxx_decls: IndexSet::new(),
        }
    }

    /// Id for `decl`, assigning the next one on first request.
    pub fn add_decl(&mut self, ast: &impl AstProvider, decl: Option<DeclId>) -> ScopeId {
        let Some(decl) = decl else {
            return GLOBAL_SCOPE;
        };
        let canonical = ast.canonical_decl(decl);
        if let Some(&id) = self.ids.get(&canonical) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        self.ids.insert(canonical, id);
        id
    }

    /// Like [`add_decl`](Self::add_decl), and remembers `decl` as a C++
    /// declaration for the template-instantiation pass.
    pub fn add_cxx_decl(&mut self, ast: &impl AstProvider, decl: Option<DeclId>) -> ScopeId {
        if let Some(d) = decl {
            self.cxx_decls.insert(ast.canonical_decl(d));
        }
        self.add_decl(ast, decl)
    }

    /// The id already assigned to `decl`, or `0` if it never got one.
    pub fn decl_id(&self, ast: &impl AstProvider, decl: DeclId) -> ScopeId {
        self.ids
            .get(&ast.canonical_decl(decl))
            .copied()
            .unwrap_or(GLOBAL_SCOPE)
    }

    /// Canonical C++ declarations in the order they were first registered.
    pub fn cxx_decls(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.cxx_decls.iter().copied()
    }

    /// Number of ids handed out.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
