//! In-memory translation unit.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{
    AstProvider, BuiltinKind, DeclId, DeclKind, MacroDefinition, MacroTable, SourceDecl,
    SourceType, TypeId,
};
use crate::base::SourceLocation;

/// An arena of declarations and interned types for one input file.
///
/// Types are interned: asking twice for `int *` yields the same [`TypeId`].
/// Declarations are not; every call to [`add_decl`](Self::add_decl) creates
/// a new entity.
#[derive(Clone, Debug)]
pub struct TranslationUnit {
    file: Arc<str>,
    decls: Vec<SourceDecl>,
    types: Vec<SourceType>,
    interned: FxHashMap<SourceType, TypeId>,
    top_level: Vec<DeclId>,
    macros: MacroTable,
}

impl TranslationUnit {
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        Self {
            file: file.into(),
            decls: Vec::new(),
            types: Vec::new(),
            interned: FxHashMap::default(),
            top_level: Vec::new(),
            macros: MacroTable::new(),
        }
    }

    /// A location in the main file.
    pub fn loc(&self, line: u32, column: u32) -> SourceLocation {
        SourceLocation::new(self.file.clone(), line, column)
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub fn add_decl(&mut self, decl: SourceDecl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Add a declaration and append it to the top-level sequence.
    pub fn add_top_level(&mut self, decl: SourceDecl) -> DeclId {
        let id = self.add_decl(decl);
        self.top_level.push(id);
        id
    }

    pub fn push_top_level(&mut self, id: DeclId) {
        self.top_level.push(id);
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut SourceDecl {
        &mut self.decls[id.index()]
    }

    /// Append a member to a namespace, linkage block or record.
    ///
    /// Returns false when `container` has no member list.
    pub fn push_member(&mut self, container: DeclId, member: DeclId) -> bool {
        match &mut self.decl_mut(container).kind {
            DeclKind::Namespace(ns) | DeclKind::LinkageSpec(ns) => ns.members.push(member),
            DeclKind::Record(record) => record.members.push(member),
            _ => return false,
        }
        true
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    pub fn intern(&mut self, ty: SourceType) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    pub fn builtin(&mut self, kind: BuiltinKind) -> TypeId {
        self.intern(SourceType::Builtin(kind))
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.intern(SourceType::Pointer(pointee))
    }

    pub fn array_of(&mut self, element: TypeId, size: u64) -> TypeId {
        self.intern(SourceType::ConstantArray { element, size })
    }

    pub fn record_type(&mut self, record: DeclId) -> TypeId {
        self.intern(SourceType::Record(record))
    }

    pub fn enum_type(&mut self, decl: DeclId) -> TypeId {
        self.intern(SourceType::Enum(decl))
    }

    pub fn typedef_type(&mut self, decl: DeclId) -> TypeId {
        self.intern(SourceType::Typedef(decl))
    }

    pub fn elaborated(&mut self, ty: TypeId) -> TypeId {
        self.intern(SourceType::Elaborated(ty))
    }

    // ------------------------------------------------------------------------
    // Macros
    // ------------------------------------------------------------------------

    pub fn define_macro(&mut self, def: MacroDefinition) {
        self.macros.define(def);
    }
}

impl AstProvider for TranslationUnit {
    fn decl(&self, id: DeclId) -> &SourceDecl {
        &self.decls[id.index()]
    }

    fn ty(&self, id: TypeId) -> &SourceType {
        &self.types[id.index()]
    }

    fn top_level_decls(&self) -> &[DeclId] {
        &self.top_level
    }

    fn main_file(&self) -> &str {
        &self.file
    }

    fn macros(&self) -> &MacroTable {
        &self.macros
    }
}
