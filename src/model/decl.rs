//! Extracted declarations.
//!
//! Every declaration carries a [`DeclInfo`]: its name, the id of its
//! enclosing scope and its source location. The dialect-specific payload is
//! one of the structs below, wrapped in [`Decl`].

use indexmap::IndexSet;

use super::{TemplateArgs, Type};
use crate::base::{GLOBAL_SCOPE, ScopeId};

pub use crate::source::{AccessSpecifier, StorageClass};

// ============================================================================
// COMMON PARTS
// ============================================================================

/// Attributes shared by every declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclInfo {
    pub name: String,
    /// Registry id of the enclosing namespace or record; `0` for global.
    pub ns: ScopeId,
    /// `file:line:col`, or empty when unknown.
    pub location: String,
}

impl DeclInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ns: GLOBAL_SCOPE,
            location: String::new(),
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub bit_offset: u64,
    pub bit_size: u64,
    pub bit_alignment: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub value: i64,
}

/// Whether an Objective-C method belongs to the class or its instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodScope {
    Class,
    Instance,
}

impl MethodScope {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodScope::Class => "class",
            MethodScope::Instance => "instance",
        }
    }
}

/// A direct base of a C++ record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentRecord {
    pub name: String,
    /// Offset within the derived record, in bytes.
    pub offset: u64,
    pub is_virtual: bool,
    pub access: AccessSpecifier,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A declaration the extractor has no dialect for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnhandledDecl {
    pub info: DeclInfo,
    /// Front-end kind label, e.g. `StaticAssert`.
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub info: DeclInfo,
    pub ty: Type,
    /// Literal value of a constant initializer.
    pub value: Option<String>,
    pub is_extern: bool,
    /// The initializer is a string literal.
    pub is_string: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub info: DeclInfo,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub is_variadic: bool,
    pub is_inline: bool,
    pub storage_class: StorageClass,
    pub template_args: Option<TemplateArgs>,
    /// Set for Objective-C methods.
    pub objc_scope: Option<MethodScope>,
}

impl FunctionDecl {
    pub fn new(info: DeclInfo, return_type: Type) -> Self {
        Self {
            info,
            return_type,
            params: Vec::new(),
            is_variadic: false,
            is_inline: false,
            storage_class: StorageClass::None,
            template_args: None,
            objc_scope: None,
        }
    }
}

/// A C++ member function.
#[derive(Clone, Debug, PartialEq)]
pub struct CxxFunctionDecl {
    pub function: FunctionDecl,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypedefDecl {
    pub info: DeclInfo,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordDecl {
    pub info: DeclInfo,
    pub id: ScopeId,
    pub is_union: bool,
    pub bit_size: u64,
    pub bit_alignment: u64,
    pub fields: Vec<Field>,
}

impl RecordDecl {
    pub fn new(info: DeclInfo, id: ScopeId, is_union: bool) -> Self {
        Self {
            info,
            id,
            is_union,
            bit_size: 0,
            bit_alignment: 0,
            fields: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CxxRecordDecl {
    pub record: RecordDecl,
    pub is_class: bool,
    pub template_args: Option<TemplateArgs>,
    pub parents: Vec<ParentRecord>,
    pub methods: Vec<CxxFunctionDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub info: DeclInfo,
    /// Non-zero only for anonymous enums.
    pub id: ScopeId,
    pub fields: Vec<EnumConstant>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CxxNamespaceDecl {
    pub info: DeclInfo,
    pub id: ScopeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasDecl {
    pub info: DeclInfo,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasTemplateDecl {
    pub info: DeclInfo,
    pub ty: Type,
    pub template_args: TemplateArgs,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarTemplateDecl {
    pub info: DeclInfo,
    pub ty: Type,
    pub template_args: TemplateArgs,
}

/// `using N::name;`, its shadow declarations and `using namespace N;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsingDecl {
    pub info: DeclInfo,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjCInterfaceDecl {
    pub info: DeclInfo,
    /// Empty for root classes.
    pub superclass: String,
    /// `@class Foo;` with no `@interface` seen.
    pub is_forward: bool,
    pub protocols: IndexSet<String>,
    pub ivars: Vec<Field>,
    pub methods: Vec<FunctionDecl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjCCategoryDecl {
    pub info: DeclInfo,
    pub category: String,
    pub methods: Vec<FunctionDecl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjCProtocolDecl {
    pub info: DeclInfo,
    pub methods: Vec<FunctionDecl>,
}

/// Any extracted declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Unhandled(UnhandledDecl),
    Var(VarDecl),
    Function(FunctionDecl),
    CxxFunction(CxxFunctionDecl),
    Typedef(TypedefDecl),
    Record(RecordDecl),
    Enum(EnumDecl),
    CxxRecord(CxxRecordDecl),
    CxxNamespace(CxxNamespaceDecl),
    TypeAlias(TypeAliasDecl),
    TypeAliasTemplate(TypeAliasTemplateDecl),
    VarTemplate(VarTemplateDecl),
    Using(UsingDecl),
    UsingShadow(UsingDecl),
    UsingDirective(UsingDecl),
    ObjCInterface(ObjCInterfaceDecl),
    ObjCCategory(ObjCCategoryDecl),
    ObjCProtocol(ObjCProtocolDecl),
}

impl Decl {
    pub fn info(&self) -> &DeclInfo {
        match self {
            Decl::Unhandled(d) => &d.info,
            Decl::Var(d) => &d.info,
            Decl::Function(d) => &d.info,
            Decl::CxxFunction(d) => &d.function.info,
            Decl::Typedef(d) => &d.info,
            Decl::Record(d) => &d.info,
            Decl::Enum(d) => &d.info,
            Decl::CxxRecord(d) => &d.record.info,
            Decl::CxxNamespace(d) => &d.info,
            Decl::TypeAlias(d) => &d.info,
            Decl::TypeAliasTemplate(d) => &d.info,
            Decl::VarTemplate(d) => &d.info,
            Decl::Using(d) | Decl::UsingShadow(d) | Decl::UsingDirective(d) => &d.info,
            Decl::ObjCInterface(d) => &d.info,
            Decl::ObjCCategory(d) => &d.info,
            Decl::ObjCProtocol(d) => &d.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut DeclInfo {
        match self {
            Decl::Unhandled(d) => &mut d.info,
            Decl::Var(d) => &mut d.info,
            Decl::Function(d) => &mut d.info,
            Decl::CxxFunction(d) => &mut d.function.info,
            Decl::Typedef(d) => &mut d.info,
            Decl::Record(d) => &mut d.info,
            Decl::Enum(d) => &mut d.info,
            Decl::CxxRecord(d) => &mut d.record.info,
            Decl::CxxNamespace(d) => &mut d.info,
            Decl::TypeAlias(d) => &mut d.info,
            Decl::TypeAliasTemplate(d) => &mut d.info,
            Decl::VarTemplate(d) => &mut d.info,
            Decl::Using(d) | Decl::UsingShadow(d) | Decl::UsingDirective(d) => &mut d.info,
            Decl::ObjCInterface(d) => &mut d.info,
            Decl::ObjCCategory(d) => &mut d.info,
            Decl::ObjCProtocol(d) => &mut d.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Short label for logs and test assertions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Unhandled(_) => "unhandled",
            Decl::Var(_) => "var",
            Decl::Function(_) => "function",
            Decl::CxxFunction(_) => "cxx-function",
            Decl::Typedef(_) => "typedef",
            Decl::Record(_) => "record",
            Decl::Enum(_) => "enum",
            Decl::CxxRecord(_) => "cxx-record",
            Decl::CxxNamespace(_) => "namespace",
            Decl::TypeAlias(_) => "type-alias",
            Decl::TypeAliasTemplate(_) => "type-alias-template",
            Decl::VarTemplate(_) => "var-template",
            Decl::Using(_) => "using",
            Decl::UsingShadow(_) => "using-shadow",
            Decl::UsingDirective(_) => "using-directive",
            Decl::ObjCInterface(_) => "objc-interface",
            Decl::ObjCCategory(_) => "objc-category",
            Decl::ObjCProtocol(_) => "objc-protocol",
        }
    }
}
