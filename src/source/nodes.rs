//! Front-end AST nodes as the extractor sees them.
//!
//! These mirror what a C-family front-end resolves for every declaration:
//! a kind, a name, a location, child lists for scoped containers, and fully
//! resolved types. Identity is the handle ([`DeclId`], [`TypeId`]), never the
//! name: two anonymous structs with identical bodies are distinct nodes.

use crate::base::SourceLocation;

// ============================================================================
// HANDLES
// ============================================================================

/// Identity of a declaration node inside its provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub u32);

/// Identity of a type node inside its provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// One declaration node.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceDecl {
    /// Declared name; empty for anonymous entities.
    pub name: String,
    /// Where the declaration was written. `None` for compiler-introduced nodes.
    pub location: Option<SourceLocation>,
    /// Set when semantic analysis rejected the declaration.
    pub is_invalid: bool,
    /// First declaration of the same entity, for redeclarations.
    pub canonical: Option<DeclId>,
    pub kind: DeclKind,
}

impl SourceDecl {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            location: None,
            is_invalid: false,
            canonical: None,
            kind,
        }
    }

    pub fn located(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn invalid(mut self) -> Self {
        self.is_invalid = true;
        self
    }

    pub fn redeclaring(mut self, first: DeclId) -> Self {
        self.canonical = Some(first);
        self
    }

    /// Front-end kind label, used for diagnostics and unhandled stubs.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            DeclKind::Namespace(_) => "Namespace",
            DeclKind::LinkageSpec(_) => "LinkageSpec",
            DeclKind::Var(_) => "Var",
            DeclKind::Field(_) => "Field",
            DeclKind::IndirectField => "IndirectField",
            DeclKind::Function(_) => "Function",
            DeclKind::Method(_) => "CXXMethod",
            DeclKind::FunctionTemplate => "FunctionTemplate",
            DeclKind::Record(r) if r.cxx.is_some() => "CXXRecord",
            DeclKind::Record(_) => "Record",
            DeclKind::Enum(_) => "Enum",
            DeclKind::Typedef(_) => "Typedef",
            DeclKind::TypeAlias(_) => "TypeAlias",
            DeclKind::TypeAliasTemplate(_) => "TypeAliasTemplate",
            DeclKind::VarTemplate(_) => "VarTemplate",
            DeclKind::ClassTemplate => "ClassTemplate",
            DeclKind::Using => "Using",
            DeclKind::UsingShadow => "UsingShadow",
            DeclKind::UsingDirective => "UsingDirective",
            DeclKind::ObjCInterface(_) => "ObjCInterface",
            DeclKind::ObjCCategory(_) => "ObjCCategory",
            DeclKind::ObjCProtocol(_) => "ObjCProtocol",
            DeclKind::ObjCImplementation => "ObjCImplementation",
            DeclKind::ObjCMethod(_) => "ObjCMethod",
            DeclKind::Other(other) => &other.kind_name,
        }
    }

    pub fn as_record(&self) -> Option<&RecordDecl> {
        match &self.kind {
            DeclKind::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDecl> {
        match &self.kind {
            DeclKind::Field(f) => Some(f),
            _ => None,
        }
    }
}

/// The front-end's declaration kinds the extractor distinguishes.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    Namespace(ContainerDecl),
    /// `extern "C" { ... }`
    LinkageSpec(ContainerDecl),
    Var(VarDecl),
    Field(FieldDecl),
    IndirectField,
    Function(FunctionDecl),
    Method(MethodDecl),
    FunctionTemplate,
    Record(RecordDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    TypeAlias(TypedefDecl),
    TypeAliasTemplate(TemplatedDecl),
    VarTemplate(TemplatedDecl),
    ClassTemplate,
    Using,
    UsingShadow,
    UsingDirective,
    ObjCInterface(ObjCInterfaceDecl),
    ObjCCategory(ObjCCategoryDecl),
    ObjCProtocol(ObjCProtocolDecl),
    ObjCImplementation,
    ObjCMethod(ObjCMethodDecl),
    Other(OtherDecl),
}

/// A scope whose members are visited in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerDecl {
    pub members: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub ty: TypeId,
    /// Constant-evaluation result of the initializer, as the front-end computed it.
    pub init: Option<Initializer>,
    pub has_external_storage: bool,
    /// The declared type depends on a template parameter.
    pub is_type_dependent: bool,
}

impl VarDecl {
    pub fn new(ty: TypeId) -> Self {
        Self {
            ty,
            init: None,
            has_external_storage: false,
            is_type_dependent: false,
        }
    }

    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    pub fn external(mut self) -> Self {
        self.has_external_storage = true;
        self
    }
}

/// What the front-end knows about a variable initializer.
#[derive(Clone, Debug, PartialEq)]
pub enum Initializer {
    Constant(ConstValue),
    /// Present, but not a constant expression.
    NotConstant,
    /// Depends on a template parameter.
    ValueDependent,
}

/// A constant-evaluated value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    /// The address of a string literal.
    StringLiteral(StringLiteral),
    /// Any other address constant.
    Address,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLiteral {
    pub bytes: Vec<u8>,
    pub encoding: StringEncoding,
}

impl StringLiteral {
    pub fn ascii(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            encoding: StringEncoding::Ordinary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    Ordinary,
    Utf8,
    Utf16,
    Utf32,
    Wide,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub ty: TypeId,
    pub bit_width: Option<u32>,
}

impl FieldDecl {
    pub fn new(ty: TypeId) -> Self {
        Self { ty, bit_width: None }
    }

    pub fn bitfield(ty: TypeId, width: u32) -> Self {
        Self {
            ty,
            bit_width: Some(width),
        }
    }
}

/// A named parameter of a callable.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageClass {
    #[default]
    None,
    Extern,
    Static,
    PrivateExtern,
    Auto,
    Register,
}

impl StorageClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::None => "none",
            StorageClass::Extern => "extern",
            StorageClass::Static => "static",
            StorageClass::PrivateExtern => "private_extern",
            StorageClass::Auto => "auto",
            StorageClass::Register => "register",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub return_type: TypeId,
    pub params: Vec<Param>,
    pub is_variadic: bool,
    pub is_inline: bool,
    pub storage_class: StorageClass,
    /// Arguments of a function template specialization.
    pub template_args: Option<Vec<TemplateArgument>>,
}

impl FunctionDecl {
    pub fn new(return_type: TypeId, params: Vec<Param>) -> Self {
        Self {
            return_type,
            params,
            is_variadic: false,
            is_inline: false,
            storage_class: StorageClass::None,
            template_args: None,
        }
    }
}

/// A C++ member function.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub function: FunctionDecl,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_const: bool,
}

impl MethodDecl {
    pub fn new(function: FunctionDecl) -> Self {
        Self {
            function,
            is_static: false,
            is_virtual: false,
            is_pure: false,
            is_const: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Struct,
    Union,
    Class,
}

/// A struct, union or class.
///
/// `members` is the record's declaration context in source order: fields,
/// nested records, enums, methods and so on. Field order is the order of
/// `Field` members.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDecl {
    pub tag: TagKind,
    /// False for forward declarations.
    pub is_complete: bool,
    pub members: Vec<DeclId>,
    /// Present for records declared in C++ (every C++ record is a class).
    pub cxx: Option<CxxRecordData>,
}

impl RecordDecl {
    pub fn new(tag: TagKind, members: Vec<DeclId>) -> Self {
        Self {
            tag,
            is_complete: true,
            members,
            cxx: None,
        }
    }

    pub fn forward(tag: TagKind) -> Self {
        Self {
            tag,
            is_complete: false,
            members: Vec::new(),
            cxx: None,
        }
    }

    pub fn with_cxx(mut self, cxx: CxxRecordData) -> Self {
        self.cxx = Some(cxx);
        self
    }

    pub fn is_union(&self) -> bool {
        self.tag == TagKind::Union
    }

    pub fn is_class(&self) -> bool {
        self.tag == TagKind::Class
    }

    pub fn is_dependent(&self) -> bool {
        self.cxx.as_ref().is_some_and(|c| c.is_dependent)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CxxRecordData {
    pub bases: Vec<BaseSpecifier>,
    /// A template pattern (or a member of one) whose layout is unknown.
    pub is_dependent: bool,
    pub specialization: Option<Specialization>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
    None,
}

impl AccessSpecifier {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessSpecifier::Public => "public",
            AccessSpecifier::Protected => "protected",
            AccessSpecifier::Private => "private",
            AccessSpecifier::None => "unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BaseSpecifier {
    pub record: DeclId,
    pub access: AccessSpecifier,
    pub is_virtual: bool,
}

impl BaseSpecifier {
    pub fn public(record: DeclId) -> Self {
        Self {
            record,
            access: AccessSpecifier::Public,
            is_virtual: false,
        }
    }

    pub fn virtual_public(record: DeclId) -> Self {
        Self {
            record,
            access: AccessSpecifier::Public,
            is_virtual: true,
        }
    }
}

/// How a class template specialization came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecializationKind {
    /// Named somewhere but never instantiated.
    Undeclared,
    ImplicitInstantiation,
    ExplicitSpecialization,
    ExplicitInstantiationDeclaration,
    ExplicitInstantiationDefinition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Specialization {
    pub template_name: String,
    pub args: Vec<TemplateArgument>,
    pub kind: SpecializationKind,
    pub is_partial: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateArgument {
    Type(TypeId),
    /// A non-type argument with its integral value.
    Integral { ty: TypeId, value: i64 },
    /// Anything else, by spelling.
    Other { spelling: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumDecl {
    pub enumerators: Vec<Enumerator>,
}

impl EnumDecl {
    pub fn new<S: Into<String>>(enumerators: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            enumerators: enumerators
                .into_iter()
                .map(|(name, value)| Enumerator {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypedefDecl {
    pub underlying: TypeId,
}

/// A type-alias template or variable template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatedDecl {
    pub ty: TypeId,
    pub params: Vec<TemplateArgument>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjCInterfaceDecl {
    pub superclass: Option<DeclId>,
    pub has_definition: bool,
    pub protocols: Vec<DeclId>,
    /// Instance variables (`Field` nodes).
    pub ivars: Vec<DeclId>,
    /// `ObjCMethod` nodes.
    pub methods: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjCCategoryDecl {
    pub interface: DeclId,
    pub methods: Vec<DeclId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjCProtocolDecl {
    pub methods: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjCMethodDecl {
    pub return_type: TypeId,
    pub params: Vec<Param>,
    pub is_variadic: bool,
    pub is_instance: bool,
}

/// Any declaration kind the extractor has no dialect for.
#[derive(Clone, Debug, PartialEq)]
pub struct OtherDecl {
    pub kind_name: String,
    /// Whether the front-end considers this a named declaration.
    pub is_named: bool,
}

// ============================================================================
// TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Void,
    Bool,
    /// Plain `char`; signedness is a target property.
    Char,
    SChar,
    UChar,
    WChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    Half,
    Float,
    Double,
    LongDouble,
    Float128,
    NullPtr,
}

impl BuiltinKind {
    /// The name a binding generator sees for this builtin.
    pub fn ffi_name(self) -> &'static str {
        match self {
            BuiltinKind::Void => ":void",
            BuiltinKind::Bool => ":_Bool",
            BuiltinKind::Char => ":char",
            BuiltinKind::SChar => ":signed-char",
            BuiltinKind::UChar => ":unsigned-char",
            BuiltinKind::WChar => ":wchar_t",
            BuiltinKind::Char16 => ":char16_t",
            BuiltinKind::Char32 => ":char32_t",
            BuiltinKind::Short => ":short",
            BuiltinKind::UShort => ":unsigned-short",
            BuiltinKind::Int => ":int",
            BuiltinKind::UInt => ":unsigned-int",
            BuiltinKind::Long => ":long",
            BuiltinKind::ULong => ":unsigned-long",
            BuiltinKind::LongLong => ":long-long",
            BuiltinKind::ULongLong => ":unsigned-long-long",
            BuiltinKind::Int128 => ":__int128",
            BuiltinKind::UInt128 => ":unsigned-__int128",
            BuiltinKind::Half => ":half",
            BuiltinKind::Float => ":float",
            BuiltinKind::Double => ":double",
            BuiltinKind::LongDouble => ":long-double",
            BuiltinKind::Float128 => ":float128",
            BuiltinKind::NullPtr => ":nullptr_t",
        }
    }

    /// The C spelling of this builtin.
    pub fn c_spelling(self) -> &'static str {
        match self {
            BuiltinKind::Void => "void",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Char => "char",
            BuiltinKind::SChar => "signed char",
            BuiltinKind::UChar => "unsigned char",
            BuiltinKind::WChar => "wchar_t",
            BuiltinKind::Char16 => "char16_t",
            BuiltinKind::Char32 => "char32_t",
            BuiltinKind::Short => "short",
            BuiltinKind::UShort => "unsigned short",
            BuiltinKind::Int => "int",
            BuiltinKind::UInt => "unsigned int",
            BuiltinKind::Long => "long",
            BuiltinKind::ULong => "unsigned long",
            BuiltinKind::LongLong => "long long",
            BuiltinKind::ULongLong => "unsigned long long",
            BuiltinKind::Int128 => "__int128",
            BuiltinKind::UInt128 => "unsigned __int128",
            BuiltinKind::Half => "__fp16",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::LongDouble => "long double",
            BuiltinKind::Float128 => "__float128",
            BuiltinKind::NullPtr => "decltype(nullptr)",
        }
    }
}

/// A resolved type. Qualifiers are not modelled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceType {
    Builtin(BuiltinKind),
    Pointer(TypeId),
    LValueReference(TypeId),
    RValueReference(TypeId),
    ConstantArray { element: TypeId, size: u64 },
    IncompleteArray { element: TypeId },
    VariableArray { element: TypeId },
    Record(DeclId),
    Enum(DeclId),
    /// A use of a typedef or type alias name.
    Typedef(DeclId),
    /// `struct S` / `N::S` spelled with a keyword or qualifier.
    Elaborated(TypeId),
    Paren(TypeId),
    Function(FunctionProto),
    TemplateSpecialization {
        template_name: String,
        args: Vec<TemplateArgument>,
        /// The specialization record, when the front-end created one.
        record: Option<DeclId>,
    },
    TemplateTypeParm { name: String },
    ObjCObjectPointer { interface: Option<DeclId> },
    /// Anything else; carries the front-end's spelling.
    Unsupported { spelling: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionProto {
    pub return_type: TypeId,
    pub params: Vec<TypeId>,
    pub is_variadic: bool,
}
