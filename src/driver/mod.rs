//! Output drivers.
//!
//! The extractor streams declarations into an [`OutputDriver`] as it walks
//! the translation unit. A driver sees one `write_header`, an optional
//! `write_namespace`, every declaration with `write_between` separating
//! consecutive ones, and one `write_footer`.
//!
//! ## Usage
//!
//! ```ignore
//! use bindscan::driver::make_driver;
//!
//! let mut driver = make_driver("json", Box::new(std::io::stdout()))?;
//! bindscan::extract(&unit, &layout, driver.as_mut(), None)?;
//! ```

mod json;
mod object;

pub use json::JsonDriver;

use std::io::{self, Write};

use crate::error::ConfigError;
use crate::model::{
    ArrayType, BasicType, BitfieldType, CxxFunctionDecl, CxxNamespaceDecl, CxxRecordDecl, Decl,
    EnumDecl, EnumType, FunctionDecl, ObjCCategoryDecl, ObjCInterfaceDecl, ObjCProtocolDecl,
    PointerType, RecordDecl, RecordType, ReferenceType, SimpleType, TemplateType, Type,
    TypeAliasDecl, TypeAliasTemplateDecl, TypedefDecl, UnhandledDecl, UsingDecl, VarDecl,
    VarTemplateDecl,
};

/// Serializer for the extracted model.
///
/// Lifecycle hooks and the C++/Objective-C dialects have no-op defaults, so
/// a driver for a C-only format implements just the C types and
/// declarations. [`write_type`](Self::write_type) and
/// [`write_decl`](Self::write_decl) dispatch to the per-variant methods.
pub trait OutputDriver {
    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    fn write_header(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Announce the namespace every following declaration belongs to.
    ///
    /// `write_between` is never called right after this. A driver that
    /// separates the announcement from the first declaration does so in
    /// [`write_decl`](Self::write_decl).
    fn write_namespace(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    /// Separator between two consecutive top-level declarations.
    fn write_between(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_footer(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Free-standing comment object. The extractor never emits one; it is
    /// for callers that annotate a document between declarations.
    fn write_comment(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    fn write_simple_type(&mut self, ty: &SimpleType) -> io::Result<()>;
    fn write_basic_type(&mut self, ty: &BasicType) -> io::Result<()>;
    fn write_bitfield_type(&mut self, ty: &BitfieldType) -> io::Result<()>;
    fn write_pointer_type(&mut self, ty: &PointerType) -> io::Result<()>;
    fn write_array_type(&mut self, ty: &ArrayType) -> io::Result<()>;
    fn write_record_type(&mut self, ty: &RecordType) -> io::Result<()>;
    fn write_enum_type(&mut self, ty: &EnumType) -> io::Result<()>;

    fn write_reference_type(&mut self, _ty: &ReferenceType) -> io::Result<()> {
        Ok(())
    }

    fn write_template_type(&mut self, _ty: &TemplateType) -> io::Result<()> {
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    fn write_unhandled(&mut self, decl: &UnhandledDecl) -> io::Result<()>;
    fn write_var(&mut self, decl: &VarDecl) -> io::Result<()>;
    fn write_function(&mut self, decl: &FunctionDecl) -> io::Result<()>;
    fn write_typedef(&mut self, decl: &TypedefDecl) -> io::Result<()>;
    fn write_record(&mut self, decl: &RecordDecl) -> io::Result<()>;
    fn write_enum(&mut self, decl: &EnumDecl) -> io::Result<()>;

    fn write_cxx_record(&mut self, _decl: &CxxRecordDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_cxx_function(&mut self, _decl: &CxxFunctionDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_cxx_namespace(&mut self, _decl: &CxxNamespaceDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_type_alias(&mut self, _decl: &TypeAliasDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_type_alias_template(&mut self, _decl: &TypeAliasTemplateDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_var_template(&mut self, _decl: &VarTemplateDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_using(&mut self, _decl: &UsingDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_using_shadow(&mut self, _decl: &UsingDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_using_directive(&mut self, _decl: &UsingDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_objc_interface(&mut self, _decl: &ObjCInterfaceDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_objc_category(&mut self, _decl: &ObjCCategoryDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_objc_protocol(&mut self, _decl: &ObjCProtocolDecl) -> io::Result<()> {
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    fn write_type(&mut self, ty: &Type) -> io::Result<()> {
        match ty {
            Type::Simple(t) => self.write_simple_type(t),
            Type::Basic(t) => self.write_basic_type(t),
            Type::Bitfield(t) => self.write_bitfield_type(t),
            Type::Pointer(t) => self.write_pointer_type(t),
            Type::Reference(t) => self.write_reference_type(t),
            Type::Array(t) => self.write_array_type(t),
            Type::Record(t) => self.write_record_type(t),
            Type::Enum(t) => self.write_enum_type(t),
            Type::Template(t) => self.write_template_type(t),
        }
    }

    fn write_decl(&mut self, decl: &Decl) -> io::Result<()> {
        dispatch_decl(self, decl)
    }
}

/// Route `decl` to the driver method for its dialect.
///
/// This is the body of [`OutputDriver::write_decl`], callable from drivers
/// that override `write_decl` to add framing around each declaration.
pub fn dispatch_decl<D: OutputDriver + ?Sized>(driver: &mut D, decl: &Decl) -> io::Result<()> {
    match decl {
        Decl::Unhandled(d) => driver.write_unhandled(d),
        Decl::Var(d) => driver.write_var(d),
        Decl::Function(d) => driver.write_function(d),
        Decl::CxxFunction(d) => driver.write_cxx_function(d),
        Decl::Typedef(d) => driver.write_typedef(d),
        Decl::Record(d) => driver.write_record(d),
        Decl::Enum(d) => driver.write_enum(d),
        Decl::CxxRecord(d) => driver.write_cxx_record(d),
        Decl::CxxNamespace(d) => driver.write_cxx_namespace(d),
        Decl::TypeAlias(d) => driver.write_type_alias(d),
        Decl::TypeAliasTemplate(d) => driver.write_type_alias_template(d),
        Decl::VarTemplate(d) => driver.write_var_template(d),
        Decl::Using(d) => driver.write_using(d),
        Decl::UsingShadow(d) => driver.write_using_shadow(d),
        Decl::UsingDirective(d) => driver.write_using_directive(d),
        Decl::ObjCInterface(d) => driver.write_objc_interface(d),
        Decl::ObjCCategory(d) => driver.write_objc_category(d),
        Decl::ObjCProtocol(d) => driver.write_objc_protocol(d),
    }
}

// ============================================================================
// DRIVER TABLE
// ============================================================================

/// Constructor for a boxed driver writing to `sink`.
pub type MakeDriver = for<'a> fn(Box<dyn Write + 'a>) -> Box<dyn OutputDriver + 'a>;

/// A named, selectable driver.
#[derive(Clone, Copy)]
pub struct DriverEntry {
    pub name: &'static str,
    pub make: MakeDriver,
}

fn make_json<'a>(sink: Box<dyn Write + 'a>) -> Box<dyn OutputDriver + 'a> {
    Box::new(JsonDriver::new(sink))
}

/// Registered drivers. The first entry is the default.
pub const DRIVERS: &[DriverEntry] = &[DriverEntry {
    name: "json",
    make: make_json,
}];

/// Name of the driver used when none is requested.
pub const DEFAULT_DRIVER: &str = "json";

/// Names of every registered driver, default first.
pub fn available_drivers() -> impl Iterator<Item = &'static str> {
    DRIVERS.iter().map(|entry| entry.name)
}

/// Look up a driver by name and construct it over `sink`.
pub fn make_driver<'a>(
    name: &str,
    sink: Box<dyn Write + 'a>,
) -> Result<Box<dyn OutputDriver + 'a>, ConfigError> {
    DRIVERS
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| (entry.make)(sink))
        .ok_or_else(|| ConfigError::UnknownDriver {
            name: name.to_string(),
            available: available_drivers().collect::<Vec<_>>().join(", "),
        })
}
