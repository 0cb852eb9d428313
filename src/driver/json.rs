//! JSON output driver.
//!
//! Emits one array with an object per declaration. Every object starts with
//! a `"tag"` member naming its kind; types nest as objects under `"type"`.
//!
//! ```text
//! [
//! { "tag": "struct", "ns": 0, "name": "P", "id": 1, "location": "p.h:1:8",
//!   "bit-size": 64, "bit-alignment": 32, "fields": [...] }
//! ]
//! ```

use std::io::{self, Write};

use super::object::{Members, quote};
use super::{OutputDriver, dispatch_decl};
use crate::model::{
    ArrayType, BasicType, BitfieldType, CxxFunctionDecl, CxxNamespaceDecl, CxxRecordDecl, Decl,
    DeclInfo, EnumDecl, EnumType, Field, FunctionDecl, ObjCCategoryDecl, ObjCInterfaceDecl, ObjCProtocolDecl,
    PointerType, RecordDecl, RecordType, ReferenceType, SimpleType, TemplateArgs, TemplateType,
    TypeAliasDecl, TypeAliasTemplateDecl, TypedefDecl, UnhandledDecl, UsingDecl, VarDecl,
    VarTemplateDecl,
};

/// Literal values that would not be valid JSON numbers.
const NON_NUMERIC_VALUES: &[&str] = &["inf", "-inf", "INF", "Inf", "nan", "NaN"];

/// Streams the model as JSON into any writer.
pub struct JsonDriver<W: Write> {
    out: W,
    /// A namespace object was written and still needs its separator.
    after_namespace: bool,
}

impl<W: Write> JsonDriver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            after_namespace: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // ------------------------------------------------------------------------
    // Object plumbing
    // ------------------------------------------------------------------------

    /// `{ "tag": "<tag>"` followed by `members`.
    fn open(&mut self, tag: &str, members: Members) -> io::Result<()> {
        write!(self.out, "{{ \"tag\": {}", quote(tag))?;
        self.members(members)
    }

    fn members(&mut self, members: Members) -> io::Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        self.out.write_all(members.render().as_bytes())
    }

    /// `, "key": ` before a nested value.
    fn key(&mut self, key: &str) -> io::Result<()> {
        write!(self.out, ", \"{key}\": ")
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.write_all(b" }")
    }

    fn list<T>(
        &mut self,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T) -> io::Result<()>,
    ) -> io::Result<()> {
        self.out.write_all(b"[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b", ")?;
            }
            each(self, item)?;
        }
        self.out.write_all(b"]")
    }

    // ------------------------------------------------------------------------
    // Shared pieces
    // ------------------------------------------------------------------------

    fn write_fields(&mut self, fields: &[Field]) -> io::Result<()> {
        self.list(fields, |this, field| {
            this.open(
                "field",
                Members::new()
                    .quoted("name", &field.name)
                    .raw("bit-offset", field.bit_offset)
                    .raw("bit-size", field.bit_size)
                    .raw("bit-alignment", field.bit_alignment),
            )?;
            this.key("type")?;
            this.write_type(&field.ty)?;
            this.close()
        })
    }

    fn write_template_args(&mut self, args: Option<&TemplateArgs>) -> io::Result<()> {
        let Some(args) = args else {
            return Ok(());
        };
        self.key("template")?;
        self.list(args, |this, arg| {
            this.open("parameter", Members::new())?;
            this.key("type")?;
            this.write_type(&arg.ty)?;
            if let Some(value) = &arg.value {
                this.members(Members::new().quoted("value", value))?;
            }
            this.close()
        })
    }

    fn write_function_header(&mut self, d: &FunctionDecl) -> io::Result<()> {
        self.open(
            "function",
            Members::new()
                .quoted("name", &d.info.name)
                .raw("ns", d.info.ns)
                .quoted("location", &d.info.location)
                .raw("variadic", d.is_variadic)
                .raw("inline", d.is_inline)
                .quoted("storage-class", d.storage_class.as_str()),
        )?;
        self.write_template_args(d.template_args.as_ref())
    }

    /// Parameters and return type; closes the function object.
    fn write_function_tail(&mut self, d: &FunctionDecl) -> io::Result<()> {
        self.key("parameters")?;
        self.list(&d.params, |this, param| {
            this.open("parameter", Members::new().quoted("name", &param.name))?;
            this.key("type")?;
            this.write_type(&param.ty)?;
            this.close()
        })?;
        self.key("return-type")?;
        self.write_type(&d.return_type)?;
        self.close()
    }

    fn write_functions(&mut self, functions: &[FunctionDecl]) -> io::Result<()> {
        self.list(functions, |this, f| this.write_function(f))
    }

    /// `ns`, `name`, `location` then the declared type; leaves the object open.
    fn write_typed_header(&mut self, tag: &str, info: &DeclInfo) -> io::Result<()> {
        self.open(
            tag,
            Members::new()
                .raw("ns", info.ns)
                .quoted("name", &info.name)
                .quoted("location", &info.location),
        )?;
        self.key("type")
    }

    fn write_using_like(&mut self, tag: &str, d: &UsingDecl) -> io::Result<()> {
        self.open(
            tag,
            Members::new()
                .raw("ns", d.info.ns)
                .quoted("name", &d.info.name)
                .quoted("location", &d.info.location),
        )?;
        self.close()
    }
}

impl<W: Write> OutputDriver for JsonDriver<W> {
    fn write_header(&mut self) -> io::Result<()> {
        self.out.write_all(b"[\n")
    }

    /// The separator is deferred to the first declaration so a document
    /// with no declarations stays valid.
    fn write_namespace(&mut self, name: &str) -> io::Result<()> {
        self.open("namespace", Members::new().quoted("name", name))?;
        self.close()?;
        self.after_namespace = true;
        Ok(())
    }

    fn write_between(&mut self) -> io::Result<()> {
        self.out.write_all(b",\n")
    }

    fn write_decl(&mut self, decl: &Decl) -> io::Result<()> {
        if std::mem::take(&mut self.after_namespace) {
            self.out.write_all(b",\n")?;
        }
        dispatch_decl(self, decl)
    }

    fn write_footer(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n]\n")?;
        self.out.flush()
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.open("comment", Members::new().quoted("text", text))?;
        self.close()
    }

    // Types -----------------------------------------------------------------

    fn write_simple_type(&mut self, ty: &SimpleType) -> io::Result<()> {
        self.open(&ty.name, Members::new())?;
        self.close()
    }

    fn write_basic_type(&mut self, ty: &BasicType) -> io::Result<()> {
        self.open(
            &ty.name,
            Members::new()
                .raw("bit-size", ty.bit_size)
                .raw("bit-alignment", ty.bit_alignment),
        )?;
        self.close()
    }

    fn write_bitfield_type(&mut self, ty: &BitfieldType) -> io::Result<()> {
        self.open(":bitfield", Members::new().raw("width", ty.width))?;
        self.key("type")?;
        self.write_type(&ty.base)?;
        self.close()
    }

    fn write_pointer_type(&mut self, ty: &PointerType) -> io::Result<()> {
        self.open(":pointer", Members::new())?;
        self.key("type")?;
        self.write_type(&ty.pointee)?;
        self.close()
    }

    fn write_reference_type(&mut self, ty: &ReferenceType) -> io::Result<()> {
        self.open(":reference", Members::new())?;
        self.key("type")?;
        self.write_type(&ty.pointee)?;
        self.close()
    }

    fn write_array_type(&mut self, ty: &ArrayType) -> io::Result<()> {
        self.open(":array", Members::new())?;
        self.key("type")?;
        self.write_type(&ty.pointee)?;
        self.members(Members::new().raw("size", ty.size))?;
        self.close()
    }

    fn write_record_type(&mut self, ty: &RecordType) -> io::Result<()> {
        let tag = if ty.is_union {
            ":union"
        } else if ty.is_class {
            ":class"
        } else {
            ":struct"
        };
        self.open(tag, Members::new().quoted("name", &ty.name).raw("id", ty.id))?;
        self.close()
    }

    fn write_enum_type(&mut self, ty: &EnumType) -> io::Result<()> {
        self.open(":enum", Members::new().quoted("name", &ty.name).raw("id", ty.id))?;
        self.close()
    }

    fn write_template_type(&mut self, ty: &TemplateType) -> io::Result<()> {
        self.open(":template", Members::new().quoted("name", &ty.name).raw("id", ty.id))?;
        self.write_template_args(Some(&ty.args))?;
        self.close()
    }

    // Declarations ----------------------------------------------------------

    fn write_unhandled(&mut self, d: &UnhandledDecl) -> io::Result<()> {
        self.open(
            "unhandled",
            Members::new()
                .quoted("name", &d.info.name)
                .quoted("kind", &d.kind)
                .quoted("location", &d.info.location),
        )?;
        self.close()
    }

    fn write_var(&mut self, d: &VarDecl) -> io::Result<()> {
        let tag = if d.is_extern { "extern" } else { "const" };
        self.open(
            tag,
            Members::new()
                .quoted("name", &d.info.name)
                .raw("ns", d.info.ns)
                .quoted("location", &d.info.location),
        )?;
        self.key("type")?;
        self.write_type(&d.ty)?;
        if let Some(value) = d.value.as_deref().filter(|v| !v.is_empty()) {
            let members = if d.is_string || NON_NUMERIC_VALUES.contains(&value) {
                Members::new().quoted("value", value)
            } else {
                Members::new().raw("value", value)
            };
            self.members(members)?;
        }
        self.close()
    }

    fn write_function(&mut self, d: &FunctionDecl) -> io::Result<()> {
        self.write_function_header(d)?;
        if let Some(scope) = d.objc_scope {
            self.members(Members::new().quoted("scope", scope.as_str()))?;
        }
        self.write_function_tail(d)
    }

    fn write_cxx_function(&mut self, d: &CxxFunctionDecl) -> io::Result<()> {
        self.write_function_header(&d.function)?;
        self.members(
            Members::new()
                .quoted("scope", if d.is_static { "class" } else { "instance" })
                .raw("virtual", d.is_virtual)
                .raw("pure", d.is_pure)
                .raw("const", d.is_const),
        )?;
        self.write_function_tail(&d.function)
    }

    fn write_typedef(&mut self, d: &TypedefDecl) -> io::Result<()> {
        self.write_typed_header("typedef", &d.info)?;
        self.write_type(&d.ty)?;
        self.close()
    }

    fn write_record(&mut self, d: &RecordDecl) -> io::Result<()> {
        let tag = if d.is_union { "union" } else { "struct" };
        self.open(
            tag,
            Members::new()
                .raw("ns", d.info.ns)
                .quoted("name", &d.info.name)
                .raw("id", d.id)
                .quoted("location", &d.info.location)
                .raw("bit-size", d.bit_size)
                .raw("bit-alignment", d.bit_alignment),
        )?;
        self.key("fields")?;
        self.write_fields(&d.fields)?;
        self.close()
    }

    fn write_cxx_record(&mut self, d: &CxxRecordDecl) -> io::Result<()> {
        let r = &d.record;
        let tag = if r.is_union {
            "union"
        } else if d.is_class {
            "class"
        } else {
            "struct"
        };
        self.open(
            tag,
            Members::new()
                .raw("ns", r.info.ns)
                .quoted("name", &r.info.name)
                .raw("id", r.id)
                .quoted("location", &r.info.location)
                .raw("bit-size", r.bit_size)
                .raw("bit-alignment", r.bit_alignment),
        )?;
        self.write_template_args(d.template_args.as_ref())?;
        self.key("parents")?;
        self.list(&d.parents, |this, parent| {
            this.open(
                "class",
                Members::new()
                    .quoted("name", &parent.name)
                    .raw("offset", parent.offset)
                    .raw("is_virtual", parent.is_virtual)
                    .quoted("access", parent.access.as_str()),
            )?;
            this.close()
        })?;
        self.key("fields")?;
        self.write_fields(&r.fields)?;
        self.key("methods")?;
        self.list(&d.methods, |this, m| this.write_cxx_function(m))?;
        self.close()
    }

    fn write_cxx_namespace(&mut self, d: &CxxNamespaceDecl) -> io::Result<()> {
        self.open(
            "namespace",
            Members::new()
                .raw("ns", d.info.ns)
                .quoted("name", &d.info.name)
                .raw("id", d.id),
        )?;
        self.close()
    }

    fn write_type_alias(&mut self, d: &TypeAliasDecl) -> io::Result<()> {
        self.write_typed_header("type-alias", &d.info)?;
        self.write_type(&d.ty)?;
        self.close()
    }

    fn write_type_alias_template(&mut self, d: &TypeAliasTemplateDecl) -> io::Result<()> {
        self.write_typed_header("type-alias-template", &d.info)?;
        self.write_type(&d.ty)?;
        self.write_template_args(Some(&d.template_args))?;
        self.close()
    }

    fn write_var_template(&mut self, d: &VarTemplateDecl) -> io::Result<()> {
        self.write_typed_header("var-template", &d.info)?;
        self.write_type(&d.ty)?;
        self.write_template_args(Some(&d.template_args))?;
        self.close()
    }

    fn write_using(&mut self, d: &UsingDecl) -> io::Result<()> {
        self.write_using_like("using", d)
    }

    fn write_using_shadow(&mut self, d: &UsingDecl) -> io::Result<()> {
        self.write_using_like("using-shadow", d)
    }

    fn write_using_directive(&mut self, d: &UsingDecl) -> io::Result<()> {
        self.write_using_like("using-directive", d)
    }

    fn write_enum(&mut self, d: &EnumDecl) -> io::Result<()> {
        self.open(
            "enum",
            Members::new()
                .raw("ns", d.info.ns)
                .quoted("name", &d.info.name)
                .raw("id", d.id)
                .quoted("location", &d.info.location),
        )?;
        self.key("fields")?;
        self.list(&d.fields, |this, constant| {
            this.open(
                "field",
                Members::new()
                    .quoted("name", &constant.name)
                    .raw("value", constant.value),
            )?;
            this.close()
        })?;
        self.close()
    }

    fn write_objc_interface(&mut self, d: &ObjCInterfaceDecl) -> io::Result<()> {
        let tag = if d.is_forward { "@class" } else { "@interface" };
        self.open(
            tag,
            Members::new()
                .quoted("name", &d.info.name)
                .quoted("location", &d.info.location)
                .quoted("superclass", &d.superclass),
        )?;
        self.key("protocols")?;
        let protocols: Vec<&String> = d.protocols.iter().collect();
        self.list(&protocols, |this, name| this.out.write_all(quote(name).as_bytes()))?;
        self.key("ivars")?;
        self.write_fields(&d.ivars)?;
        self.key("methods")?;
        self.write_functions(&d.methods)?;
        self.close()
    }

    fn write_objc_category(&mut self, d: &ObjCCategoryDecl) -> io::Result<()> {
        self.open(
            "@category",
            Members::new()
                .quoted("name", &d.info.name)
                .quoted("location", &d.info.location)
                .quoted("category", &d.category),
        )?;
        self.key("methods")?;
        self.write_functions(&d.methods)?;
        self.close()
    }

    fn write_objc_protocol(&mut self, d: &ObjCProtocolDecl) -> io::Result<()> {
        self.open(
            "@protocol",
            Members::new()
                .quoted("name", &d.info.name)
                .quoted("location", &d.info.location),
        )?;
        self.key("methods")?;
        self.write_functions(&d.methods)?;
        self.close()
    }
}
