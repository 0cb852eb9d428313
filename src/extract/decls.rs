//! Declaration builders, one per dialect.
//!
//! Each builder turns a front-end node into a [`Decl`] without writing it;
//! scope and location are stamped on by the engine when the declaration is
//! emitted. Builders that return `None` skip the node.

use indexmap::IndexSet;
use tracing::{debug, trace, warn};

use super::Extractor;
use crate::base::{ScopeId, strip_macro_prefix};
use crate::driver::OutputDriver;
use crate::error::{ExtractError, LayoutError};
use crate::model::{
    CxxFunctionDecl, CxxNamespaceDecl, CxxRecordDecl, Decl, DeclInfo, EnumConstant, EnumDecl,
    Field, FunctionDecl, MethodScope, ObjCCategoryDecl, ObjCInterfaceDecl, ObjCProtocolDecl,
    Param, ParentRecord, RecordDecl, TypeAliasDecl, TypeAliasTemplateDecl, TypedefDecl,
    UnhandledDecl, UsingDecl, VarDecl, VarTemplateDecl,
};
use crate::source::{
    self, AstProvider, ConstValue, DeclId, DeclKind, LayoutOracle, RecordLayout, SourceType,
    StringEncoding, TypeId, TypeLayout,
};

impl<A, L, D> Extractor<'_, A, L, D>
where
    A: AstProvider,
    L: LayoutOracle,
    D: OutputDriver + ?Sized,
{
    fn mark_seen(&mut self, d: DeclId) {
        self.seen.insert(self.ast.canonical_decl(d));
    }

    fn display_name(&self, d: DeclId) -> String {
        let name = &self.ast.decl(d).name;
        if name.is_empty() {
            format!("(anonymous #{})", d.0)
        } else {
            name.clone()
        }
    }

    // ========================================================================
    // C
    // ========================================================================

    pub(super) fn make_var(&mut self, d: DeclId, var: &source::VarDecl) -> Result<Decl, ExtractError> {
        let ast = self.ast;
        let node = ast.decl(d);
        let info = match strip_macro_prefix(&node.name) {
            Some(name) => {
                let location = ast
                    .macro_definition_location(name)
                    .map(|loc| loc.to_string())
                    .unwrap_or_default();
                DeclInfo::new(name).at(location)
            }
            None => DeclInfo::new(node.name.clone()),
        };

        let (value, is_string) = if var.is_type_dependent {
            (None, false)
        } else {
            self.literal_value(d)
        };

        Ok(Decl::Var(VarDecl {
            info,
            ty: self.classify_type(var.ty)?,
            value,
            is_extern: var.has_external_storage,
            is_string,
        }))
    }

    /// Rendered initializer value and whether it is a string literal.
    fn literal_value(&self, d: DeclId) -> (Option<String>, bool) {
        match self.ast.evaluate_initializer(d) {
            Some(ConstValue::Int(v)) => (Some(v.to_string()), false),
            Some(ConstValue::UInt(v)) => (Some(v.to_string()), false),
            Some(ConstValue::Float(v)) => (Some(v.to_string()), false),
            Some(ConstValue::StringLiteral(literal)) => {
                let text = match literal.encoding {
                    StringEncoding::Ordinary | StringEncoding::Utf8 => String::from_utf8(literal.bytes).ok(),
                    StringEncoding::Utf16 | StringEncoding::Utf32 | StringEncoding::Wide => None,
                };
                if text.is_none() {
                    debug!(
                        name = %self.ast.decl(d).name,
                        encoding = ?literal.encoding,
                        "string initializer is not narrow UTF-8; value omitted"
                    );
                }
                (text, true)
            }
            Some(ConstValue::Address) | None => (None, false),
        }
    }

    pub(super) fn make_function(
        &mut self,
        d: DeclId,
        function: &source::FunctionDecl,
    ) -> Result<FunctionDecl, ExtractError> {
        let ast = self.ast;
        self.mark_seen(d);
        let mut decl = FunctionDecl::new(
            DeclInfo::new(ast.decl(d).name.clone()),
            self.classify_type(function.return_type)?,
        );
        decl.params = self.make_params(&function.params)?;
        decl.is_variadic = function.is_variadic;
        decl.is_inline = function.is_inline;
        decl.storage_class = function.storage_class;
        decl.template_args = function
            .template_args
            .as_deref()
            .map(|args| self.classify_template_args(args))
            .transpose()?;
        Ok(decl)
    }

    fn make_params(&mut self, params: &[source::Param]) -> Result<Vec<Param>, ExtractError> {
        let mut out = Vec::with_capacity(params.len());
        for p in params {
            out.push(Param {
                name: p.name.clone(),
                ty: self.classify_type(p.ty)?,
            });
        }
        Ok(out)
    }

    pub(super) fn make_record(&mut self, d: DeclId, toplevel: bool) -> Result<Option<Decl>, ExtractError> {
        let ast = self.ast;
        let node = ast.decl(d);
        let Some(rec) = node.as_record() else {
            return Ok(None);
        };
        if toplevel && node.name.is_empty() {
            self.drop_anonymous(d);
            return Ok(None);
        }

        let Some(layout) = self.sized_layout(d, rec)? else {
            return Ok(None);
        };
        self.mark_seen(d);
        let id = self.registry.add_decl(ast, Some(d));
        let mut record = RecordDecl::new(DeclInfo::new(node.name.clone()), id, rec.is_union());
        if let Some(layout) = layout {
            self.fill_record(d, rec, &layout, &mut record)?;
        }
        Ok(Some(Decl::Record(record)))
    }

    fn drop_anonymous(&mut self, d: DeclId) {
        if self.seen.contains(&self.ast.canonical_decl(d)) {
            trace!(record = d.0, "anonymous record already written");
            return;
        }
        debug!(record = d.0, "dropping top-level anonymous record");
        self.summary.dropped_anonymous += 1;
    }

    /// Layout for a record about to be emitted.
    ///
    /// The inner `None` is for forward declarations and dependent records,
    /// which keep an empty field list and zero size. The outer `None` means
    /// the oracle cannot size the record at all; it is skipped and counted.
    fn sized_layout(&mut self, d: DeclId, rec: &source::RecordDecl) -> Result<Option<Option<RecordLayout>>, ExtractError> {
        if !rec.is_complete || rec.is_dependent() {
            return Ok(Some(None));
        }
        match self.layout.record_layout(d) {
            Ok(layout) => Ok(Some(Some(layout))),
            Err(LayoutError::NoLayout(what) | LayoutError::TooLarge(what)) => {
                warn!(record = %self.display_name(d), %what, "Skipping record without a layout");
                self.mark_seen(d);
                self.summary.skipped_invalid += 1;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Size and alignment of a field or ivar type. Types the oracle has no
    /// layout for are written with zero size and alignment.
    fn member_layout(&self, ty: TypeId) -> Result<TypeLayout, ExtractError> {
        match self.layout.type_layout(ty) {
            Ok(layout) => Ok(layout),
            Err(LayoutError::NoLayout(what) | LayoutError::TooLarge(what)) => {
                debug!(%what, "member type has no layout");
                Ok(TypeLayout::bits(0, 0))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Size, alignment and fields of a sized record.
    fn fill_record(&mut self, d: DeclId, rec: &source::RecordDecl, layout: &RecordLayout, record: &mut RecordDecl) -> Result<(), ExtractError> {
        let ast = self.ast;
        record.bit_size = layout.bit_size;
        record.bit_alignment = layout.bit_alignment;

        let fields = rec
            .members
            .iter()
            .filter_map(|m| ast.decl(*m).as_field().map(|f| (*m, f)));
        for (index, (member, field)) in fields.enumerate() {
            let bit_offset = layout
                .field_offsets
                .get(index)
                .copied()
                .ok_or_else(|| LayoutError::MissingField {
                    record: self.display_name(d),
                    index,
                })?;
            let field_layout = self.member_layout(field.ty)?;
            record.fields.push(Field {
                name: ast.decl(member).name.clone(),
                ty: self.classify_field_type(field.ty, field.bit_width)?,
                bit_offset,
                bit_size: field_layout.bit_size,
                bit_alignment: field_layout.bit_alignment,
            });
        }
        Ok(())
    }

    pub(super) fn make_enum(&mut self, d: DeclId, e: &source::EnumDecl) -> Decl {
        let ast = self.ast;
        let name = ast.decl(d).name.clone();
        self.mark_seen(d);
        let id = if name.is_empty() {
            self.registry.add_decl(ast, Some(d))
        } else {
            0
        };
        Decl::Enum(EnumDecl {
            info: DeclInfo::new(name),
            id,
            fields: e
                .enumerators
                .iter()
                .map(|c| EnumConstant {
                    name: c.name.clone(),
                    value: c.value,
                })
                .collect(),
        })
    }

    pub(super) fn make_typedef(&mut self, d: DeclId, typedef: &source::TypedefDecl) -> Result<Option<Decl>, ExtractError> {
        let name = self.ast.decl(d).name.clone();
        if !self.is_underlying_valid(typedef.underlying) {
            warn!(%name, "Skipping typedef to invalid type");
            self.summary.skipped_invalid += 1;
            return Ok(None);
        }
        Ok(Some(Decl::Typedef(TypedefDecl {
            info: DeclInfo::new(name),
            ty: self.classify_type(typedef.underlying)?,
        })))
    }

    /// False when `ty` resolves, through sugar and typedefs, to an invalid record.
    fn is_underlying_valid(&self, ty: TypeId) -> bool {
        let ast = self.ast;
        match ast.ty(ast.desugar(ty)) {
            SourceType::Record(record) => !ast.decl(*record).is_invalid,
            SourceType::Typedef(decl) => match &ast.decl(*decl).kind {
                DeclKind::Typedef(t) | DeclKind::TypeAlias(t) => self.is_underlying_valid(t.underlying),
                _ => true,
            },
            _ => true,
        }
    }

    pub(super) fn make_unhandled(&mut self, d: DeclId, kind: &str) -> Decl {
        Decl::Unhandled(UnhandledDecl {
            info: DeclInfo::new(self.ast.decl(d).name.clone()),
            kind: kind.to_string(),
        })
    }

    // ========================================================================
    // C++
    // ========================================================================

    pub(super) fn make_namespace(&mut self, d: DeclId) -> Decl {
        let ast = self.ast;
        // Enclosing scope first so outer namespaces get the lower ids.
        self.registry.add_cxx_decl(ast, self.scope);
        Decl::CxxNamespace(CxxNamespaceDecl {
            info: DeclInfo::new(ast.decl(d).name.clone()),
            id: self.registry.add_cxx_decl(ast, Some(d)),
        })
    }

    pub(super) fn make_cxx_record(&mut self, d: DeclId, toplevel: bool) -> Result<Option<Decl>, ExtractError> {
        let ast = self.ast;
        let node = ast.decl(d);
        let Some(rec) = node.as_record() else {
            return Ok(None);
        };
        if !rec.is_complete || node.is_invalid {
            debug!(name = %self.display_name(d), "skipping C++ record without a valid definition");
            return Ok(None);
        }
        if toplevel && node.name.is_empty() {
            self.drop_anonymous(d);
            return Ok(None);
        }
        let Some(layout) = self.sized_layout(d, rec)? else {
            return Ok(None);
        };

        let cxx = rec.cxx.clone().unwrap_or_default();
        let template_args = match &cxx.specialization {
            Some(spec) => Some(self.classify_template_args(&spec.args)?),
            None => None,
        };

        self.mark_seen(d);
        let id = self.registry.add_cxx_decl(ast, Some(d));
        let mut methods = Vec::new();
        for member in &rec.members {
            if let DeclKind::Method(method) = &ast.decl(*member).kind {
                methods.push(self.make_method(*member, method, id)?);
            }
        }

        let mut record = RecordDecl::new(DeclInfo::new(node.name.clone()), id, rec.is_union());
        let mut parents = Vec::new();
        if let Some(layout) = layout {
            self.fill_record(d, rec, &layout, &mut record)?;
            for base in &cxx.bases {
                let offset = if base.is_virtual {
                    self.layout.vbase_offset(d, base.record)?
                } else {
                    self.layout.base_offset(d, base.record)?
                };
                parents.push(ParentRecord {
                    name: ast.decl(base.record).name.clone(),
                    offset,
                    is_virtual: base.is_virtual,
                    access: base.access,
                });
            }
        }

        Ok(Some(Decl::CxxRecord(CxxRecordDecl {
            record,
            is_class: rec.is_class(),
            template_args,
            parents,
            methods,
        })))
    }

    /// A member function, scoped to its record.
    fn make_method(&mut self, d: DeclId, method: &source::MethodDecl, record_id: ScopeId) -> Result<CxxFunctionDecl, ExtractError> {
        let mut function = self.make_function(d, &method.function)?;
        function.info.ns = record_id;
        function.info.location = self.location_of(d);
        Ok(CxxFunctionDecl {
            function,
            is_static: method.is_static,
            is_virtual: method.is_virtual,
            is_pure: method.is_pure,
            is_const: method.is_const,
        })
    }

    pub(super) fn make_type_alias(&mut self, d: DeclId, alias: &source::TypedefDecl) -> Result<Decl, ExtractError> {
        Ok(Decl::TypeAlias(TypeAliasDecl {
            info: DeclInfo::new(self.ast.decl(d).name.clone()),
            ty: self.classify_type(alias.underlying)?,
        }))
    }

    pub(super) fn make_type_alias_template(&mut self, d: DeclId, t: &source::TemplatedDecl) -> Result<Decl, ExtractError> {
        Ok(Decl::TypeAliasTemplate(TypeAliasTemplateDecl {
            info: DeclInfo::new(self.ast.decl(d).name.clone()),
            ty: self.classify_type(t.ty)?,
            template_args: self.classify_template_args(&t.params)?,
        }))
    }

    pub(super) fn make_var_template(&mut self, d: DeclId, t: &source::TemplatedDecl) -> Result<Decl, ExtractError> {
        Ok(Decl::VarTemplate(VarTemplateDecl {
            info: DeclInfo::new(self.ast.decl(d).name.clone()),
            ty: self.classify_type(t.ty)?,
            template_args: self.classify_template_args(&t.params)?,
        }))
    }

    pub(super) fn make_using(&mut self, d: DeclId) -> Decl {
        let node = self.ast.decl(d);
        let using = UsingDecl {
            info: DeclInfo::new(node.name.clone()),
        };
        match node.kind {
            DeclKind::UsingShadow => Decl::UsingShadow(using),
            DeclKind::UsingDirective => Decl::UsingDirective(using),
            _ => Decl::Using(using),
        }
    }

    // ========================================================================
    // OBJECTIVE-C
    // ========================================================================

    pub(super) fn make_objc_interface(
        &mut self,
        d: DeclId,
        iface: &source::ObjCInterfaceDecl,
    ) -> Result<Decl, ExtractError> {
        let ast = self.ast;
        self.mark_seen(d);
        let superclass = iface
            .superclass
            .map(|s| ast.decl(s).name.clone())
            .unwrap_or_default();
        let protocols: IndexSet<String> = iface
            .protocols
            .iter()
            .map(|p| ast.decl(*p).name.clone())
            .collect();

        let mut ivars = Vec::new();
        for ivar in &iface.ivars {
            let node = ast.decl(*ivar);
            let Some(field) = node.as_field() else {
                continue;
            };
            let layout = self.member_layout(field.ty)?;
            ivars.push(Field {
                name: node.name.clone(),
                ty: self.classify_field_type(field.ty, field.bit_width)?,
                bit_offset: 0,
                bit_size: layout.bit_size,
                bit_alignment: layout.bit_alignment,
            });
        }

        Ok(Decl::ObjCInterface(ObjCInterfaceDecl {
            info: DeclInfo::new(ast.decl(d).name.clone()),
            superclass,
            is_forward: !iface.has_definition,
            protocols,
            ivars,
            methods: self.make_objc_methods(&iface.methods)?,
        }))
    }

    pub(super) fn make_objc_category(
        &mut self,
        d: DeclId,
        category: &source::ObjCCategoryDecl,
    ) -> Result<Decl, ExtractError> {
        let ast = self.ast;
        self.mark_seen(d);
        Ok(Decl::ObjCCategory(ObjCCategoryDecl {
            info: DeclInfo::new(ast.decl(category.interface).name.clone()),
            category: ast.decl(d).name.clone(),
            methods: self.make_objc_methods(&category.methods)?,
        }))
    }

    pub(super) fn make_objc_protocol(
        &mut self,
        d: DeclId,
        protocol: &source::ObjCProtocolDecl,
    ) -> Result<Decl, ExtractError> {
        self.mark_seen(d);
        Ok(Decl::ObjCProtocol(ObjCProtocolDecl {
            info: DeclInfo::new(self.ast.decl(d).name.clone()),
            methods: self.make_objc_methods(&protocol.methods)?,
        }))
    }

    fn make_objc_methods(&mut self, methods: &[DeclId]) -> Result<Vec<FunctionDecl>, ExtractError> {
        let ast = self.ast;
        let mut out = Vec::with_capacity(methods.len());
        for &m in methods {
            let node = ast.decl(m);
            let DeclKind::ObjCMethod(method) = &node.kind else {
                continue;
            };
            let mut function = FunctionDecl::new(
                DeclInfo::new(node.name.clone()).at(self.location_of(m)),
                self.classify_type(method.return_type)?,
            );
            function.params = self.make_params(&method.params)?;
            function.is_variadic = method.is_variadic;
            function.objc_scope = Some(if method.is_instance {
                MethodScope::Instance
            } else {
                MethodScope::Class
            });
            out.push(function);
        }
        Ok(out)
    }
}
