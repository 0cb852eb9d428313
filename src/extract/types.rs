//! Type classification: front-end types to [`Type`] descriptions.

use tracing::trace;

use super::Extractor;
use crate::driver::OutputDriver;
use crate::error::LayoutError;
use crate::model::{
    ArrayType, BasicType, BitfieldType, EnumType, RecordType, ReferenceType, TemplateArg,
    TemplateArgs, TemplateType, Type,
};
use crate::source::{AstProvider, BuiltinKind, DeclId, DeclKind, LayoutOracle, SourceType, TemplateArgument, TypeId};

/// Whether `ty` names a function type, looking through sugar and typedefs.
pub(super) fn is_function_type(ast: &impl AstProvider, ty: TypeId) -> bool {
    match ast.ty(ast.desugar(ty)) {
        SourceType::Function(_) => true,
        SourceType::Typedef(decl) => match &ast.decl(*decl).kind {
            DeclKind::Typedef(t) | DeclKind::TypeAlias(t) => is_function_type(ast, t.underlying),
            _ => false,
        },
        _ => false,
    }
}

impl<A, L, D> Extractor<'_, A, L, D>
where
    A: AstProvider,
    L: LayoutOracle,
    D: OutputDriver + ?Sized,
{
    /// Describe a front-end type.
    ///
    /// Builtins carry their target layout, so this fails only when the
    /// layout oracle cannot size a builtin.
    pub(super) fn classify_type(&mut self, ty: TypeId) -> Result<Type, LayoutError> {
        let ast = self.ast;
        let classified = match ast.ty(ty) {
            SourceType::Builtin(BuiltinKind::Void) => Type::simple(":void"),
            SourceType::Builtin(kind) => {
                let layout = self.layout.type_layout(ty)?;
                Type::Basic(BasicType {
                    name: kind.ffi_name().to_string(),
                    bit_size: layout.bit_size,
                    bit_alignment: layout.bit_alignment,
                })
            }
            SourceType::Pointer(pointee) if is_function_type(ast, *pointee) => {
                Type::simple(":function-pointer")
            }
            SourceType::Pointer(pointee) => Type::pointer(self.classify_type(*pointee)?),
            SourceType::LValueReference(pointee) | SourceType::RValueReference(pointee) => {
                Type::Reference(ReferenceType {
                    pointee: Box::new(self.classify_type(*pointee)?),
                })
            }
            SourceType::ConstantArray { element, size } => Type::Array(ArrayType {
                pointee: Box::new(self.classify_type(*element)?),
                size: *size,
            }),
            SourceType::IncompleteArray { element } | SourceType::VariableArray { element } => {
                Type::Array(ArrayType {
                    pointee: Box::new(self.classify_type(*element)?),
                    size: 0,
                })
            }
            SourceType::Record(record) => Type::Record(self.record_type(*record)),
            SourceType::Enum(decl) => {
                let name = ast.decl(*decl).name.clone();
                let id = if name.is_empty() {
                    self.registry.add_decl(ast, Some(*decl))
                } else {
                    0
                };
                Type::Enum(EnumType { name, id })
            }
            SourceType::Typedef(decl) => Type::simple(ast.decl(*decl).name.clone()),
            SourceType::Elaborated(inner) | SourceType::Paren(inner) => self.classify_type(*inner)?,
            SourceType::Function(_) => Type::simple(":function"),
            SourceType::TemplateSpecialization {
                template_name,
                args,
                record,
            } => {
                let id = match record {
                    Some(r) => self.registry.add_cxx_decl(ast, Some(*r)),
                    None => 0,
                };
                Type::Template(TemplateType {
                    name: template_name.clone(),
                    id,
                    args: self.classify_template_args(args)?,
                })
            }
            SourceType::TemplateTypeParm { name } => Type::simple(name.clone()),
            SourceType::ObjCObjectPointer { interface: Some(iface) } => {
                Type::pointer(Type::simple(ast.decl(*iface).name.clone()))
            }
            SourceType::ObjCObjectPointer { interface: None } => Type::simple(":id"),
            SourceType::Unsupported { spelling } => {
                trace!(%spelling, "unsupported type passed through by name");
                Type::simple(spelling.clone())
            }
        };
        Ok(classified)
    }

    /// The declared type of a field, wrapped as a bitfield when it has a width.
    pub(super) fn classify_field_type(&mut self, ty: TypeId, bit_width: Option<u32>) -> Result<Type, LayoutError> {
        let base = self.classify_type(ty)?;
        Ok(match bit_width {
            Some(width) => Type::Bitfield(BitfieldType {
                base: Box::new(base),
                width,
            }),
            None => base,
        })
    }

    pub(super) fn classify_template_args(&mut self, args: &[TemplateArgument]) -> Result<TemplateArgs, LayoutError> {
        let mut out = TemplateArgs::with_capacity(args.len());
        for arg in args {
            out.push(match arg {
                TemplateArgument::Type(ty) => TemplateArg::of_type(self.classify_type(*ty)?),
                TemplateArgument::Integral { ty, value } => {
                    TemplateArg::with_value(self.classify_type(*ty)?, value.to_string())
                }
                TemplateArgument::Other { spelling } => TemplateArg::of_type(Type::simple(spelling.clone())),
            });
        }
        Ok(out)
    }

    /// Reference to a record by name and id, queueing it if anonymous.
    fn record_type(&mut self, record: DeclId) -> RecordType {
        let ast = self.ast;
        let node = ast.decl(record);
        let (is_union, is_class, is_cxx) = node
            .as_record()
            .map_or((false, false, false), |r| (r.is_union(), r.is_class(), r.cxx.is_some()));
        let id = if is_cxx {
            self.registry.add_cxx_decl(ast, Some(record))
        } else {
            self.registry.add_decl(ast, Some(record))
        };

        if node.name.is_empty() {
            let canonical = ast.canonical_decl(record);
            if !self.seen.contains(&canonical) && !self.pending.contains(&canonical) {
                trace!(id, "queueing anonymous record");
                self.pending.push(canonical);
            }
        }

        RecordType {
            name: node.name.clone(),
            id,
            is_union,
            is_class,
        }
    }
}
