//! Explicit-instantiation list for class template specializations.
//!
//! A specialization that is only named (say, in a pointer type) is never
//! instantiated, so its layout is unknown. After a pass, the extractor can
//! write a small C++ file that includes the input and instantiates each such
//! specialization; extracting that file yields their full records.

use std::io::{self, Write};

use tracing::debug;

use super::Registry;
use crate::source::{AstProvider, SourceType, SpecializationKind, TemplateArgument, TypeId};

/// Write `#include "<input>"` and one `template class X<...>;` line per
/// uninstantiated, non-partial specialization seen during the pass.
///
/// Returns the number of instantiations written.
pub fn write_template_instantiations(
    ast: &impl AstProvider,
    registry: &Registry,
    out: &mut impl Write,
) -> io::Result<usize> {
    writeln!(out, "#include \"{}\"", ast.main_file())?;
    let mut written = 0;
    for decl in registry.cxx_decls() {
        let Some(spec) = ast
            .decl(decl)
            .as_record()
            .and_then(|r| r.cxx.as_ref())
            .and_then(|c| c.specialization.as_ref())
        else {
            continue;
        };
        if spec.kind != SpecializationKind::Undeclared || spec.is_partial {
            continue;
        }
        writeln!(
            out,
            "template class {}<{}>;",
            spec.template_name,
            args_spelling(ast, &spec.args)
        )?;
        written += 1;
    }
    debug!(written, "template instantiations written");
    Ok(written)
}

fn args_spelling(ast: &impl AstProvider, args: &[TemplateArgument]) -> String {
    args.iter()
        .map(|arg| match arg {
            TemplateArgument::Type(ty) => type_spelling(ast, *ty),
            TemplateArgument::Integral { value, .. } => value.to_string(),
            TemplateArgument::Other { spelling } => spelling.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// C++ spelling of a type, good enough for a template argument list.
fn type_spelling(ast: &impl AstProvider, ty: TypeId) -> String {
    match ast.ty(ty) {
        SourceType::Builtin(kind) => kind.c_spelling().to_string(),
        SourceType::Pointer(p) => format!("{} *", type_spelling(ast, *p)),
        SourceType::LValueReference(p) => format!("{} &", type_spelling(ast, *p)),
        SourceType::RValueReference(p) => format!("{} &&", type_spelling(ast, *p)),
        SourceType::ConstantArray { element, size } => {
            format!("{}[{}]", type_spelling(ast, *element), size)
        }
        SourceType::IncompleteArray { element } | SourceType::VariableArray { element } => {
            format!("{}[]", type_spelling(ast, *element))
        }
        SourceType::Record(d) | SourceType::Enum(d) | SourceType::Typedef(d) => ast.decl(*d).name.clone(),
        SourceType::Elaborated(inner) | SourceType::Paren(inner) => type_spelling(ast, *inner),
        SourceType::Function(proto) => {
            let mut params: Vec<String> = proto.params.iter().map(|p| type_spelling(ast, *p)).collect();
            if proto.is_variadic {
                params.push("...".to_string());
            }
            format!("{} ({})", type_spelling(ast, proto.return_type), params.join(", "))
        }
        SourceType::TemplateSpecialization { template_name, args, .. } => {
            format!("{}<{}>", template_name, args_spelling(ast, args))
        }
        SourceType::TemplateTypeParm { name } => name.clone(),
        SourceType::ObjCObjectPointer { interface: Some(iface) } => format!("{} *", ast.decl(*iface).name),
        SourceType::ObjCObjectPointer { interface: None } => "id".to_string(),
        SourceType::Unsupported { spelling } => spelling.clone(),
    }
}
