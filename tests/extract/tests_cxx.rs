//! C++ declarations: namespaces, classes, bases, methods and templates.

use bindscan::model::{CxxRecordDecl, Decl, Type};
use bindscan::source::{
    AccessSpecifier, BaseSpecifier, BuiltinKind, ContainerDecl, CxxRecordData, DeclId, DeclKind,
    FunctionDecl, MethodDecl, Param, RecordDecl, SourceDecl, SourceType, Specialization,
    SpecializationKind, TagKind, TemplateArgument, TranslationUnit, TypeId, TypedefDecl, VarDecl,
};
use bindscan::extract::write_template_instantiations;

use crate::helpers::unit_fixtures::*;

fn cxx_record(tu: &mut TranslationUnit, name: &str, tag: TagKind, members: Vec<DeclId>, cxx: CxxRecordData) -> DeclId {
    tu.add_top_level(SourceDecl::new(
        name,
        DeclKind::Record(RecordDecl::new(tag, members).with_cxx(cxx)),
    ))
}

fn as_cxx_record(decl: &Decl) -> &CxxRecordDecl {
    match decl {
        Decl::CxxRecord(r) => r,
        other => panic!("expected a C++ record, got {other:?}"),
    }
}

// =============================================================================
// NAMESPACES AND LINKAGE
// =============================================================================

#[test]
fn test_nested_namespaces_scope_their_members() {
    let mut tu = TranslationUnit::new("ns.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let v = tu.add_decl(SourceDecl::new("v", DeclKind::Var(VarDecl::new(int).external())));
    let inner = tu.add_decl(SourceDecl::new(
        "inner",
        DeclKind::Namespace(ContainerDecl { members: vec![v] }),
    ));
    tu.add_top_level(SourceDecl::new(
        "outer",
        DeclKind::Namespace(ContainerDecl { members: vec![inner] }),
    ));

    let (driver, _) = run(&tu);
    let decls = driver.decls();
    let Decl::CxxNamespace(outer) = decls[0] else {
        panic!("expected a namespace");
    };
    let Decl::CxxNamespace(inner) = decls[1] else {
        panic!("expected a namespace");
    };
    assert_eq!((outer.info.ns, outer.id), (0, 1));
    assert_eq!((inner.info.ns, inner.id), (1, 2));
    assert_eq!(decls[2].info().ns, 2);
}

#[test]
fn test_extern_c_block_is_transparent() {
    let mut tu = TranslationUnit::new("l.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let f = tu.add_decl(SourceDecl::new("f", DeclKind::Function(FunctionDecl::new(int, vec![]))));
    tu.add_top_level(SourceDecl::new("", DeclKind::LinkageSpec(ContainerDecl { members: vec![f] })));
    let g = tu.add_decl(SourceDecl::new("g", DeclKind::Function(FunctionDecl::new(int, vec![]))));
    let block = tu.add_decl(SourceDecl::new("", DeclKind::LinkageSpec(ContainerDecl { members: vec![g] })));
    tu.add_top_level(SourceDecl::new("api", DeclKind::Namespace(ContainerDecl { members: vec![block] })));

    let (driver, _) = run(&tu);
    assert_eq!(
        driver.summary(),
        vec![
            ("function", "f".to_string()),
            ("namespace", "api".to_string()),
            ("function", "g".to_string()),
        ]
    );
    assert_eq!(driver.decl_named("f").info().ns, 0);
    assert_eq!(driver.decl_named("g").info().ns, 1);
}

// =============================================================================
// CLASSES
// =============================================================================

#[test]
fn test_virtual_and_direct_base_offsets() {
    let mut tu = TranslationUnit::new("b.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let a_field = field(&mut tu, "a", int);
    let a = cxx_record(&mut tu, "A", TagKind::Struct, vec![a_field], CxxRecordData::default());
    let v_field = field(&mut tu, "v", int);
    let v = cxx_record(&mut tu, "V", TagKind::Struct, vec![v_field], CxxRecordData::default());
    let d_field = field(&mut tu, "d", int);
    cxx_record(
        &mut tu,
        "D",
        TagKind::Class,
        vec![d_field],
        CxxRecordData {
            bases: vec![BaseSpecifier::public(a), BaseSpecifier::virtual_public(v)],
            ..CxxRecordData::default()
        },
    );

    let (driver, _) = run(&tu);
    let d = as_cxx_record(driver.decl_named("D"));
    assert!(d.is_class);
    let parents: Vec<(&str, u64, bool)> = d
        .parents
        .iter()
        .map(|p| (p.name.as_str(), p.offset, p.is_virtual))
        .collect();
    assert_eq!(parents, vec![("A", 8, false), ("V", 16, true)]);
    assert_eq!(d.parents[1].access, AccessSpecifier::Public);
    assert_eq!(d.record.fields[0].bit_offset, 96);
}

#[test]
fn test_methods_are_scoped_to_their_class() {
    let mut tu = TranslationUnit::new("m.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let void = tu.builtin(BuiltinKind::Void);
    let int_ref = tu.intern(SourceType::LValueReference(int));

    let mut area = MethodDecl::new(FunctionDecl::new(int, vec![]));
    area.is_virtual = true;
    area.is_pure = true;
    area.is_const = true;
    let area_loc = tu.loc(3, 17);
    let area = tu.add_decl(SourceDecl::new("area", DeclKind::Method(area)).located(area_loc));

    let mut make = MethodDecl::new(FunctionDecl::new(void, vec![Param::new("out", int_ref)]));
    make.is_static = true;
    let make = tu.add_decl(SourceDecl::new("make", DeclKind::Method(make)));

    cxx_record(&mut tu, "Shape", TagKind::Class, vec![area, make], CxxRecordData::default());

    let (driver, _) = run(&tu);
    let shape = as_cxx_record(driver.decl_named("Shape"));
    assert_eq!(shape.methods.len(), 2);

    let area = &shape.methods[0];
    assert_eq!(area.function.info.ns, shape.record.id);
    assert_eq!(area.function.info.location, "m.hpp:3:17");
    assert!(area.is_virtual && area.is_pure && area.is_const && !area.is_static);

    let make = &shape.methods[1];
    assert!(make.is_static);
    assert!(matches!(make.function.params[0].ty, Type::Reference(_)));

    // vptr only; the record is still written once
    assert_eq!(shape.record.bit_size, 64);
    assert_eq!(driver.decls().len(), 1);
}

#[test]
fn test_incomplete_cxx_record_is_skipped() {
    let mut tu = TranslationUnit::new("f.hpp");
    tu.add_top_level(SourceDecl::new(
        "Opaque",
        DeclKind::Record(RecordDecl::forward(TagKind::Class).with_cxx(CxxRecordData::default())),
    ));
    let (driver, _) = run(&tu);
    assert!(driver.decls().is_empty());
}

#[test]
fn test_dependent_template_has_no_fields() {
    let mut tu = TranslationUnit::new("box.hpp");
    let t = tu.intern(SourceType::TemplateTypeParm { name: "T".to_string() });
    let value = field(&mut tu, "value", t);
    let extra = field(&mut tu, "extra", t);
    let get = tu.add_decl(SourceDecl::new("get", DeclKind::Method(MethodDecl::new(FunctionDecl::new(t, vec![])))));
    cxx_record(
        &mut tu,
        "Box",
        TagKind::Class,
        vec![value, extra, get],
        CxxRecordData {
            is_dependent: true,
            ..CxxRecordData::default()
        },
    );

    let (driver, _) = run(&tu);
    let boxed = as_cxx_record(driver.decl_named("Box"));
    assert!(boxed.record.fields.is_empty());
    assert!(boxed.parents.is_empty());
    assert_eq!(boxed.record.bit_size, 0);
    assert_eq!(boxed.methods[0].function.return_type.name(), Some("T"));
}

// =============================================================================
// TEMPLATES AND ALIASES
// =============================================================================

fn box_specialization(tu: &mut TranslationUnit, kind: SpecializationKind) -> TypeId {
    let int = tu.builtin(BuiltinKind::Int);
    let ptr = tu.pointer_to(int);
    let args = vec![TemplateArgument::Type(ptr), TemplateArgument::Integral { ty: int, value: 3 }];
    let record = tu.add_decl(SourceDecl::new(
        "Box",
        DeclKind::Record(RecordDecl::forward(TagKind::Class).with_cxx(CxxRecordData {
            specialization: Some(Specialization {
                template_name: "Box".to_string(),
                args: args.clone(),
                kind,
                is_partial: false,
            }),
            ..CxxRecordData::default()
        })),
    ));
    tu.intern(SourceType::TemplateSpecialization {
        template_name: "Box".to_string(),
        args,
        record: Some(record),
    })
}

#[test]
fn test_template_reference_and_instantiation_list() {
    let mut tu = TranslationUnit::new("box.hpp");
    let spec = box_specialization(&mut tu, SpecializationKind::Undeclared);
    let ptr = tu.pointer_to(spec);
    tu.add_top_level(SourceDecl::new("current", DeclKind::Var(VarDecl::new(ptr).external())));

    let (driver, extraction) = run(&tu);
    let Decl::Var(current) = driver.decl_named("current") else {
        panic!("expected a var");
    };
    let Type::Pointer(p) = &current.ty else {
        panic!("expected a pointer");
    };
    let Type::Template(t) = p.pointee.as_ref() else {
        panic!("expected a template type");
    };
    assert_eq!(t.name, "Box");
    assert_ne!(t.id, 0);
    assert_eq!(t.args.len(), 2);
    assert_eq!(t.args[1].value.as_deref(), Some("3"));

    let mut out = Vec::new();
    let written = write_template_instantiations(&tu, &extraction.registry, &mut out).unwrap();
    assert_eq!(written, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "#include \"box.hpp\"\ntemplate class Box<int *, 3>;\n"
    );
}

#[test]
fn test_run_writes_template_instantiations_when_asked() {
    let mut tu = TranslationUnit::new("box.hpp");
    let spec = box_specialization(&mut tu, SpecializationKind::Undeclared);
    let ptr = tu.pointer_to(spec);
    tu.add_top_level(SourceDecl::new("current", DeclKind::Var(VarDecl::new(ptr).external())));

    let mut config = bindscan::ExtractConfig {
        arch: Some("x86_64-unknown-linux-gnu".to_string()),
        ..bindscan::ExtractConfig::default()
    };
    let mut templates = Vec::new();
    let side = bindscan::SideOutputs {
        templates: Some(&mut templates),
        ..bindscan::SideOutputs::default()
    };
    bindscan::run_with(&config, &tu, std::io::sink(), side).unwrap();
    assert!(templates.is_empty());

    config.template_instantiations = true;
    let side = bindscan::SideOutputs {
        templates: Some(&mut templates),
        ..bindscan::SideOutputs::default()
    };
    let extraction = bindscan::run_with(&config, &tu, std::io::sink(), side).unwrap();
    assert_eq!(extraction.summary.emitted, 1);
    assert_eq!(
        String::from_utf8(templates).unwrap(),
        "#include \"box.hpp\"\ntemplate class Box<int *, 3>;\n"
    );

    let err = bindscan::run(&config, &tu, std::io::sink()).unwrap_err();
    assert!(matches!(
        err,
        bindscan::ExtractError::Config(bindscan::ConfigError::Conflict(_))
    ));
}

#[test]
fn test_instantiated_specializations_are_not_listed() {
    let mut tu = TranslationUnit::new("box.hpp");
    let spec = box_specialization(&mut tu, SpecializationKind::ImplicitInstantiation);
    let ptr = tu.pointer_to(spec);
    tu.add_top_level(SourceDecl::new("current", DeclKind::Var(VarDecl::new(ptr).external())));

    let (_, extraction) = run(&tu);
    let mut out = Vec::new();
    assert_eq!(write_template_instantiations(&tu, &extraction.registry, &mut out).unwrap(), 0);
}

#[test]
fn test_aliases_and_using_declarations() {
    let mut tu = TranslationUnit::new("u.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    tu.add_top_level(SourceDecl::new("Int", DeclKind::TypeAlias(TypedefDecl { underlying: int })));
    tu.add_top_level(SourceDecl::new("swap", DeclKind::Using));
    tu.add_top_level(SourceDecl::new("std", DeclKind::UsingDirective));
    tu.add_top_level(SourceDecl::new("Tmpl", DeclKind::ClassTemplate));

    let (driver, _) = run(&tu);
    assert_eq!(
        driver.summary(),
        vec![
            ("type-alias", "Int".to_string()),
            ("using", "swap".to_string()),
            ("using-directive", "std".to_string()),
        ]
    );
}
