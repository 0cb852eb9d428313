//! Objective-C declarations: interfaces, categories and protocols.

use bindscan::model::{Decl, MethodScope, Type};
use bindscan::source::{
    BuiltinKind, DeclId, DeclKind, ObjCCategoryDecl, ObjCInterfaceDecl, ObjCMethodDecl,
    ObjCProtocolDecl, Param, SourceDecl, SourceType, TranslationUnit,
};

use crate::helpers::unit_fixtures::*;

fn method(tu: &mut TranslationUnit, name: &str, ret: bindscan::source::TypeId, is_instance: bool) -> DeclId {
    tu.add_decl(SourceDecl::new(
        name,
        DeclKind::ObjCMethod(ObjCMethodDecl {
            return_type: ret,
            params: vec![],
            is_variadic: false,
            is_instance,
        }),
    ))
}

fn protocol(tu: &mut TranslationUnit, name: &str, methods: Vec<DeclId>) -> DeclId {
    tu.add_decl(SourceDecl::new(
        name,
        DeclKind::ObjCProtocol(ObjCProtocolDecl { methods }),
    ))
}

#[test]
fn test_interface_with_ivars_and_methods() {
    let mut tu = TranslationUnit::new("w.m");
    let int = tu.builtin(BuiltinKind::Int);
    let id = tu.intern(SourceType::ObjCObjectPointer { interface: None });
    let root = tu.add_decl(SourceDecl::new("NSObject", DeclKind::ObjCInterface(ObjCInterfaceDecl::default())));
    let copying = protocol(&mut tu, "NSCopying", vec![]);
    let count_ivar = field(&mut tu, "_count", int);
    let count = method(&mut tu, "count", int, true);
    let create = method(&mut tu, "new", id, false);
    tu.add_top_level(SourceDecl::new(
        "Widget",
        DeclKind::ObjCInterface(ObjCInterfaceDecl {
            superclass: Some(root),
            has_definition: true,
            protocols: vec![copying, copying],
            ivars: vec![count_ivar],
            methods: vec![count, create],
        }),
    ));

    let (driver, _) = run(&tu);
    let Decl::ObjCInterface(w) = driver.decl_named("Widget") else {
        panic!("expected an interface");
    };
    assert!(!w.is_forward);
    assert_eq!(w.superclass, "NSObject");
    assert_eq!(w.protocols.iter().collect::<Vec<_>>(), vec!["NSCopying"]);

    assert_eq!(w.ivars.len(), 1);
    assert_eq!(w.ivars[0].name, "_count");
    assert_eq!(w.ivars[0].bit_offset, 0);
    assert_eq!(w.ivars[0].bit_size, 32);

    let scopes: Vec<(&str, Option<MethodScope>)> = w
        .methods
        .iter()
        .map(|m| (m.info.name.as_str(), m.objc_scope))
        .collect();
    assert_eq!(
        scopes,
        vec![("count", Some(MethodScope::Instance)), ("new", Some(MethodScope::Class))]
    );
    assert_eq!(w.methods[1].return_type.name(), Some(":id"));
}

#[test]
fn test_ivar_without_layout_has_zero_size() {
    let mut tu = TranslationUnit::new("v.m");
    let vec4 = tu.intern(SourceType::Unsupported {
        spelling: "simd_float4".to_string(),
    });
    let lanes = field(&mut tu, "_lanes", vec4);
    tu.add_top_level(SourceDecl::new(
        "Vector",
        DeclKind::ObjCInterface(ObjCInterfaceDecl {
            has_definition: true,
            ivars: vec![lanes],
            ..ObjCInterfaceDecl::default()
        }),
    ));

    let (driver, extraction) = run(&tu);
    let Decl::ObjCInterface(v) = driver.decl_named("Vector") else {
        panic!("expected an interface");
    };
    assert_eq!(v.ivars[0].ty, Type::simple("simd_float4"));
    assert_eq!((v.ivars[0].bit_size, v.ivars[0].bit_alignment), (0, 0));
    assert_eq!(extraction.summary.skipped_invalid, 0);
}

#[test]
fn test_forward_interface_is_a_class_declaration() {
    let mut tu = TranslationUnit::new("f.m");
    tu.add_top_level(SourceDecl::new("Later", DeclKind::ObjCInterface(ObjCInterfaceDecl::default())));

    let (driver, _) = run(&tu);
    let Decl::ObjCInterface(later) = driver.decl_named("Later") else {
        panic!("expected an interface");
    };
    assert!(later.is_forward);
    assert!(later.superclass.is_empty());
}

#[test]
fn test_category_is_named_after_its_interface() {
    let mut tu = TranslationUnit::new("c.m");
    let void = tu.builtin(BuiltinKind::Void);
    let widget = tu.add_top_level(SourceDecl::new(
        "Widget",
        DeclKind::ObjCInterface(ObjCInterfaceDecl {
            has_definition: true,
            ..ObjCInterfaceDecl::default()
        }),
    ));
    let reset = method(&mut tu, "reset", void, true);
    tu.add_top_level(SourceDecl::new(
        "Extras",
        DeclKind::ObjCCategory(ObjCCategoryDecl {
            interface: widget,
            methods: vec![reset],
        }),
    ));

    let (driver, _) = run(&tu);
    let Decl::ObjCCategory(category) = driver.decls()[1] else {
        panic!("expected a category");
    };
    assert_eq!(category.info.name, "Widget");
    assert_eq!(category.category, "Extras");
    assert_eq!(category.methods[0].return_type.name(), Some(":void"));
}

#[test]
fn test_protocol_and_object_pointers() {
    let mut tu = TranslationUnit::new("p.m");
    let widget = tu.add_top_level(SourceDecl::new(
        "Widget",
        DeclKind::ObjCInterface(ObjCInterfaceDecl {
            has_definition: true,
            ..ObjCInterfaceDecl::default()
        }),
    ));
    let widget_ptr = tu.intern(SourceType::ObjCObjectPointer { interface: Some(widget) });
    let make = tu.add_decl(SourceDecl::new(
        "makeWidget:",
        DeclKind::ObjCMethod(ObjCMethodDecl {
            return_type: widget_ptr,
            params: vec![Param::new("size", widget_ptr)],
            is_variadic: false,
            is_instance: true,
        }),
    ));
    let factory = protocol(&mut tu, "Factory", vec![make]);
    tu.push_top_level(factory);
    tu.add_top_level(SourceDecl::new("WidgetImpl", DeclKind::ObjCImplementation));

    let (driver, _) = run(&tu);
    assert_eq!(
        driver.summary(),
        vec![
            ("objc-interface", "Widget".to_string()),
            ("objc-protocol", "Factory".to_string()),
        ]
    );
    let Decl::ObjCProtocol(p) = driver.decl_named("Factory") else {
        panic!("expected a protocol");
    };
    match &p.methods[0].return_type {
        Type::Pointer(ptr) => assert_eq!(ptr.pointee.name(), Some("Widget")),
        other => panic!("expected an object pointer, got {other:?}"),
    }
}
