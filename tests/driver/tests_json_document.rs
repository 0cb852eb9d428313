//! JSON documents produced by whole extraction runs.

use bindscan::source::{
    AccessSpecifier, BaseSpecifier, BuiltinKind, ConstValue, CxxRecordData, DeclKind, Initializer, ObjCInterfaceDecl,
    RecordDecl, SourceDecl, StringLiteral, TagKind, TranslationUnit, TypedefDecl, VarDecl,
};
use rstest::rstest;
use serde_json::{Value, json};

use crate::helpers::unit_fixtures::*;

fn parse(document: &str) -> Vec<Value> {
    match serde_json::from_str(document) {
        Ok(Value::Array(items)) => items,
        other => panic!("expected a JSON array, got {other:?}\n{document}"),
    }
}

#[test]
fn test_extern_var_document_is_exact() {
    let mut tu = TranslationUnit::new("v.h");
    let int = tu.builtin(BuiltinKind::Int);
    let loc = tu.loc(2, 12);
    tu.add_top_level(SourceDecl::new("counter", DeclKind::Var(VarDecl::new(int).external())).located(loc));

    assert_eq!(
        run_json(&tu, None),
        "[\n{ \"tag\": \"extern\", \"name\": \"counter\", \"ns\": 0, \"location\": \"v.h:2:12\", \
         \"type\": { \"tag\": \":int\", \"bit-size\": 32, \"bit-alignment\": 32 } }\n]\n"
    );
}

#[test]
fn test_namespace_only_document_is_valid_json() {
    let tu = TranslationUnit::new("empty.h");
    let document = run_json(&tu, Some("ffi"));
    assert_eq!(parse(&document), vec![json!({ "tag": "namespace", "name": "ffi" })]);
}

#[test]
fn test_point_struct_document() {
    let (tu, _) = point_unit();
    let items = parse(&run_json(&tu, Some("geo")));
    assert_eq!(items[0], json!({ "tag": "namespace", "name": "geo" }));

    let p = &items[1];
    assert_eq!(p["tag"], "struct");
    assert_eq!(p["name"], "P");
    assert_eq!(p["id"], 1);
    assert_eq!(p["bit-alignment"], 32);
    assert_eq!(p["fields"][0]["bit-offset"], 0);
    assert_eq!(p["fields"][1]["name"], "y");
    assert_eq!(p["fields"][1]["bit-offset"], 32);
    assert_eq!(p["fields"][1]["bit-size"], 8);
    assert_eq!(p["fields"][1]["type"]["tag"], ":char");
}

#[test]
fn test_anonymous_typedef_document_references_record_id() {
    let mut tu = TranslationUnit::new("a.h");
    let anon = c_record(&mut tu, "", TagKind::Union, vec![], 1);
    let ty = tu.record_type(anon);
    tu.add_top_level(SourceDecl::new("anon_t", DeclKind::Typedef(TypedefDecl { underlying: ty })));

    let items = parse(&run_json(&tu, None));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["tag"], "union");
    assert_eq!(
        items[1]["type"],
        json!({ "tag": ":union", "name": "", "id": items[0]["id"].clone() })
    );
}

#[test]
fn test_string_values_are_escaped() {
    let mut tu = TranslationUnit::new("s.h");
    let ch = tu.builtin(BuiltinKind::Char);
    let ptr = tu.pointer_to(ch);
    let init = Initializer::Constant(ConstValue::StringLiteral(StringLiteral::ascii("say \"hi\"\n")));
    tu.add_top_level(SourceDecl::new("greeting", DeclKind::Var(VarDecl::new(ptr).with_init(init))));
    let dbl = tu.builtin(BuiltinKind::Double);
    let inf = Initializer::Constant(ConstValue::Float(f64::INFINITY));
    tu.add_top_level(SourceDecl::new("huge", DeclKind::Var(VarDecl::new(dbl).with_init(inf))));

    let items = parse(&run_json(&tu, None));
    assert_eq!(items[0]["tag"], "const");
    assert_eq!(items[0]["value"], "say \"hi\"\n");
    assert_eq!(items[0]["type"]["tag"], ":pointer");
    assert_eq!(items[1]["value"], "inf");
}

#[test]
fn test_cxx_class_document() {
    let mut tu = TranslationUnit::new("c.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let a_field = field(&mut tu, "a", int);
    let base = tu.add_top_level(SourceDecl::new(
        "Base",
        DeclKind::Record(RecordDecl::new(TagKind::Struct, vec![a_field]).with_cxx(CxxRecordData::default())),
    ));
    let b_field = field(&mut tu, "b", int);
    tu.add_top_level(SourceDecl::new(
        "Derived",
        DeclKind::Record(RecordDecl::new(TagKind::Class, vec![b_field]).with_cxx(CxxRecordData {
            bases: vec![BaseSpecifier::virtual_public(base)],
            ..CxxRecordData::default()
        })),
    ));

    let items = parse(&run_json(&tu, None));
    let derived = &items[1];
    assert_eq!(derived["tag"], "class");
    assert_eq!(
        derived["parents"],
        json!([{ "tag": "class", "name": "Base", "offset": 12, "is_virtual": true, "access": "public" }])
    );
    assert_eq!(derived["fields"][0]["bit-offset"], 64);
    assert_eq!(derived["methods"], json!([]));
}

#[rstest]
#[case::public(AccessSpecifier::Public, "public")]
#[case::protected(AccessSpecifier::Protected, "protected")]
#[case::private(AccessSpecifier::Private, "private")]
#[case::unspecified(AccessSpecifier::None, "unknown")]
fn test_parent_access_spelling(#[case] access: AccessSpecifier, #[case] expected: &str) {
    let mut tu = TranslationUnit::new("acc.hpp");
    let base = tu.add_top_level(SourceDecl::new(
        "Base",
        DeclKind::Record(RecordDecl::new(TagKind::Struct, vec![]).with_cxx(CxxRecordData::default())),
    ));
    tu.add_top_level(SourceDecl::new(
        "Derived",
        DeclKind::Record(RecordDecl::new(TagKind::Class, vec![]).with_cxx(CxxRecordData {
            bases: vec![BaseSpecifier {
                record: base,
                access,
                is_virtual: false,
            }],
            ..CxxRecordData::default()
        })),
    ));

    let items = parse(&run_json(&tu, None));
    assert_eq!(items[1]["parents"][0]["access"], expected);
    assert_eq!(items[1]["parents"][0]["is_virtual"], false);
}

#[test]
fn test_objc_forward_interface_document() {
    let mut tu = TranslationUnit::new("f.m");
    tu.add_top_level(SourceDecl::new("Later", DeclKind::ObjCInterface(ObjCInterfaceDecl::default())));

    let items = parse(&run_json(&tu, None));
    assert_eq!(
        items[0],
        json!({
            "tag": "@class",
            "name": "Later",
            "location": "",
            "superclass": "",
            "protocols": [],
            "ivars": [],
            "methods": []
        })
    );
}
