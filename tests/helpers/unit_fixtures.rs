//! Translation-unit fixtures and extraction runners.

use bindscan::source::{
    BuiltinKind, DeclId, DeclKind, FieldDecl, NaturalLayout, RecordDecl, SourceDecl, TagKind,
    TargetInfo, TranslationUnit, TypeId,
};
use bindscan::{Extraction, JsonDriver, extract};

use super::recording_driver::RecordingDriver;

pub fn x86_64() -> TargetInfo {
    TargetInfo::from_triple("x86_64-unknown-linux-gnu").unwrap()
}

pub fn field(tu: &mut TranslationUnit, name: &str, ty: TypeId) -> DeclId {
    tu.add_decl(SourceDecl::new(name, DeclKind::Field(FieldDecl::new(ty))))
}

/// A top-level C record declared on `line`.
pub fn c_record(tu: &mut TranslationUnit, name: &str, tag: TagKind, fields: Vec<DeclId>, line: u32) -> DeclId {
    let loc = tu.loc(line, 8);
    tu.add_top_level(SourceDecl::new(name, DeclKind::Record(RecordDecl::new(tag, fields))).located(loc))
}

/// `struct P { int x; char y; };`
pub fn point_unit() -> (TranslationUnit, DeclId) {
    let mut tu = TranslationUnit::new("p.h");
    let int = tu.builtin(BuiltinKind::Int);
    let ch = tu.builtin(BuiltinKind::Char);
    let x = field(&mut tu, "x", int);
    let y = field(&mut tu, "y", ch);
    let p = c_record(&mut tu, "P", TagKind::Struct, vec![x, y], 1);
    (tu, p)
}

/// Extract `tu` for x86-64 into a recording driver.
pub fn run(tu: &TranslationUnit) -> (RecordingDriver, Extraction) {
    run_in(tu, None)
}

pub fn run_in(tu: &TranslationUnit, namespace: Option<&str>) -> (RecordingDriver, Extraction) {
    let layout = NaturalLayout::new(tu, x86_64());
    let mut driver = RecordingDriver::new();
    let extraction = extract(tu, &layout, &mut driver, namespace).unwrap();
    (driver, extraction)
}

/// Extract `tu` for x86-64 as a JSON document.
pub fn run_json(tu: &TranslationUnit, namespace: Option<&str>) -> String {
    let layout = NaturalLayout::new(tu, x86_64());
    let mut driver = JsonDriver::new(Vec::new());
    extract(tu, &layout, &mut driver, namespace).unwrap();
    String::from_utf8(driver.into_inner()).unwrap()
}
