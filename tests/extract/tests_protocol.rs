//! Driver call protocol: lifecycle order, separators and determinism.

use std::io;

use bindscan::model::{
    ArrayType, BasicType, BitfieldType, EnumDecl, EnumType, FunctionDecl, PointerType, RecordDecl,
    RecordType, SimpleType, TypedefDecl, UnhandledDecl, VarDecl,
};
use bindscan::source::{
    BuiltinKind, ContainerDecl, DeclKind, NaturalLayout, SourceDecl, TranslationUnit,
    VarDecl as SourceVar,
};
use bindscan::{OutputDriver, extract};

use crate::helpers::recording_driver::Event;
use crate::helpers::unit_fixtures::*;

fn three_vars() -> TranslationUnit {
    let mut tu = TranslationUnit::new("v.h");
    let int = tu.builtin(BuiltinKind::Int);
    for name in ["a", "b", "c"] {
        tu.add_top_level(SourceDecl::new(name, DeclKind::Var(SourceVar::new(int).external())));
    }
    tu
}

#[test]
fn test_separators_between_declarations_only() {
    let tu = three_vars();
    let (driver, _) = run_in(&tu, Some("lib"));

    let shape: Vec<&str> = driver
        .events
        .iter()
        .map(|e| match e {
            Event::Header => "header",
            Event::Namespace(_) => "namespace",
            Event::Between => "between",
            Event::Decl(_) => "decl",
            Event::Footer => "footer",
        })
        .collect();
    assert_eq!(
        shape,
        vec!["header", "namespace", "decl", "between", "decl", "between", "decl", "footer"]
    );
    assert_eq!(driver.between_count(), driver.decls().len() - 1);
}

#[test]
fn test_separators_count_nested_declarations() {
    let mut tu = TranslationUnit::new("n.hpp");
    let int = tu.builtin(BuiltinKind::Int);
    let x = tu.add_decl(SourceDecl::new("x", DeclKind::Var(SourceVar::new(int).external())));
    let y = tu.add_decl(SourceDecl::new("y", DeclKind::Var(SourceVar::new(int).external())));
    tu.add_top_level(SourceDecl::new("n", DeclKind::Namespace(ContainerDecl { members: vec![x, y] })));

    let (driver, extraction) = run(&tu);
    assert_eq!(extraction.summary.emitted, 3);
    assert_eq!(driver.between_count(), 2);
}

#[test]
fn test_empty_unit_writes_header_and_footer() {
    let tu = TranslationUnit::new("empty.h");
    let (driver, extraction) = run(&tu);
    assert_eq!(driver.events, vec![Event::Header, Event::Footer]);
    assert_eq!(extraction.summary.emitted, 0);
    assert!(extraction.registry.is_empty());
}

#[test]
fn test_output_is_deterministic() {
    let (tu, _) = point_unit();
    let first = run_json(&tu, Some("geo"));
    let second = run_json(&tu, Some("geo"));
    assert_eq!(first, second);

    let (rebuilt, _) = point_unit();
    assert_eq!(first, run_json(&rebuilt, Some("geo")));
}

// =============================================================================
// C-ONLY DRIVER
// =============================================================================

/// Implements only the required methods; counts declarations by kind.
#[derive(Default)]
struct CountingDriver {
    vars: usize,
    records: usize,
}

impl OutputDriver for CountingDriver {
    fn write_simple_type(&mut self, _: &SimpleType) -> io::Result<()> {
        Ok(())
    }
    fn write_basic_type(&mut self, _: &BasicType) -> io::Result<()> {
        Ok(())
    }
    fn write_bitfield_type(&mut self, _: &BitfieldType) -> io::Result<()> {
        Ok(())
    }
    fn write_pointer_type(&mut self, _: &PointerType) -> io::Result<()> {
        Ok(())
    }
    fn write_array_type(&mut self, _: &ArrayType) -> io::Result<()> {
        Ok(())
    }
    fn write_record_type(&mut self, _: &RecordType) -> io::Result<()> {
        Ok(())
    }
    fn write_enum_type(&mut self, _: &EnumType) -> io::Result<()> {
        Ok(())
    }
    fn write_unhandled(&mut self, _: &UnhandledDecl) -> io::Result<()> {
        Ok(())
    }
    fn write_var(&mut self, _: &VarDecl) -> io::Result<()> {
        self.vars += 1;
        Ok(())
    }
    fn write_function(&mut self, _: &FunctionDecl) -> io::Result<()> {
        Ok(())
    }
    fn write_typedef(&mut self, _: &TypedefDecl) -> io::Result<()> {
        Ok(())
    }
    fn write_record(&mut self, _: &RecordDecl) -> io::Result<()> {
        self.records += 1;
        Ok(())
    }
    fn write_enum(&mut self, _: &EnumDecl) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_c_only_driver_ignores_cxx_dialects() {
    let mut tu = three_vars();
    let int = tu.builtin(BuiltinKind::Int);
    let inner = tu.add_decl(SourceDecl::new("d", DeclKind::Var(SourceVar::new(int).external())));
    tu.add_top_level(SourceDecl::new("ns", DeclKind::Namespace(ContainerDecl { members: vec![inner] })));

    let layout = NaturalLayout::new(&tu, x86_64());
    let mut driver = CountingDriver::default();
    let extraction = extract(&tu, &layout, &mut driver, None).unwrap();
    assert_eq!(driver.vars, 4);
    assert_eq!(driver.records, 0);
    assert_eq!(extraction.summary.emitted, 5);
}
