//! A driver that records the call sequence instead of rendering it.

use std::io;

use bindscan::OutputDriver;
use bindscan::model::{
    ArrayType, BasicType, BitfieldType, Decl, EnumDecl, EnumType, FunctionDecl, PointerType,
    RecordDecl, RecordType, SimpleType, TypedefDecl, UnhandledDecl, VarDecl,
};

/// One driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Header,
    Namespace(String),
    Between,
    Decl(Decl),
    Footer,
}

/// Records every lifecycle call and declaration, in order.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub events: Vec<Event>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declaration written, in order.
    pub fn decls(&self) -> Vec<&Decl> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Decl(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// `(kind, name)` of every declaration written.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        self.decls()
            .into_iter()
            .map(|d| (d.kind_name(), d.name().to_string()))
            .collect()
    }

    pub fn between_count(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Between).count()
    }

    /// The only declaration named `name`.
    pub fn decl_named(&self, name: &str) -> &Decl {
        let found: Vec<&Decl> = self.decls().into_iter().filter(|d| d.name() == name).collect();
        assert_eq!(found.len(), 1, "expected exactly one declaration named {name:?}");
        found[0]
    }
}

impl OutputDriver for RecordingDriver {
    fn write_header(&mut self) -> io::Result<()> {
        self.events.push(Event::Header);
        Ok(())
    }

    fn write_namespace(&mut self, name: &str) -> io::Result<()> {
        self.events.push(Event::Namespace(name.to_string()));
        Ok(())
    }

    fn write_between(&mut self) -> io::Result<()> {
        self.events.push(Event::Between);
        Ok(())
    }

    fn write_footer(&mut self) -> io::Result<()> {
        self.events.push(Event::Footer);
        Ok(())
    }

    fn write_decl(&mut self, decl: &Decl) -> io::Result<()> {
        self.events.push(Event::Decl(decl.clone()));
        Ok(())
    }

    fn write_simple_type(&mut self, _ty: &SimpleType) -> io::Result<()> {
        Ok(())
    }

    fn write_basic_type(&mut self, _ty: &BasicType) -> io::Result<()> {
        Ok(())
    }

    fn write_bitfield_type(&mut self, _ty: &BitfieldType) -> io::Result<()> {
        Ok(())
    }

    fn write_pointer_type(&mut self, _ty: &PointerType) -> io::Result<()> {
        Ok(())
    }

    fn write_array_type(&mut self, _ty: &ArrayType) -> io::Result<()> {
        Ok(())
    }

    fn write_record_type(&mut self, _ty: &RecordType) -> io::Result<()> {
        Ok(())
    }

    fn write_enum_type(&mut self, _ty: &EnumType) -> io::Result<()> {
        Ok(())
    }

    fn write_unhandled(&mut self, _decl: &UnhandledDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_var(&mut self, _decl: &VarDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_function(&mut self, _decl: &FunctionDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_typedef(&mut self, _decl: &TypedefDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_record(&mut self, _decl: &RecordDecl) -> io::Result<()> {
        Ok(())
    }

    fn write_enum(&mut self, _decl: &EnumDecl) -> io::Result<()> {
        Ok(())
    }
}
