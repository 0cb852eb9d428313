//! Extracted type descriptions.
//!
//! A [`Type`] is what a binding generator needs to know about the type of a
//! field, parameter or variable. It is a value tree: pointers own their
//! pointee, and records and enums are referenced by name and registry id
//! instead of being inlined.

use super::TemplateArgs;
use crate::base::ScopeId;

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Simple(SimpleType),
    Basic(BasicType),
    Bitfield(BitfieldType),
    Pointer(PointerType),
    Reference(ReferenceType),
    Array(ArrayType),
    Record(RecordType),
    Enum(EnumType),
    Template(TemplateType),
}

impl Type {
    pub fn simple(name: impl Into<String>) -> Self {
        Type::Simple(SimpleType { name: name.into() })
    }

    pub fn pointer(pointee: Type) -> Self {
        Type::Pointer(PointerType {
            pointee: Box::new(pointee),
        })
    }

    /// The bare name carried by simple, basic, record, enum and template types.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Simple(t) => Some(&t.name),
            Type::Basic(t) => Some(&t.name),
            Type::Record(t) => Some(&t.name),
            Type::Enum(t) => Some(&t.name),
            Type::Template(t) => Some(&t.name),
            Type::Bitfield(_) | Type::Pointer(_) | Type::Reference(_) | Type::Array(_) => None,
        }
    }
}

/// A type known only by name: `:void`, typedef names, `:function-pointer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleType {
    pub name: String,
}

/// A builtin scalar with its target size and alignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicType {
    pub name: String,
    pub bit_size: u64,
    pub bit_alignment: u64,
}

/// A bitfield of `width` bits with declared type `base`.
#[derive(Clone, Debug, PartialEq)]
pub struct BitfieldType {
    pub base: Box<Type>,
    pub width: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerType {
    pub pointee: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceType {
    pub pointee: Box<Type>,
}

/// An array; `size` is zero for incomplete and variable-length arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    pub pointee: Box<Type>,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    pub id: ScopeId,
    pub is_union: bool,
    pub is_class: bool,
}

/// Reference to an enum. `id` is non-zero only for anonymous enums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub id: ScopeId,
}

/// A class template specialization used as a type.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateType {
    pub name: String,
    pub id: ScopeId,
    pub args: TemplateArgs,
}
