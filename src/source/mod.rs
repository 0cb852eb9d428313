//! The front-end seam.
//!
//! The extractor never parses C itself. It walks declarations through an
//! [`AstProvider`] and asks a [`LayoutOracle`] for sizes, alignments and
//! offsets. Both are traits so that any front-end can drive an extraction;
//! [`TranslationUnit`] and [`NaturalLayout`] are the in-memory
//! implementations used by the tests and by programmatic callers.
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │   AstProvider    │      │   LayoutOracle   │
//! │  decls, types,   │      │  sizes, aligns,  │
//! │  initializers,   │      │  field and base  │
//! │  macro table     │      │  offsets (bits)  │
//! └────────┬─────────┘      └────────┬─────────┘
//!          └────────────┬────────────┘
//!                       ▼
//!                  Extractor
//! ```

mod layout;
mod macros;
mod nodes;
mod target;
mod unit;

pub use layout::NaturalLayout;
pub use macros::{MacroDefinition, MacroTable, MacroToken, MacroTokenKind};
pub use nodes::*;
pub use target::TargetInfo;
pub use unit::TranslationUnit;

use crate::base::SourceLocation;
use crate::error::LayoutError;

// ============================================================================
// AST PROVIDER
// ============================================================================

/// Read access to a parsed translation unit.
pub trait AstProvider {
    /// The declaration behind a handle.
    fn decl(&self, id: DeclId) -> &SourceDecl;

    /// The type behind a handle.
    fn ty(&self, id: TypeId) -> &SourceType;

    /// Top-level declarations in the order the front-end produced them.
    fn top_level_decls(&self) -> &[DeclId];

    /// Path of the main input file.
    fn main_file(&self) -> &str;

    /// The macro table collected while preprocessing.
    fn macros(&self) -> &MacroTable;

    /// Where the macro `name` was defined.
    fn macro_definition_location(&self, name: &str) -> Option<SourceLocation> {
        self.macros().get(name).and_then(|m| m.location.clone())
    }

    /// The first declaration of the entity `id` declares.
    fn canonical_decl(&self, id: DeclId) -> DeclId {
        self.decl(id).canonical.unwrap_or(id)
    }

    /// Constant-evaluate a variable's initializer.
    ///
    /// `None` when there is no initializer, it is not a constant, or it
    /// depends on a template parameter.
    fn evaluate_initializer(&self, var: DeclId) -> Option<ConstValue> {
        match &self.decl(var).kind {
            DeclKind::Var(v) if !v.is_type_dependent => match &v.init {
                Some(Initializer::Constant(value)) => Some(value.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Strip elaboration and parentheses.
    fn desugar(&self, mut ty: TypeId) -> TypeId {
        while let SourceType::Elaborated(inner) | SourceType::Paren(inner) = self.ty(ty) {
            ty = *inner;
        }
        ty
    }
}

// ============================================================================
// LAYOUT ORACLE
// ============================================================================

/// Size and alignment of a type, in bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeLayout {
    pub bit_size: u64,
    pub bit_alignment: u64,
}

impl TypeLayout {
    pub const fn bits(bit_size: u64, bit_alignment: u64) -> Self {
        Self {
            bit_size,
            bit_alignment,
        }
    }
}

/// Layout of a complete, non-dependent record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordLayout {
    pub bit_size: u64,
    pub bit_alignment: u64,
    /// Offset of each field, in field declaration order, in bits.
    pub field_offsets: Vec<u64>,
}

/// Target-specific layout answers.
pub trait LayoutOracle {
    fn type_layout(&self, ty: TypeId) -> Result<TypeLayout, LayoutError>;

    fn record_layout(&self, record: DeclId) -> Result<RecordLayout, LayoutError>;

    /// Offset of a non-virtual base within `record`, in bytes.
    fn base_offset(&self, record: DeclId, base: DeclId) -> Result<u64, LayoutError>;

    /// Offset of a virtual base within `record`, in bytes.
    fn vbase_offset(&self, record: DeclId, base: DeclId) -> Result<u64, LayoutError>;
}
