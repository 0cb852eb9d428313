//! Macro-constant synthesis.
//!
//! Object-like macros are invisible to the AST. This module writes a small
//! C source fragment that declares one variable per eligible macro,
//! initialized with the macro itself:
//!
//! ```text
//! const long __bindscan_BUFSIZE = BUFSIZE;
//! ```
//!
//! Compiling that fragment after the input turns each macro into an ordinary
//! variable. The extractor strips the reserved prefix and reports the
//! macro's definition site as the variable's location. Macros whose value
//! does not compile end up as invalid declarations and are skipped there.

mod numeric;

use std::io::{self, Write};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::base::MACRO_CONSTANT_PREFIX;
use crate::source::{MacroDefinition, MacroTable, MacroTokenKind};

/// Best guess at the type of a macro's value, in widening order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MacroType {
    /// Cannot be a constant.
    Invalid,
    /// Only operators and already-seen names so far.
    Ok,
    Int,
    Unsigned,
    LongLong,
    UnsignedLongLong,
    Float,
    String,
}

impl MacroType {
    /// C type used for the synthesized variable.
    pub fn c_type(self) -> &'static str {
        match self {
            MacroType::UnsignedLongLong => "unsigned long long",
            MacroType::LongLong => "long long",
            MacroType::Unsigned => "unsigned long",
            MacroType::Int | MacroType::Ok => "long",
            MacroType::Float => "double",
            MacroType::String | MacroType::Invalid => "char*",
        }
    }
}

/// Guess the type of macro `name`'s value.
///
/// Function-like, empty and unknown macros are [`MacroType::Invalid`].
/// Character constants widen to `unsigned long long`; a value made only of
/// operators and names counts as `int`.
pub fn guess_macro_type(macros: &MacroTable, name: &str) -> MacroType {
    let mut seen = FxHashSet::default();
    guess(macros, name, &mut seen)
}

// Empty bodies and other-literal tokens are `Invalid` rather than falling
// back to `int`, so such macros get no constant.
fn guess(macros: &MacroTable, name: &str, seen: &mut FxHashSet<String>) -> MacroType {
    let Some(def) = macros.get(name) else {
        return MacroType::Invalid;
    };
    if def.is_function_like || def.tokens.is_empty() {
        return MacroType::Invalid;
    }
    seen.insert(name.to_string());

    let mut result = MacroType::Ok;
    for token in &def.tokens {
        let ty = match token.kind {
            MacroTokenKind::NumericConstant => numeric::classify_numeric(&token.spelling),
            MacroTokenKind::StringLiteral => MacroType::String,
            MacroTokenKind::CharConstant => MacroType::UnsignedLongLong,
            MacroTokenKind::OtherLiteral => MacroType::Invalid,
            MacroTokenKind::Identifier if seen.contains(&token.spelling) => MacroType::Ok,
            MacroTokenKind::Identifier if macros.get(&token.spelling).is_some() => {
                guess(macros, &token.spelling, seen)
            }
            // Left for the compiler to judge: keywords, enumerators, sizeof.
            MacroTokenKind::Identifier => MacroType::Ok,
            MacroTokenKind::Punctuation => MacroType::Ok,
        };
        if ty == MacroType::Invalid {
            trace!(name, token = %token.spelling, "macro is not a constant");
            return MacroType::Invalid;
        }
        result = result.max(ty);
    }

    if result <= MacroType::Ok {
        MacroType::Int
    } else {
        result
    }
}

fn is_candidate(def: &MacroDefinition) -> bool {
    !def.is_builtin() && !def.is_function_like
}

/// Write the synthesized declarations for every eligible macro.
///
/// With `with_definitions`, each macro's `#define` is reproduced first,
/// preceded by a comment with its location, so the fragment is
/// self-contained. Returns the number of variables written.
pub fn write_macro_constants(
    macros: &MacroTable,
    out: &mut impl Write,
    with_definitions: bool,
) -> io::Result<usize> {
    let constants: Vec<(&MacroDefinition, MacroType)> = macros
        .iter()
        .filter(|def| is_candidate(def))
        .map(|def| (def, guess_macro_type(macros, &def.name)))
        .filter(|(_, ty)| *ty != MacroType::Invalid)
        .collect();

    if with_definitions {
        for (def, _) in &constants {
            let location = def.location.as_ref().map(ToString::to_string).unwrap_or_default();
            write!(out, "/* {location} */\n#define {} {}\n\n", def.name, def.body())?;
        }
    }

    for (def, ty) in &constants {
        writeln!(
            out,
            "const {} {}{} = {};",
            ty.c_type(),
            MACRO_CONSTANT_PREFIX,
            def.name,
            def.name
        )?;
    }

    debug!(
        macros = macros.len(),
        constants = constants.len(),
        "macro constants synthesized"
    );
    Ok(constants.len())
}
