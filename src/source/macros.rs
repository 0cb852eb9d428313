//! Preprocessor macro table as recorded by the front-end.

use indexmap::IndexMap;

use crate::base::SourceLocation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MacroTokenKind {
    Identifier,
    NumericConstant,
    /// Ordinary or UTF-8 string literal.
    StringLiteral,
    /// Character constant of any width.
    CharConstant,
    /// Any other literal (wide strings, header names).
    OtherLiteral,
    Punctuation,
}

impl MacroTokenKind {
    pub fn is_literal(self) -> bool {
        !matches!(self, MacroTokenKind::Identifier | MacroTokenKind::Punctuation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroToken {
    pub kind: MacroTokenKind,
    pub spelling: String,
    /// Whitespace preceded this token in the definition.
    pub leading_space: bool,
}

impl MacroToken {
    pub fn new(kind: MacroTokenKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            leading_space: true,
        }
    }

    pub fn ident(spelling: &str) -> Self {
        Self::new(MacroTokenKind::Identifier, spelling)
    }

    pub fn number(spelling: &str) -> Self {
        Self::new(MacroTokenKind::NumericConstant, spelling)
    }

    pub fn string(spelling: &str) -> Self {
        Self::new(MacroTokenKind::StringLiteral, spelling)
    }

    pub fn punct(spelling: &str) -> Self {
        Self::new(MacroTokenKind::Punctuation, spelling).tight()
    }

    /// Marks the token as written without preceding whitespace.
    pub fn tight(mut self) -> Self {
        self.leading_space = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    pub location: Option<SourceLocation>,
    pub is_function_like: bool,
    pub tokens: Vec<MacroToken>,
}

impl MacroDefinition {
    pub fn object_like(name: impl Into<String>, tokens: Vec<MacroToken>) -> Self {
        Self {
            name: name.into(),
            location: None,
            is_function_like: false,
            tokens,
        }
    }

    pub fn located(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Defined by the compiler rather than by a header.
    pub fn is_builtin(&self) -> bool {
        self.location.as_ref().is_none_or(SourceLocation::is_builtin)
    }

    /// Replacement list as it was written.
    pub fn body(&self) -> String {
        let mut body = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 && token.leading_space {
                body.push(' ');
            }
            body.push_str(&token.spelling);
        }
        body
    }
}

/// Macros in definition order. A redefinition replaces the earlier entry in place.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    defs: IndexMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, def: MacroDefinition) {
        self.defs.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.defs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MacroDefinition> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
