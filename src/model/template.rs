//! Template arguments attached to specializations.

use super::Type;

/// One template argument: its type and, for non-type arguments, its value.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateArg {
    pub ty: Type,
    pub value: Option<String>,
}

impl TemplateArg {
    pub fn of_type(ty: Type) -> Self {
        Self { ty, value: None }
    }

    pub fn with_value(ty: Type, value: impl Into<String>) -> Self {
        Self {
            ty,
            value: Some(value.into()),
        }
    }
}

pub type TemplateArgs = Vec<TemplateArg>;
