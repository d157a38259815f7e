use std::fmt;

/// Collection function wrapping a plural path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralFunction {
    Element,
    Value,
    Index,
    Key,
}

impl PluralFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralFunction::Element => "element",
            PluralFunction::Value => "value",
            PluralFunction::Index => "index",
            PluralFunction::Key => "key",
        }
    }
}

/// Parsed path expression, borrowing names from the input
#[derive(Debug, Clone, PartialEq)]
pub enum PathExpr<'a> {
    /// Identification variable of a root or join
    Alias(&'a str),
    Attribute {
        base: Box<PathExpr<'a>>,
        name: &'a str,
    },
    Treat {
        base: Box<PathExpr<'a>>,
        target: &'a str,
    },
    PluralPart {
        function: PluralFunction,
        base: Box<PathExpr<'a>>,
    },
}

impl<'a> PathExpr<'a> {
    /// Identification variable the expression is rooted at
    pub fn root_alias(&self) -> &'a str {
        match self {
            PathExpr::Alias(alias) => alias,
            PathExpr::Attribute { base, .. }
            | PathExpr::Treat { base, .. }
            | PathExpr::PluralPart { base, .. } => base.root_alias(),
        }
    }
}

impl fmt::Display for PathExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Alias(alias) => write!(f, "{}", alias),
            PathExpr::Attribute { base, name } => write!(f, "{}.{}", base, name),
            PathExpr::Treat { base, target } => write!(f, "treat({} as {})", base, target),
            PathExpr::PluralPart { function, base } => {
                write!(f, "{}({})", function.as_str(), base)
            }
        }
    }
}
