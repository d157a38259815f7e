//! Expression nodes of the query tree.

use std::fmt;
use std::sync::Arc;

use super::path::{SqmPath, SqmPathKind};
use crate::domain_model::{BasicKind, DomainTypeId};
use crate::mapping_model::{basic_type, BasicType};
use crate::path_source::PathSourceKind;

/// Static logical type of an expression node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqmExpressible {
    /// Already a shared basic type, no mapping needed
    Basic(&'static BasicType),
    /// A managed or any-valued domain type that needs the mapping model
    Domain(DomainTypeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqmExpression {
    Path(Arc<SqmPath>),
    Literal {
        value: String,
        kind: BasicKind,
    },
    /// Named or positional parameter; `kind` is known only when the query
    /// declared or bound it
    Parameter {
        name: String,
        kind: Option<BasicKind>,
    },
    Function {
        name: String,
        arguments: Vec<SqmExpression>,
        return_kind: Option<BasicKind>,
    },
}

impl SqmExpression {
    pub fn path(path: SqmPath) -> Self {
        SqmExpression::Path(Arc::new(path))
    }

    pub fn literal(value: impl Into<String>, kind: BasicKind) -> Self {
        SqmExpression::Literal {
            value: value.into(),
            kind,
        }
    }

    pub fn parameter(name: impl Into<String>, kind: Option<BasicKind>) -> Self {
        SqmExpression::Parameter {
            name: name.into(),
            kind,
        }
    }

    pub fn as_path(&self) -> Option<&SqmPath> {
        match self {
            SqmExpression::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn node_type(&self) -> Option<SqmExpressible> {
        match self {
            SqmExpression::Path(path) => path_node_type(path),
            SqmExpression::Literal { kind, .. } => Some(SqmExpressible::Basic(basic_type(*kind))),
            SqmExpression::Parameter { kind, .. } => {
                kind.map(|kind| SqmExpressible::Basic(basic_type(kind)))
            }
            SqmExpression::Function { return_kind, .. } => {
                return_kind.map(|kind| SqmExpressible::Basic(basic_type(kind)))
            }
        }
    }
}

fn path_node_type(path: &SqmPath) -> Option<SqmExpressible> {
    if let SqmPathKind::CteColumn { kind, .. } = path.kind() {
        return Some(SqmExpressible::Basic(basic_type(*kind)));
    }
    let source = path.referenced_path_source()?;
    match source.kind() {
        PathSourceKind::Basic { kind, .. } => Some(SqmExpressible::Basic(basic_type(*kind))),
        _ => Some(SqmExpressible::Domain(source.domain_type())),
    }
}

impl fmt::Display for SqmExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqmExpression::Path(path) => write!(f, "{}", path),
            SqmExpression::Literal { value, kind } => write!(f, "{}::{}", value, kind),
            SqmExpression::Parameter { name, .. } => write!(f, ":{}", name),
            SqmExpression::Function {
                name, arguments, ..
            } => {
                write!(f, "{}(", name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}
