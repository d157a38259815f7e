//! Physical typing of expression nodes.

use std::fmt;

use super::model_part::ModelPartResolver;
use crate::mapping_model::{BasicType, ModelPart};
use crate::sql_ast::TableGroupLookup;
use crate::sqm::{SqmExpressible, SqmExpression};

/// Physical type of an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MappingModelExpressible<'m> {
    ModelPart(ModelPart<'m>),
    Basic(&'static BasicType),
}

impl<'m> MappingModelExpressible<'m> {
    pub fn model_part(&self) -> Option<ModelPart<'m>> {
        match *self {
            MappingModelExpressible::ModelPart(part) => Some(part),
            MappingModelExpressible::Basic(_) => None,
        }
    }

    /// Column-level type, when the expression is a single value
    pub fn jdbc_mapping(&self) -> Option<&'static BasicType> {
        match *self {
            MappingModelExpressible::ModelPart(part) => part.jdbc_mapping(),
            MappingModelExpressible::Basic(basic) => Some(basic),
        }
    }
}

impl fmt::Display for MappingModelExpressible<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingModelExpressible::ModelPart(part) => write!(f, "{}", part),
            MappingModelExpressible::Basic(basic) => write!(f, "{}", basic),
        }
    }
}

impl<'m, L: TableGroupLookup<'m>> ModelPartResolver<'m, L> {
    /// Paths go through model part resolution; nodes typed with a basic type
    /// return it; anything else is undeterminable here
    pub fn resolve_expression_type(
        &self,
        node: &SqmExpression,
    ) -> Option<MappingModelExpressible<'m>> {
        match node {
            SqmExpression::Path(path) => self
                .resolve_model_part(path)
                .map(MappingModelExpressible::ModelPart),
            _ => match node.node_type() {
                Some(SqmExpressible::Basic(basic)) => Some(MappingModelExpressible::Basic(basic)),
                Some(SqmExpressible::Domain(_)) | None => None,
            },
        }
    }

    /// Types of both sides of a comparison; a side that cannot be typed on
    /// its own takes the other side's type
    pub fn infer_comparison_types(
        &self,
        lhs: &SqmExpression,
        rhs: &SqmExpression,
    ) -> (
        Option<MappingModelExpressible<'m>>,
        Option<MappingModelExpressible<'m>>,
    ) {
        let lhs_type = self.resolve_expression_type(lhs);
        let rhs_type = self.resolve_expression_type(rhs);
        match (lhs_type, rhs_type) {
            (None, Some(inferred)) => {
                log::trace!("Typing {} from {}", lhs, rhs);
                (Some(inferred), Some(inferred))
            }
            (Some(inferred), None) => {
                log::trace!("Typing {} from {}", rhs, lhs);
                (Some(inferred), Some(inferred))
            }
            types => types,
        }
    }
}
