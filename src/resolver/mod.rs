//! Resolution of query paths and expressions against the physical model.
//!
//! # Key Components
//!
//! - [`ModelPartResolver`] - path → model part, bound to one metamodel and one
//!   table group lookup
//! - [`resolve_explicit_treat_target`] / [`validate_treat`] - treat handling
//! - [`MappingModelExpressible`] - physical type of an expression node
//!
//! The free functions below are one-shot shorthands over a fresh resolver.

pub mod errors;
pub mod expression_type;
pub mod model_part;
pub mod treat;

pub use errors::ResolutionError;
pub use expression_type::MappingModelExpressible;
pub use model_part::ModelPartResolver;
pub use treat::{resolve_entity_persister, resolve_explicit_treat_target, validate_treat};

use crate::mapping_model::{MappingMetamodel, ModelPart};
use crate::sql_ast::TableGroupLookup;
use crate::sqm::{SqmExpression, SqmPath};

pub fn resolve_model_part<'m, L: TableGroupLookup<'m>>(
    path: &SqmPath,
    metamodel: &'m MappingMetamodel,
    lookup: L,
) -> Option<ModelPart<'m>> {
    ModelPartResolver::new(metamodel, lookup).resolve_model_part(path)
}

pub fn resolve_expression_type<'m, L: TableGroupLookup<'m>>(
    node: &SqmExpression,
    metamodel: &'m MappingMetamodel,
    lookup: L,
) -> Option<MappingModelExpressible<'m>> {
    ModelPartResolver::new(metamodel, lookup).resolve_expression_type(node)
}
