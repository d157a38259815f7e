//! Pathmap - domain path to physical mapping resolution
//!
//! This crate maps the navigation paths of a compiled query (`a.bids`,
//! `treat(n as SpecialNode).specialAttribute`, `key(a.tags)`) onto the
//! physical model parts that back them:
//! - A logical domain model and the path sources queries navigate with
//! - A physical mapping metamodel of entity descriptors and attribute mappings
//! - Table groups materialized for the roots and joins of one query
//! - Model part and expression type resolution across all three

pub mod catalog;
pub mod config;
pub mod domain_model;
pub mod mapping_model;
pub mod path_parser;
pub mod path_source;
pub mod resolver;
pub mod sql_ast;
pub mod sqm;

pub use catalog::Catalog;
pub use config::ResolverConfig;
pub use resolver::{resolve_expression_type, resolve_model_part, ModelPartResolver};
