//! Physical query structures for one compilation.
//!
//! # Key Components
//!
//! - [`TableGroup`] - physical cluster keyed by a navigable path
//! - [`TableGroupLookup`] - lookup boundary consumed by the resolver
//! - [`FromClauseIndex`] - materializes roots and joins, implements the lookup

pub mod errors;
pub mod from_clause;
pub mod table_group;

pub use errors::FromClauseError;
pub use from_clause::FromClauseIndex;
pub use table_group::{NoTableGroups, TableGroup, TableGroupLookup, TableReference};
