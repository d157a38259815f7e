//! Semantic query tree.
//!
//! The logical side of a compiled query: navigable paths, path nodes rooted at
//! entities or CTEs, and expression nodes. Everything here is built against
//! the [`PathSourceRegistry`](crate::path_source::PathSourceRegistry) and knows
//! nothing about tables or columns.

pub mod cte;
pub mod errors;
pub mod expression;
pub mod navigable_path;
pub mod path;

pub use cte::{SqmCteColumn, SqmCteTable};
pub use errors::SqmPathError;
pub use expression::{SqmExpressible, SqmExpression};
pub use navigable_path::NavigablePath;
pub use path::{SqmPath, SqmPathKind};
