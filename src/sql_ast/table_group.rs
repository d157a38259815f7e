//! Table groups: the physical side of one navigable path.

use std::fmt;

use crate::mapping_model::ModelPart;
use crate::sqm::NavigablePath;

/// A table read by the query, with the identification variable it is
/// rendered under (`a1_0`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    pub table_expression: String,
    pub identification_variable: String,
}

/// Physical cluster materializing one navigable path for one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct TableGroup<'m> {
    pub navigable_path: NavigablePath,
    /// Container sub-paths are resolved against
    pub model_part: ModelPart<'m>,
    /// Alias from the query text, if any
    pub source_alias: Option<String>,
    pub primary_table: TableReference,
}

impl TableGroup<'_> {
    pub fn identification_variable(&self) -> &str {
        &self.primary_table.identification_variable
    }
}

impl fmt::Display for TableGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} {} [{}]",
            self.navigable_path,
            self.primary_table.table_expression,
            self.primary_table.identification_variable,
            self.model_part
        )
    }
}

/// Table group lookup by navigable path, supplied by the plan builder for one
/// compilation
pub trait TableGroupLookup<'m> {
    fn find_table_group(&self, path: &NavigablePath) -> Option<&TableGroup<'m>>;
}

/// Lookup that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTableGroups;

impl<'m> TableGroupLookup<'m> for NoTableGroups {
    fn find_table_group(&self, _path: &NavigablePath) -> Option<&TableGroup<'m>> {
        None
    }
}

impl<'m, L: TableGroupLookup<'m> + ?Sized> TableGroupLookup<'m> for &L {
    fn find_table_group(&self, path: &NavigablePath) -> Option<&TableGroup<'m>> {
        (**self).find_table_group(path)
    }
}
