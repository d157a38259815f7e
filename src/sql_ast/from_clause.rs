//! Per-compilation table group index.
//!
//! [`FromClauseIndex`] plays the role of the plan builder's from-clause: it
//! materializes a [`TableGroup`] for every root and explicit join of a query
//! and answers [`TableGroupLookup`] queries for the resolver.
//!
//! Identification variables follow the `<stem><n>_0` scheme, where the stem
//! is the first letter of the entity or attribute name and `n` counts per
//! stem:
//!
//! ```text
//! from Auction a join a.bids b join a.seller s
//!   Auction(a)          auctions     a1_0
//!   Auction(a).bids(b)  bids         b1_0
//!   Auction(a).seller(s) members     s1_0
//! ```

use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::IndexMap;

use super::errors::FromClauseError;
use super::table_group::{TableGroup, TableGroupLookup, TableReference};
use crate::mapping_model::{MappingMetamodel, ModelPart};
use crate::sqm::{NavigablePath, SqmPath, SqmPathKind};

#[derive(Debug, Clone)]
pub struct FromClauseIndex<'m> {
    metamodel: &'m MappingMetamodel,
    table_groups: IndexMap<NavigablePath, TableGroup<'m>>,
    alias_counters: HashMap<String, usize>,
}

impl<'m> FromClauseIndex<'m> {
    pub fn new(metamodel: &'m MappingMetamodel) -> Self {
        FromClauseIndex {
            metamodel,
            table_groups: IndexMap::new(),
            alias_counters: HashMap::new(),
        }
    }

    pub fn metamodel(&self) -> &'m MappingMetamodel {
        self.metamodel
    }

    /// Materialize a query root. CTE roots have no physical model part and
    /// are rejected.
    pub fn add_root(&mut self, root: &SqmPath) -> Result<&TableGroup<'m>, FromClauseError> {
        let entity_name = match root.kind() {
            SqmPathKind::Root { source, .. } => source.entity_name(),
            _ => None,
        };
        let entity_name = entity_name.ok_or_else(|| FromClauseError::UnresolvedJoin {
            path: root.navigable_path().to_string(),
            reason: "not an entity root".to_string(),
        })?;
        let descriptor = self
            .metamodel
            .find_entity_descriptor(entity_name)
            .ok_or_else(|| FromClauseError::UnresolvedJoin {
                path: root.navigable_path().to_string(),
                reason: format!("no entity descriptor for `{}`", entity_name),
            })?;
        self.materialize(root, ModelPart::Entity(descriptor))
    }

    /// Materialize an explicit join. The joined path's parent must already
    /// have a table group; a treated parent is anchored on the group of the
    /// path it narrows.
    pub fn add_join(&mut self, join: &SqmPath) -> Result<&TableGroup<'m>, FromClauseError> {
        let unresolved = |reason: &str| FromClauseError::UnresolvedJoin {
            path: join.navigable_path().to_string(),
            reason: reason.to_string(),
        };
        let lhs = join.lhs().ok_or_else(|| unresolved("a root cannot be joined"))?;
        let name = join.referenced_path_name();

        let part = match lhs.treat_target_entity() {
            Some(entity_name) => {
                let anchor = lhs.lhs().ok_or_else(|| unresolved("treat without a base path"))?;
                self.get_table_group(anchor.navigable_path())?;
                let target = self
                    .metamodel
                    .find_entity_descriptor(entity_name)
                    .ok_or_else(|| unresolved("unknown treat target"))?;
                ModelPart::Entity(target).find_sub_part(name, Some(target), self.metamodel)
            }
            None => {
                let parent = self.get_table_group(lhs.navigable_path())?.model_part;
                parent.find_sub_part(name, None, self.metamodel)
            }
        };

        let part = part.ok_or_else(|| unresolved("no such physical attribute"))?;
        if !part.is_container() {
            return Err(unresolved("basic values cannot be joined"));
        }
        self.materialize(join, part)
    }

    fn materialize(
        &mut self,
        path: &SqmPath,
        model_part: ModelPart<'m>,
    ) -> Result<&TableGroup<'m>, FromClauseError> {
        if self.table_groups.contains_key(path.navigable_path()) {
            return Err(FromClauseError::DuplicateTableGroup {
                path: path.navigable_path().to_string(),
            });
        }
        let identification_variable = self.next_identification_variable(model_part.part_name());
        let group = TableGroup {
            navigable_path: path.navigable_path().clone(),
            model_part,
            source_alias: path.explicit_alias().map(str::to_string),
            primary_table: TableReference {
                table_expression: model_part.table_expression(self.metamodel).to_string(),
                identification_variable,
            },
        };
        log::debug!("Registered table group {}", group);
        self.register_table_group(group)
    }

    /// Register an externally built group
    pub fn register_table_group(
        &mut self,
        group: TableGroup<'m>,
    ) -> Result<&TableGroup<'m>, FromClauseError> {
        match self.table_groups.entry(group.navigable_path.clone()) {
            Entry::Occupied(_) => Err(FromClauseError::DuplicateTableGroup {
                path: group.navigable_path.to_string(),
            }),
            Entry::Vacant(vacant) => Ok(vacant.insert(group)),
        }
    }

    pub fn get_table_group(&self, path: &NavigablePath) -> Result<&TableGroup<'m>, FromClauseError> {
        self.table_groups
            .get(path)
            .ok_or_else(|| FromClauseError::MissingTableGroup {
                path: path.to_string(),
            })
    }

    /// Groups in registration order
    pub fn table_groups(&self) -> impl Iterator<Item = &TableGroup<'m>> {
        self.table_groups.values()
    }

    pub fn len(&self) -> usize {
        self.table_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_groups.is_empty()
    }

    fn next_identification_variable(&mut self, part_name: &str) -> String {
        let stem = part_name
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_else(|| "t".to_string());
        let counter = self.alias_counters.entry(stem.clone()).or_insert(0);
        *counter += 1;
        format!("{}{}_0", stem, counter)
    }
}

impl<'m> TableGroupLookup<'m> for FromClauseIndex<'m> {
    fn find_table_group(&self, path: &NavigablePath) -> Option<&TableGroup<'m>> {
        self.table_groups.get(path)
    }
}
