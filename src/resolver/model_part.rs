//! Model part resolution.
//!
//! Maps a query path onto the physical model part it denotes. Rules, first
//! match wins:
//!
//! ```text
//! 1. treat(p as E)            -> descriptor of E
//! 2. treat(p as E).x          -> x looked up on E, narrowed to E
//! 3. element(p.c) / key(p.c)  -> collection part of c, found from p's group;
//!                                entity elements become the entity descriptor
//! 4. root                     -> entity descriptor; CTE roots resolve to None
//! 5. p.x                      -> x looked up on p's table group, or on p
//!                                resolved recursively when p has no group
//! ```
//!
//! A path that cannot be anchored resolves to `None`. That is an expected
//! outcome (a parameter compared against a path of another query split, a root
//! replaced during polymorphic rewriting) and callers fall back to an unknown
//! type instead of failing.

use super::errors::ResolutionError;
use super::treat::validate_treat;
use crate::config::ResolverConfig;
use crate::mapping_model::{EntityMappingType, MappingMetamodel, ModelPart};
use crate::sql_ast::TableGroupLookup;
use crate::sqm::{SqmPath, SqmPathKind};

const DEFAULT_MAX_PATH_DEPTH: usize = 64;

pub struct ModelPartResolver<'m, L> {
    metamodel: &'m MappingMetamodel,
    lookup: L,
    max_path_depth: usize,
    validate_treat_targets: bool,
}

impl<'m, L: TableGroupLookup<'m>> ModelPartResolver<'m, L> {
    pub fn new(metamodel: &'m MappingMetamodel, lookup: L) -> Self {
        ModelPartResolver {
            metamodel,
            lookup,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            validate_treat_targets: false,
        }
    }

    pub fn with_config(mut self, config: &ResolverConfig) -> Self {
        self.max_path_depth = config.max_path_depth;
        self.validate_treat_targets = config.validate_treat_targets;
        self
    }

    pub fn metamodel(&self) -> &'m MappingMetamodel {
        self.metamodel
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Physical model part `path` refers to, or `None` when it cannot be
    /// anchored
    pub fn resolve_model_part(&self, path: &SqmPath) -> Option<ModelPart<'m>> {
        self.resolve_at_depth(path, 0)
    }

    /// Like [`resolve_model_part`](Self::resolve_model_part), but first checks
    /// every treat step of the chain when treat validation is enabled
    pub fn try_resolve_model_part(
        &self,
        path: &SqmPath,
    ) -> Result<Option<ModelPart<'m>>, ResolutionError> {
        if self.validate_treat_targets {
            let mut current = Some(path);
            while let Some(step) = current {
                if step.is_treated() {
                    validate_treat(step, self.metamodel)?;
                }
                current = step.lhs();
            }
        }
        Ok(self.resolve_model_part(path))
    }

    /// Resolution for callers that cannot continue without a model part
    pub fn require_model_part(&self, path: &SqmPath) -> Result<ModelPart<'m>, ResolutionError> {
        self.try_resolve_model_part(path)?
            .ok_or_else(|| ResolutionError::UnresolvedPath {
                path: path.navigable_path().to_string(),
            })
    }

    fn resolve_at_depth(&self, path: &SqmPath, depth: usize) -> Option<ModelPart<'m>> {
        if depth >= self.max_path_depth {
            log::warn!(
                "Giving up on {} after {} nested resolutions",
                path.navigable_path(),
                depth
            );
            return None;
        }

        if let Some(entity_name) = path.treat_target_entity() {
            return self.entity_descriptor(entity_name).map(ModelPart::Entity);
        }

        if let Some(entity_name) = path.lhs().and_then(SqmPath::treat_target_entity) {
            let target = self.entity_descriptor(entity_name)?;
            return ModelPart::Entity(target).find_sub_part(
                path.referenced_path_name(),
                Some(target),
                self.metamodel,
            );
        }

        if path.is_plural_part() {
            return self.resolve_plural_part(path, depth);
        }

        let Some(lhs) = path.lhs() else {
            return self.resolve_root(path);
        };

        let container = self.container_of(lhs, depth)?;
        let part = container.find_sub_part(path.referenced_path_name(), None, self.metamodel);
        log::trace!(
            "{} resolved against {} -> {}",
            path.navigable_path(),
            container,
            part.map(|part| part.to_string()).unwrap_or_else(|| "none".to_string())
        );
        part
    }

    /// `element(..)`, `index(..)` and `key(..)`: the plural attribute is found
    /// from its owner, then the collection part by name
    fn resolve_plural_part(&self, path: &SqmPath, depth: usize) -> Option<ModelPart<'m>> {
        let plural_path = path.lhs()?;
        let owner = plural_path.lhs()?;
        let plural = self.container_of(owner, depth)?.find_sub_part(
            plural_path.referenced_path_name(),
            None,
            self.metamodel,
        )?;
        let part = plural.find_sub_part(path.referenced_path_name(), None, self.metamodel)?;
        match part {
            ModelPart::Collection(collection_part) if collection_part.is_entity_valued() => {
                collection_part
                    .associated_entity_mapping_type(self.metamodel)
                    .map(ModelPart::Entity)
            }
            _ => Some(part),
        }
    }

    fn resolve_root(&self, root: &SqmPath) -> Option<ModelPart<'m>> {
        match root.kind() {
            SqmPathKind::Root { source, .. } => source
                .entity_name()
                .and_then(|entity_name| self.entity_descriptor(entity_name))
                .map(ModelPart::Entity),
            SqmPathKind::CteRoot { cte, .. } => {
                log::debug!("CTE root `{}` has no physical model part", cte.name);
                None
            }
            _ => None,
        }
    }

    /// Model part of `path`'s table group when materialized, otherwise the
    /// recursively resolved part
    fn container_of(&self, path: &SqmPath, depth: usize) -> Option<ModelPart<'m>> {
        match self.lookup.find_table_group(path.navigable_path()) {
            Some(group) => Some(group.model_part),
            None => {
                log::trace!(
                    "No table group for {}, resolving it directly",
                    path.navigable_path()
                );
                self.resolve_at_depth(path, depth + 1)
            }
        }
    }

    fn entity_descriptor(&self, entity_name: &str) -> Option<&'m EntityMappingType> {
        let descriptor = self.metamodel.find_entity_descriptor(entity_name);
        if descriptor.is_none() {
            log::warn!("No entity descriptor for `{}`", entity_name);
        }
        descriptor
    }
}
