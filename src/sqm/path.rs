//! Query paths.
//!
//! An [`SqmPath`] is one node of a navigation chain: a root over an entity or a
//! CTE, an attribute step, a treat (downcast) step or an explicit collection
//! part (`element(..)`, `index(..)`, `key(..)`). Each node holds its parent
//! (`lhs`) behind an `Arc`, so sub-paths share their prefix.
//!
//! Building a path only consults the logical path sources. Mapping a path onto
//! the physical model is the resolver's job.

use std::fmt;
use std::sync::Arc;

use super::cte::SqmCteTable;
use super::errors::SqmPathError;
use super::navigable_path::NavigablePath;
use crate::domain_model::BasicKind;
use crate::mapping_model::CollectionPartNature;
use crate::path_source::{PathSourceRegistry, PluralPathSource, SqmPathSource};

#[derive(Debug, Clone, PartialEq)]
pub enum SqmPathKind {
    Root {
        source: Arc<SqmPathSource>,
        alias: Option<String>,
    },
    CteRoot {
        cte: Arc<SqmCteTable>,
        alias: Option<String>,
    },
    CteColumn {
        name: String,
        kind: BasicKind,
    },
    Attribute {
        source: Arc<SqmPathSource>,
        /// Set when the attribute is plural
        plural: Option<Arc<PluralPathSource>>,
    },
    /// `treat(lhs as Target)`
    Treated { target: Arc<SqmPathSource> },
    PluralPart {
        nature: CollectionPartNature,
        source: Arc<SqmPathSource>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqmPath {
    navigable_path: NavigablePath,
    lhs: Option<Arc<SqmPath>>,
    kind: SqmPathKind,
}

impl SqmPath {
    /// Query root over an entity, e.g. `from Auction a`
    pub fn root(
        entity_name: &str,
        alias: Option<&str>,
        registry: &PathSourceRegistry,
    ) -> Result<Self, SqmPathError> {
        let source = registry.root_path_source(entity_name)?;
        Ok(SqmPath {
            navigable_path: NavigablePath::root(entity_name, alias),
            lhs: None,
            kind: SqmPathKind::Root {
                source,
                alias: alias.map(str::to_string),
            },
        })
    }

    /// Query root over a common table expression
    pub fn cte_root(cte: Arc<SqmCteTable>, alias: Option<&str>) -> Self {
        SqmPath {
            navigable_path: NavigablePath::root(cte.name.clone(), alias),
            lhs: None,
            kind: SqmPathKind::CteRoot {
                cte,
                alias: alias.map(str::to_string),
            },
        }
    }

    /// De-reference `name` from this path
    pub fn get(&self, name: &str, registry: &PathSourceRegistry) -> Result<Self, SqmPathError> {
        self.navigate(name, None, registry)
    }

    /// Explicit join of `name` under `alias`, e.g. `join a.bids b`
    pub fn join(
        &self,
        name: &str,
        alias: &str,
        registry: &PathSourceRegistry,
    ) -> Result<Self, SqmPathError> {
        self.navigate(name, Some(alias), registry)
    }

    fn navigate(
        &self,
        name: &str,
        alias: Option<&str>,
        registry: &PathSourceRegistry,
    ) -> Result<Self, SqmPathError> {
        if let SqmPathKind::CteRoot { cte, .. } = &self.kind {
            let column = cte
                .column(name)
                .ok_or_else(|| SqmPathError::UnknownCteColumn {
                    cte: cte.name.clone(),
                    column: name.to_string(),
                })?;
            return Ok(self.child(
                self.navigable_path.append_with_alias(name, alias),
                SqmPathKind::CteColumn {
                    name: column.name.clone(),
                    kind: column.kind,
                },
            ));
        }

        let parent_source = self.navigation_source().ok_or_else(|| SqmPathError::NotNavigable {
            path: self.navigable_path.to_string(),
        })?;
        if !parent_source.is_navigable() {
            return Err(SqmPathError::NotNavigable {
                path: self.navigable_path.to_string(),
            });
        }

        let source = registry
            .find_sub_path_source(parent_source, name)
            .ok_or_else(|| SqmPathError::UnknownAttribute {
                path: self.navigable_path.to_string(),
                name: name.to_string(),
            })?;
        let plural = registry.plural_path_source(parent_source, name);
        log::trace!("{} -> {}", self.navigable_path, source);

        Ok(self.child(
            self.navigable_path
                .append_with_alias(source.path_name(), alias),
            SqmPathKind::Attribute { source, plural },
        ))
    }

    /// Downcast to `type_name`. The target is not checked against the
    /// static type here; see `resolver::validate_treat`.
    pub fn treat_as(
        &self,
        type_name: &str,
        registry: &PathSourceRegistry,
    ) -> Result<Self, SqmPathError> {
        let target = registry
            .managed_type_source(type_name)
            .ok_or_else(|| SqmPathError::UnknownManagedType {
                type_name: type_name.to_string(),
            })?;
        Ok(self.child(
            self.navigable_path.treat_as(type_name),
            SqmPathKind::Treated { target },
        ))
    }

    pub fn element(&self) -> Result<Self, SqmPathError> {
        let plural = self.plural_source()?;
        Ok(self.plural_part(CollectionPartNature::Element, plural.element.clone()))
    }

    /// Map values are the collection's elements
    pub fn value(&self) -> Result<Self, SqmPathError> {
        self.element()
    }

    /// List index or map key
    pub fn index(&self) -> Result<Self, SqmPathError> {
        let plural = self.plural_source()?;
        let index = plural.index.clone().ok_or_else(|| SqmPathError::NotIndexed {
            path: self.navigable_path.to_string(),
        })?;
        Ok(self.plural_part(CollectionPartNature::Index, index))
    }

    pub fn key(&self) -> Result<Self, SqmPathError> {
        self.index()
    }

    pub fn collection_id(&self) -> Result<Self, SqmPathError> {
        let plural = self.plural_source()?;
        let identifier = plural
            .identifier
            .clone()
            .ok_or_else(|| SqmPathError::NoCollectionId {
                path: self.navigable_path.to_string(),
            })?;
        Ok(self.plural_part(CollectionPartNature::Id, identifier))
    }

    fn plural_source(&self) -> Result<&Arc<PluralPathSource>, SqmPathError> {
        match &self.kind {
            SqmPathKind::Attribute {
                plural: Some(plural),
                ..
            } => Ok(plural),
            _ => Err(SqmPathError::NotPlural {
                path: self.navigable_path.to_string(),
            }),
        }
    }

    fn plural_part(&self, nature: CollectionPartNature, source: Arc<SqmPathSource>) -> Self {
        self.child(
            self.navigable_path.append(nature.name()),
            SqmPathKind::PluralPart { nature, source },
        )
    }

    fn child(&self, navigable_path: NavigablePath, kind: SqmPathKind) -> Self {
        SqmPath {
            navigable_path,
            lhs: Some(Arc::new(self.clone())),
            kind,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn navigable_path(&self) -> &NavigablePath {
        &self.navigable_path
    }

    pub fn lhs(&self) -> Option<&SqmPath> {
        self.lhs.as_deref()
    }

    pub fn kind(&self) -> &SqmPathKind {
        &self.kind
    }

    pub fn is_treated(&self) -> bool {
        matches!(self.kind, SqmPathKind::Treated { .. })
    }

    pub fn is_plural_part(&self) -> bool {
        matches!(self.kind, SqmPathKind::PluralPart { .. })
    }

    /// Logical source this node refers to; `None` for CTE nodes
    pub fn referenced_path_source(&self) -> Option<&Arc<SqmPathSource>> {
        match &self.kind {
            SqmPathKind::Root { source, .. }
            | SqmPathKind::Attribute { source, .. }
            | SqmPathKind::PluralPart { source, .. } => Some(source),
            SqmPathKind::Treated { target } => Some(target),
            SqmPathKind::CteRoot { .. } | SqmPathKind::CteColumn { .. } => None,
        }
    }

    /// Terminal name used for physical sub-part lookup
    pub fn referenced_path_name(&self) -> &str {
        match &self.kind {
            SqmPathKind::CteRoot { cte, .. } => &cte.name,
            SqmPathKind::CteColumn { name, .. } => name,
            SqmPathKind::PluralPart { nature, .. } => nature.name(),
            SqmPathKind::Root { source, .. }
            | SqmPathKind::Attribute { source, .. }
            | SqmPathKind::Treated { target: source } => source.path_name(),
        }
    }

    /// Treat target entity name, for treated paths narrowing to an entity
    pub fn treat_target_entity(&self) -> Option<&str> {
        match &self.kind {
            SqmPathKind::Treated { target } => target.entity_name(),
            _ => None,
        }
    }

    /// Alias given to this node in the query, if any
    pub fn explicit_alias(&self) -> Option<&str> {
        self.navigable_path.alias()
    }

    /// Source whose sub-sources are reachable from this node
    fn navigation_source(&self) -> Option<&SqmPathSource> {
        self.referenced_path_source().map(Arc::as_ref)
    }
}

impl fmt::Display for SqmPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.navigable_path, f)
    }
}
