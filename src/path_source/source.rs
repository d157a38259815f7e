//! Path source nodes.
//!
//! A [`SqmPathSource`] describes what a path step refers to on the logical
//! side: its name, the domain type it exposes, and whether it is a single value
//! or a collection. Sources are immutable and shared through `Arc`.

use std::fmt;
use std::sync::Arc;

use crate::domain_model::{BasicKind, CollectionClassification, DomainTypeId, PersistenceType};

/// JPA bindable type of a path source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindableType {
    SingularAttribute,
    PluralAttribute,
    EntityType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSourceKind {
    /// Leaf value. `relational_kind` is the storage kind, which may differ from
    /// the logical kind (an enum stored as an integer).
    Basic {
        kind: BasicKind,
        relational_kind: BasicKind,
    },
    /// Discriminated association; only its discriminator and key are navigable
    AnyMapping {
        discriminator_kind: BasicKind,
        key_kind: BasicKind,
    },
    Embedded { embeddable_name: String },
    Entity { entity_name: String },
    /// Never a query root
    MappedSupertype { type_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqmPathSource {
    name: String,
    path_model: Option<Arc<SqmPathSource>>,
    domain_type: DomainTypeId,
    kind: PathSourceKind,
    bindable_type: BindableType,
    is_generic: bool,
}

impl SqmPathSource {
    pub(crate) fn new(
        name: String,
        path_model: Option<Arc<SqmPathSource>>,
        domain_type: DomainTypeId,
        kind: PathSourceKind,
        bindable_type: BindableType,
        is_generic: bool,
    ) -> Self {
        SqmPathSource {
            name,
            path_model,
            domain_type,
            kind,
            bindable_type,
            is_generic,
        }
    }

    /// Name of the step, e.g. `bids` or `{element}`
    pub fn path_name(&self) -> &str {
        &self.name
    }

    /// The source this one refines, when an inherited attribute was
    /// re-resolved on a subtype
    pub fn path_model(&self) -> Option<&Arc<SqmPathSource>> {
        self.path_model.as_ref()
    }

    /// Type whose attributes are navigated from this source. For plural
    /// attributes this is the element type.
    pub fn domain_type(&self) -> DomainTypeId {
        self.domain_type
    }

    pub fn kind(&self) -> &PathSourceKind {
        &self.kind
    }

    pub fn bindable_type(&self) -> BindableType {
        self.bindable_type
    }

    pub fn is_generic(&self) -> bool {
        self.is_generic
    }

    pub fn is_plural(&self) -> bool {
        self.bindable_type == BindableType::PluralAttribute
    }

    pub fn entity_name(&self) -> Option<&str> {
        match &self.kind {
            PathSourceKind::Entity { entity_name } => Some(entity_name),
            _ => None,
        }
    }

    pub fn persistence_type(&self) -> PersistenceType {
        match self.kind {
            PathSourceKind::Basic { .. } | PathSourceKind::AnyMapping { .. } => {
                PersistenceType::Basic
            }
            PathSourceKind::Embedded { .. } => PersistenceType::Embeddable,
            PathSourceKind::Entity { .. } => PersistenceType::Entity,
            PathSourceKind::MappedSupertype { .. } => PersistenceType::MappedSuperclass,
        }
    }

    /// Whether sub-paths can be de-referenced from this source
    pub fn is_navigable(&self) -> bool {
        !matches!(self.kind, PathSourceKind::Basic { .. })
    }

    pub fn type_name(&self) -> String {
        match &self.kind {
            PathSourceKind::Basic { kind, .. } => kind.name().to_string(),
            PathSourceKind::AnyMapping {
                discriminator_kind,
                key_kind,
            } => format!("any<{},{}>", discriminator_kind, key_kind),
            PathSourceKind::Embedded { embeddable_name } => embeddable_name.clone(),
            PathSourceKind::Entity { entity_name } => entity_name.clone(),
            PathSourceKind::MappedSupertype { type_name } => type_name.clone(),
        }
    }
}

impl fmt::Display for SqmPathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.type_name())?;
        if self.is_plural() {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Extra sources exposed by a plural attribute
#[derive(Debug, Clone, PartialEq)]
pub struct PluralPathSource {
    pub attribute: Arc<SqmPathSource>,
    pub classification: CollectionClassification,
    /// `{element}` source
    pub element: Arc<SqmPathSource>,
    /// `{index}` source for lists and maps
    pub index: Option<Arc<SqmPathSource>>,
    /// `{collection-id}` source for id-bags
    pub identifier: Option<Arc<SqmPathSource>>,
}
