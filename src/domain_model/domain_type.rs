//! Logical domain types.
//!
//! The variant set is closed: every consumer matches exhaustively, and the
//! [`DomainType::Tuple`] variant stands for query-defined shapes that have no
//! navigable path source.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a type inside a [`DomainModel`](super::DomainModel) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainTypeId(pub(crate) u32);

impl DomainTypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Value kinds understood by the basic type system.
///
/// The same enum describes both the logical kind of an attribute and the
/// relational kind it is stored as (an `Enum` stored as `Integer`, say).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Boolean,
    Integer,
    Long,
    Double,
    Decimal,
    String,
    Date,
    Timestamp,
    Uuid,
    Binary,
    Enum,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Boolean => "boolean",
            BasicKind::Integer => "integer",
            BasicKind::Long => "long",
            BasicKind::Double => "double",
            BasicKind::Decimal => "decimal",
            BasicKind::String => "string",
            BasicKind::Date => "date",
            BasicKind::Timestamp => "timestamp",
            BasicKind::Uuid => "uuid",
            BasicKind::Binary => "binary",
            BasicKind::Enum => "enum",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JPA-style persistence type of a managed or basic type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceType {
    Basic,
    Embeddable,
    Entity,
    MappedSuperclass,
}

/// How a plural attribute stores its elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionClassification {
    Bag,
    Set,
    List,
    Map,
    IdBag,
}

impl CollectionClassification {
    /// Lists and maps expose an `{index}` part (list position or map key)
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            CollectionClassification::List | CollectionClassification::Map
        )
    }

    /// Id-bags carry a surrogate `{collection-id}` column
    pub fn has_identifier(self) -> bool {
        matches!(self, CollectionClassification::IdBag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeNature {
    Singular,
    Plural {
        classification: CollectionClassification,
        /// List index or map key type
        index_type: Option<DomainTypeId>,
    },
}

/// One named attribute of a managed type.
///
/// For plural attributes `value_type` is the element type.
#[derive(Debug, Clone, PartialEq)]
pub struct SqmAttribute {
    pub name: String,
    pub value_type: DomainTypeId,
    pub nature: AttributeNature,
    /// Storage kind when it differs from the logical kind of a basic value
    pub relational_kind: Option<BasicKind>,
    /// Declared against a type variable on a mapped supertype
    pub is_generic: bool,
}

impl SqmAttribute {
    pub fn singular(name: impl Into<String>, value_type: DomainTypeId) -> Self {
        SqmAttribute {
            name: name.into(),
            value_type,
            nature: AttributeNature::Singular,
            relational_kind: None,
            is_generic: false,
        }
    }

    pub fn plural(
        name: impl Into<String>,
        element_type: DomainTypeId,
        classification: CollectionClassification,
        index_type: Option<DomainTypeId>,
    ) -> Self {
        SqmAttribute {
            name: name.into(),
            value_type: element_type,
            nature: AttributeNature::Plural {
                classification,
                index_type,
            },
            relational_kind: None,
            is_generic: false,
        }
    }

    pub fn stored_as(mut self, relational_kind: BasicKind) -> Self {
        self.relational_kind = Some(relational_kind);
        self
    }

    pub fn generic(mut self) -> Self {
        self.is_generic = true;
        self
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.nature, AttributeNature::Plural { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicDomainType {
    pub kind: BasicKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddableDomainType {
    pub name: String,
    pub attributes: Vec<SqmAttribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDomainType {
    /// Entity name, also the key of the physical entity descriptor
    pub name: String,
    pub attributes: Vec<SqmAttribute>,
    pub supertype: Option<DomainTypeId>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedSupertypeDomainType {
    pub name: String,
    pub attributes: Vec<SqmAttribute>,
    pub supertype: Option<DomainTypeId>,
}

/// Polymorphic association resolved through a discriminator column
#[derive(Debug, Clone, PartialEq)]
pub struct AnyMappingDomainType {
    pub discriminator_kind: BasicKind,
    pub key_kind: BasicKind,
}

/// Query-defined row shape (CTE columns, tuple selections)
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub name: String,
    pub components: Vec<(String, BasicKind)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainType {
    Basic(BasicDomainType),
    Embedded(EmbeddableDomainType),
    Entity(EntityDomainType),
    MappedSupertype(MappedSupertypeDomainType),
    Any(AnyMappingDomainType),
    Tuple(TupleType),
}

impl DomainType {
    /// Display name used in error messages and navigable paths
    pub fn type_name(&self) -> String {
        match self {
            DomainType::Basic(basic) => basic.kind.name().to_string(),
            DomainType::Embedded(embeddable) => embeddable.name.clone(),
            DomainType::Entity(entity) => entity.name.clone(),
            DomainType::MappedSupertype(mapped) => mapped.name.clone(),
            DomainType::Any(any) => format!("any<{},{}>", any.discriminator_kind, any.key_kind),
            DomainType::Tuple(tuple) => tuple.name.clone(),
        }
    }

    pub fn persistence_type(&self) -> Option<PersistenceType> {
        match self {
            DomainType::Basic(_) | DomainType::Any(_) => Some(PersistenceType::Basic),
            DomainType::Embedded(_) => Some(PersistenceType::Embeddable),
            DomainType::Entity(_) => Some(PersistenceType::Entity),
            DomainType::MappedSupertype(_) => Some(PersistenceType::MappedSuperclass),
            DomainType::Tuple(_) => None,
        }
    }

    /// Attributes declared directly on this type (not inherited ones)
    pub fn declared_attributes(&self) -> &[SqmAttribute] {
        match self {
            DomainType::Embedded(embeddable) => &embeddable.attributes,
            DomainType::Entity(entity) => &entity.attributes,
            DomainType::MappedSupertype(mapped) => &mapped.attributes,
            DomainType::Basic(_) | DomainType::Any(_) | DomainType::Tuple(_) => &[],
        }
    }

    pub fn supertype(&self) -> Option<DomainTypeId> {
        match self {
            DomainType::Entity(entity) => entity.supertype,
            DomainType::MappedSupertype(mapped) => mapped.supertype,
            _ => None,
        }
    }

    pub fn is_managed(&self) -> bool {
        matches!(
            self,
            DomainType::Embedded(_) | DomainType::Entity(_) | DomainType::MappedSupertype(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_classifications() {
        assert!(CollectionClassification::List.is_indexed());
        assert!(CollectionClassification::Map.is_indexed());
        assert!(!CollectionClassification::Set.is_indexed());
        assert!(!CollectionClassification::Bag.is_indexed());
        assert!(CollectionClassification::IdBag.has_identifier());
    }

    #[test]
    fn test_persistence_types() {
        let tuple = DomainType::Tuple(TupleType {
            name: "recent_bids".to_string(),
            components: vec![("amount".to_string(), BasicKind::Decimal)],
        });
        assert_eq!(tuple.persistence_type(), None);
        assert!(tuple.declared_attributes().is_empty());

        let any = DomainType::Any(AnyMappingDomainType {
            discriminator_kind: BasicKind::String,
            key_kind: BasicKind::Long,
        });
        assert_eq!(any.persistence_type(), Some(PersistenceType::Basic));
        assert_eq!(any.type_name(), "any<string,long>");
    }

    #[test]
    fn test_basic_kind_serde_names() {
        let kind: BasicKind = serde_yaml::from_str("timestamp").unwrap();
        assert_eq!(kind, BasicKind::Timestamp);
        let classification: CollectionClassification = serde_yaml::from_str("id_bag").unwrap();
        assert_eq!(classification, CollectionClassification::IdBag);
    }
}
