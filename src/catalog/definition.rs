//! Serde model of a model definition file.
//!
//! ```yaml
//! name: auction_house
//! embeddables:
//!   - name: Money
//!     attributes:
//!       - { name: amount, type: decimal, column: amount }
//! entities:
//!   - name: Auction
//!     table: auctions
//!     id: { name: id, type: long, column: auction_id }
//!     attributes:
//!       - { name: reserve, embedded: Money, column_prefix: reserve_ }
//!       - name: bids
//!         plural:
//!           classification: list
//!           key_column: auction_id
//!           element: { entity: Bid, column: bid_id }
//!           index: { type: integer, column: position }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use crate::domain_model::{BasicKind, CollectionClassification};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub embeddables: Vec<EmbeddableDefinition>,
    #[serde(default)]
    pub mapped_supertypes: Vec<MappedSupertypeDefinition>,
    pub entities: Vec<EntityDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddableDefinition {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedSupertypeDefinition {
    pub name: String,
    #[serde(default)]
    pub supertype: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    /// Required on hierarchy roots; subtypes default to the root's table
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub supertype: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub id: Option<IdDefinition>,
    #[serde(default)]
    pub discriminator: Option<DiscriminatorDefinition>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BasicKind,
    pub column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscriminatorDefinition {
    pub column: String,
    #[serde(rename = "type", default = "default_discriminator_kind")]
    pub kind: BasicKind,
    #[serde(default)]
    pub value: Option<String>,
}

fn default_discriminator_kind() -> BasicKind {
    BasicKind::String
}

/// One attribute. Exactly one of `type`, `embedded`, `to_one`, `plural` and
/// `any` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<BasicKind>,
    #[serde(default)]
    pub column: Option<String>,
    /// Storage kind when it differs from `type`
    #[serde(default)]
    pub stored_as: Option<BasicKind>,
    #[serde(default)]
    pub embedded: Option<String>,
    #[serde(default)]
    pub column_prefix: Option<String>,
    #[serde(default)]
    pub to_one: Option<String>,
    #[serde(default)]
    pub join_column: Option<String>,
    #[serde(default)]
    pub plural: Option<PluralDefinition>,
    #[serde(default)]
    pub any: Option<AnyDefinition>,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluralDefinition {
    pub classification: CollectionClassification,
    /// Collection table; omitted for one-to-many over the element's table
    #[serde(default)]
    pub table: Option<String>,
    pub key_column: String,
    pub element: ElementDefinition,
    #[serde(default)]
    pub index: Option<IndexDefinition>,
    /// Surrogate id column of an `id_bag`
    #[serde(default)]
    pub id_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementDefinition {
    #[serde(rename = "type", default)]
    pub kind: Option<BasicKind>,
    #[serde(default)]
    pub embedded: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub column_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    #[serde(rename = "type")]
    pub kind: BasicKind,
    pub column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnyDefinition {
    pub discriminator: BasicKind,
    pub key: BasicKind,
    pub discriminator_column: String,
    pub key_column: String,
    /// Discriminator value to entity name
    #[serde(default)]
    pub values: Vec<AnyValueDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnyValueDefinition {
    pub value: String,
    pub entity: String,
}

// ============================================================================
// Classified views
// ============================================================================

/// What an attribute definition describes, once checked
#[derive(Debug, Clone, Copy)]
pub(crate) enum AttributeKind<'d> {
    Basic {
        kind: BasicKind,
        column: &'d str,
        stored_as: Option<BasicKind>,
    },
    Embedded {
        embeddable: &'d str,
        column_prefix: &'d str,
    },
    ToOne {
        target: &'d str,
        join_column: &'d str,
    },
    Plural(&'d PluralDefinition),
    Any(&'d AnyDefinition),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ElementKind<'d> {
    Basic { kind: BasicKind, column: &'d str },
    Embedded {
        embeddable: &'d str,
        column_prefix: &'d str,
    },
    Entity { target: &'d str, column: &'d str },
}

impl AttributeDefinition {
    pub(crate) fn classify(&self, owner: &str) -> Result<AttributeKind<'_>, CatalogError> {
        let set = [
            self.kind.is_some(),
            self.embedded.is_some(),
            self.to_one.is_some(),
            self.plural.is_some(),
            self.any.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if set != 1 {
            return Err(CatalogError::invalid(format!(
                "attribute `{}.{}` must set exactly one of type, embedded, to_one, plural, any",
                owner, self.name
            )));
        }

        let missing = |field: &str| {
            CatalogError::invalid(format!(
                "attribute `{}.{}` needs `{}`",
                owner, self.name, field
            ))
        };

        if let Some(kind) = self.kind {
            let column = self.column.as_deref().ok_or_else(|| missing("column"))?;
            return Ok(AttributeKind::Basic {
                kind,
                column,
                stored_as: self.stored_as,
            });
        }
        if let Some(embeddable) = &self.embedded {
            return Ok(AttributeKind::Embedded {
                embeddable,
                column_prefix: self.column_prefix.as_deref().unwrap_or(""),
            });
        }
        if let Some(target) = &self.to_one {
            let join_column = self
                .join_column
                .as_deref()
                .ok_or_else(|| missing("join_column"))?;
            return Ok(AttributeKind::ToOne {
                target,
                join_column,
            });
        }
        if let Some(plural) = &self.plural {
            return Ok(AttributeKind::Plural(plural));
        }
        match &self.any {
            Some(any) => Ok(AttributeKind::Any(any)),
            None => Err(missing("type")),
        }
    }
}

impl ElementDefinition {
    pub(crate) fn classify(&self, role: &str) -> Result<ElementKind<'_>, CatalogError> {
        let set = [self.kind.is_some(), self.embedded.is_some(), self.entity.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        if set != 1 {
            return Err(CatalogError::invalid(format!(
                "element of `{}` must set exactly one of type, embedded, entity",
                role
            )));
        }
        let column = || {
            self.column.as_deref().ok_or_else(|| {
                CatalogError::invalid(format!("element of `{}` needs `column`", role))
            })
        };
        if let Some(kind) = self.kind {
            return Ok(ElementKind::Basic {
                kind,
                column: column()?,
            });
        }
        if let Some(embeddable) = &self.embedded {
            return Ok(ElementKind::Embedded {
                embeddable,
                column_prefix: self.column_prefix.as_deref().unwrap_or(""),
            });
        }
        match &self.entity {
            Some(target) => Ok(ElementKind::Entity {
                target,
                column: column()?,
            }),
            None => Err(CatalogError::invalid(format!(
                "element of `{}` has no type",
                role
            ))),
        }
    }
}

// ============================================================================
// Loading and validation
// ============================================================================

impl ModelDefinition {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
            error: e.to_string(),
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Load by extension: `.json` is JSON, anything else YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .map(|extension| extension.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
                error: e.to_string(),
            })?;
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_file(path)
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn mapped_supertype(&self, name: &str) -> Option<&MappedSupertypeDefinition> {
        self.mapped_supertypes
            .iter()
            .find(|mapped| mapped.name == name)
    }

    pub fn embeddable(&self, name: &str) -> Option<&EmbeddableDefinition> {
        self.embeddables
            .iter()
            .find(|embeddable| embeddable.name == name)
    }

    /// Structural checks that do not need the built models
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.entities.is_empty() {
            return Err(CatalogError::invalid(
                "model must contain at least one entity definition",
            ));
        }

        let mut seen = HashSet::new();
        let names = self
            .embeddables
            .iter()
            .map(|e| &e.name)
            .chain(self.mapped_supertypes.iter().map(|m| &m.name))
            .chain(self.entities.iter().map(|e| &e.name));
        for name in names {
            if !seen.insert(name) {
                return Err(CatalogError::invalid(format!("duplicate type name: {}", name)));
            }
        }

        for entity in &self.entities {
            if let Some(supertype) = &entity.supertype {
                if self.entity(supertype).is_none() && self.mapped_supertype(supertype).is_none() {
                    return Err(CatalogError::invalid(format!(
                        "entity `{}` extends unknown type `{}`",
                        entity.name, supertype
                    )));
                }
            }
            if entity.table.is_none() && self.entity_table(&entity.name).is_none() {
                return Err(CatalogError::invalid(format!(
                    "entity `{}` needs a table",
                    entity.name
                )));
            }
            self.validate_attributes(&entity.name, &entity.attributes)?;
        }

        for mapped in &self.mapped_supertypes {
            if let Some(supertype) = &mapped.supertype {
                if self.entity(supertype).is_none() && self.mapped_supertype(supertype).is_none() {
                    return Err(CatalogError::invalid(format!(
                        "mapped supertype `{}` extends unknown type `{}`",
                        mapped.name, supertype
                    )));
                }
            }
            self.validate_attributes(&mapped.name, &mapped.attributes)?;
        }

        for embeddable in &self.embeddables {
            self.validate_attributes(&embeddable.name, &embeddable.attributes)?;
        }
        self.check_embeddable_nesting()
    }

    fn validate_attributes(
        &self,
        owner: &str,
        attributes: &[AttributeDefinition],
    ) -> Result<(), CatalogError> {
        for attribute in attributes {
            match attribute.classify(owner)? {
                AttributeKind::Basic { .. } => {}
                AttributeKind::Any(any) => {
                    for value in &any.values {
                        self.require_entity(owner, &attribute.name, &value.entity)?;
                    }
                }
                AttributeKind::Embedded { embeddable, .. } => {
                    self.require_embeddable(owner, &attribute.name, embeddable)?
                }
                AttributeKind::ToOne { target, .. } => {
                    self.require_entity(owner, &attribute.name, target)?
                }
                AttributeKind::Plural(plural) => {
                    let role = format!("{}.{}", owner, attribute.name);
                    let element = plural.element.classify(&role)?;
                    match element {
                        ElementKind::Basic { .. } => {}
                        ElementKind::Embedded { embeddable, .. } => {
                            self.require_embeddable(owner, &attribute.name, embeddable)?
                        }
                        ElementKind::Entity { target, .. } => {
                            self.require_entity(owner, &attribute.name, target)?
                        }
                    }
                    if plural.table.is_none() && !matches!(element, ElementKind::Entity { .. }) {
                        return Err(CatalogError::invalid(format!(
                            "collection `{}` of values needs a table",
                            role
                        )));
                    }
                    if plural.classification.is_indexed() && plural.index.is_none() {
                        return Err(CatalogError::invalid(format!(
                            "{:?} collection `{}` needs an index",
                            plural.classification, role
                        )));
                    }
                    if plural.classification.has_identifier() && plural.id_column.is_none() {
                        return Err(CatalogError::invalid(format!(
                            "id_bag `{}` needs `id_column`",
                            role
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn require_entity(&self, owner: &str, attribute: &str, target: &str) -> Result<(), CatalogError> {
        match self.entity(target) {
            Some(_) => Ok(()),
            None => Err(CatalogError::invalid(format!(
                "attribute `{}.{}` references unknown entity `{}`",
                owner, attribute, target
            ))),
        }
    }

    fn require_embeddable(
        &self,
        owner: &str,
        attribute: &str,
        embeddable: &str,
    ) -> Result<(), CatalogError> {
        match self.embeddable(embeddable) {
            Some(_) => Ok(()),
            None => Err(CatalogError::invalid(format!(
                "attribute `{}.{}` references unknown embeddable `{}`",
                owner, attribute, embeddable
            ))),
        }
    }

    /// Embeddables may nest, directly or as collection elements, but never
    /// contain themselves
    fn check_embeddable_nesting(&self) -> Result<(), CatalogError> {
        let nested: HashMap<&str, Vec<&str>> = self
            .embeddables
            .iter()
            .map(|embeddable| {
                let children = embeddable
                    .attributes
                    .iter()
                    .filter_map(|attribute| {
                        attribute.embedded.as_deref().or_else(|| {
                            attribute
                                .plural
                                .as_ref()
                                .and_then(|plural| plural.element.embedded.as_deref())
                        })
                    })
                    .collect();
                (embeddable.name.as_str(), children)
            })
            .collect();

        fn visit<'a>(
            name: &'a str,
            nested: &HashMap<&'a str, Vec<&'a str>>,
            stack: &mut Vec<&'a str>,
        ) -> Result<(), CatalogError> {
            if stack.contains(&name) {
                return Err(CatalogError::invalid(format!(
                    "embeddable `{}` contains itself",
                    name
                )));
            }
            stack.push(name);
            for child in nested.get(name).into_iter().flatten() {
                visit(child, nested, stack)?;
            }
            stack.pop();
            Ok(())
        }

        for embeddable in &self.embeddables {
            visit(&embeddable.name, &nested, &mut Vec::new())?;
        }
        Ok(())
    }

    /// Table of `entity_name`: its own, or the nearest entity ancestor's
    pub fn entity_table(&self, entity_name: &str) -> Option<&str> {
        let mut seen = HashSet::new();
        let mut current = Some(entity_name);
        while let Some(name) = current {
            if !seen.insert(name) {
                return None;
            }
            current = if let Some(entity) = self.entity(name) {
                if let Some(table) = &entity.table {
                    return Some(table.as_str());
                }
                entity.supertype.as_deref()
            } else {
                self.mapped_supertype(name)
                    .and_then(|mapped| mapped.supertype.as_deref())
            };
        }
        None
    }
}
