//! Interned path sources.
//!
//! [`PathSourceRegistry::build`] walks the whole domain model once and creates
//! one source per (owning type, attribute name), including inherited
//! attributes, plus the element/index sources of plural attributes and the
//! discriminator/key sources of any-mappings. After that the registry is only
//! read, so one instance serves every compilation.

use std::collections::HashMap;
use std::sync::Arc;

use super::errors::PathSourceError;
use super::source::{BindableType, PathSourceKind, PluralPathSource, SqmPathSource};
use super::{resolve_named_path_source, resolve_sqm_key_path_source, resolve_sqm_path_source};
use crate::domain_model::{
    AttributeNature, BasicKind, DomainModel, DomainType, DomainTypeId, SqmAttribute,
};
use crate::mapping_model::{CollectionPartNature, DISCRIMINATOR_ROLE_NAME, KEY_ROLE_NAME};

type SourceKey = (DomainTypeId, String);

#[derive(Debug, Clone, Default)]
pub struct PathSourceRegistry {
    /// Entity name → root source
    roots: HashMap<String, Arc<SqmPathSource>>,
    /// Managed type name → type-level source (treat targets)
    managed: HashMap<String, Arc<SqmPathSource>>,
    attributes: HashMap<SourceKey, Arc<SqmPathSource>>,
    plurals: HashMap<SourceKey, Arc<PluralPathSource>>,
    any_parts: HashMap<SourceKey, Arc<SqmPathSource>>,
}

impl PathSourceRegistry {
    pub fn build(domain_model: &DomainModel) -> Result<Self, PathSourceError> {
        let mut registry = PathSourceRegistry::default();

        for id in domain_model.type_ids() {
            match domain_model.get(id) {
                DomainType::Entity(entity) => {
                    let root = Arc::new(resolve_named_path_source(
                        &entity.name,
                        domain_model,
                        id,
                        BindableType::EntityType,
                        false,
                    )?);
                    registry.roots.insert(entity.name.clone(), root.clone());
                    registry.managed.insert(entity.name.clone(), root);
                }
                DomainType::MappedSupertype(mapped) => {
                    let source = resolve_named_path_source(
                        &mapped.name,
                        domain_model,
                        id,
                        BindableType::EntityType,
                        false,
                    )?;
                    registry.managed.insert(mapped.name.clone(), Arc::new(source));
                }
                DomainType::Embedded(embeddable) => {
                    let source = resolve_named_path_source(
                        &embeddable.name,
                        domain_model,
                        id,
                        BindableType::SingularAttribute,
                        false,
                    )?;
                    registry
                        .managed
                        .insert(embeddable.name.clone(), Arc::new(source));
                }
                DomainType::Any(any) => {
                    registry.register_any_parts(
                        domain_model,
                        id,
                        any.discriminator_kind,
                        any.key_kind,
                    )?;
                }
                DomainType::Basic(_) | DomainType::Tuple(_) => {}
            }
        }

        // Declared attributes first so inherited copies can point at them
        for inherited in [false, true] {
            for owner in domain_model.type_ids() {
                if !domain_model.get(owner).is_managed() {
                    continue;
                }
                for (declaring, attribute) in domain_model.attributes(owner) {
                    if (declaring != owner) != inherited {
                        continue;
                    }
                    let path_model = if inherited {
                        registry
                            .attributes
                            .get(&(declaring, attribute.name.clone()))
                            .cloned()
                    } else {
                        None
                    };
                    registry.register_attribute(domain_model, owner, attribute, path_model)?;
                }
            }
        }

        log::debug!(
            "Path source registry built: {} roots, {} attribute sources, {} plural sources",
            registry.roots.len(),
            registry.attributes.len(),
            registry.plurals.len()
        );
        Ok(registry)
    }

    fn register_attribute(
        &mut self,
        domain_model: &DomainModel,
        owner: DomainTypeId,
        attribute: &SqmAttribute,
        path_model: Option<Arc<SqmPathSource>>,
    ) -> Result<(), PathSourceError> {
        let bindable_type = if attribute.is_plural() {
            BindableType::PluralAttribute
        } else {
            BindableType::SingularAttribute
        };
        let source = Arc::new(resolve_sqm_path_source(
            &attribute.name,
            path_model,
            domain_model,
            attribute.value_type,
            attribute.relational_kind,
            bindable_type,
            attribute.is_generic,
        )?);

        if let AttributeNature::Plural {
            classification,
            index_type,
        } = &attribute.nature
        {
            let element = Arc::new(resolve_sqm_path_source(
                CollectionPartNature::Element.name(),
                None,
                domain_model,
                attribute.value_type,
                attribute.relational_kind,
                BindableType::SingularAttribute,
                attribute.is_generic,
            )?);
            let index = index_type
                .map(|key_type| {
                    resolve_sqm_key_path_source(
                        domain_model,
                        key_type,
                        BindableType::SingularAttribute,
                        attribute.is_generic,
                    )
                    .map(Arc::new)
                })
                .transpose()?;
            let identifier = if classification.has_identifier() {
                domain_model
                    .basic_type_id(BasicKind::Long)
                    .map(|long| {
                        resolve_named_path_source(
                            CollectionPartNature::Id.name(),
                            domain_model,
                            long,
                            BindableType::SingularAttribute,
                            false,
                        )
                        .map(Arc::new)
                    })
                    .transpose()?
            } else {
                None
            };
            self.plurals.insert(
                (owner, attribute.name.clone()),
                Arc::new(PluralPathSource {
                    attribute: source.clone(),
                    classification: *classification,
                    element,
                    index,
                    identifier,
                }),
            );
        }

        self.attributes.insert((owner, attribute.name.clone()), source);
        Ok(())
    }

    fn register_any_parts(
        &mut self,
        domain_model: &DomainModel,
        any_type: DomainTypeId,
        discriminator_kind: BasicKind,
        key_kind: BasicKind,
    ) -> Result<(), PathSourceError> {
        for (role, kind) in [
            (DISCRIMINATOR_ROLE_NAME, discriminator_kind),
            (KEY_ROLE_NAME, key_kind),
        ] {
            let basic = domain_model
                .basic_type_id(kind)
                .ok_or_else(|| PathSourceError::UnknownType {
                    type_name: kind.name().to_string(),
                })?;
            let source = resolve_named_path_source(
                role,
                domain_model,
                basic,
                BindableType::SingularAttribute,
                false,
            )?;
            self.any_parts
                .insert((any_type, role.to_string()), Arc::new(source));
        }
        Ok(())
    }

    /// Root source for an entity name. Mapped supertypes and embeddables are
    /// rejected with `NotQueryRoot`.
    pub fn root_path_source(&self, entity_name: &str) -> Result<Arc<SqmPathSource>, PathSourceError> {
        if let Some(root) = self.roots.get(entity_name) {
            return Ok(root.clone());
        }
        if self.managed.contains_key(entity_name) {
            return Err(PathSourceError::NotQueryRoot {
                type_name: entity_name.to_string(),
            });
        }
        Err(PathSourceError::UnknownType {
            type_name: entity_name.to_string(),
        })
    }

    /// Type-level source of any managed type (entity, embeddable, mapped supertype)
    pub fn managed_type_source(&self, type_name: &str) -> Option<Arc<SqmPathSource>> {
        self.managed.get(type_name).cloned()
    }

    /// Sub-source reachable from `parent` by `name`
    pub fn find_sub_path_source(
        &self,
        parent: &SqmPathSource,
        name: &str,
    ) -> Option<Arc<SqmPathSource>> {
        match parent.kind() {
            PathSourceKind::Basic { .. } => None,
            PathSourceKind::AnyMapping { .. } => {
                let role = if name == "id" { KEY_ROLE_NAME } else { name };
                self.any_parts
                    .get(&(parent.domain_type(), role.to_string()))
                    .cloned()
            }
            PathSourceKind::Embedded { .. }
            | PathSourceKind::Entity { .. }
            | PathSourceKind::MappedSupertype { .. } => self
                .attributes
                .get(&(parent.domain_type(), name.to_string()))
                .cloned(),
        }
    }

    /// Plural attribute details for `name` on `parent`'s type
    pub fn plural_path_source(
        &self,
        parent: &SqmPathSource,
        name: &str,
    ) -> Option<Arc<PluralPathSource>> {
        self.plurals
            .get(&(parent.domain_type(), name.to_string()))
            .cloned()
    }

    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(|name| name.as_str())
    }
}
