//! Builds the domain model and the mapping metamodel from one definition.
//!
//! Both sides are derived from the same attribute list so every attribute the
//! domain model exposes has a physical counterpart. Physical layout rules:
//!
//! - entity subtypes share the root's table unless they declare their own
//! - mapped supertype attributes are copied into the first entity below them
//! - each embedded usage gets its own descriptor, columns prefixed by the
//!   usage's `column_prefix` (nested prefixes concatenate)

use super::definition::{
    AttributeDefinition, AttributeKind, ElementKind, EntityDefinition, MappedSupertypeDefinition,
    ModelDefinition, PluralDefinition,
};
use super::errors::CatalogError;
use crate::domain_model::{BasicKind, DomainModel, DomainModelBuilder, DomainTypeId, SqmAttribute};
use crate::mapping_model::{
    AnyAttributeMapping, AttributeMapping, BasicValuedMapping, CollectionPartMapping,
    CollectionPartNature, CollectionValueMapping, DiscriminatorMapping, EmbeddableId,
    EmbeddedAttributeMapping, EntityId, MappingMetamodel, MappingMetamodelBuilder,
    PluralAttributeMapping, ToOneAttributeMapping, DISCRIMINATOR_ROLE_NAME, KEY_ROLE_NAME,
};

// ============================================================================
// Domain side
// ============================================================================

pub(crate) fn build_domain_model(definition: &ModelDefinition) -> Result<DomainModel, CatalogError> {
    let mut builder = DomainModelBuilder::new();

    for embeddable in &definition.embeddables {
        builder.declare_embeddable(embeddable.name.as_str())?;
    }
    for mapped in &definition.mapped_supertypes {
        builder.declare_mapped_supertype(mapped.name.as_str())?;
    }
    for entity in &definition.entities {
        builder.declare_entity(entity.name.as_str(), entity.is_abstract)?;
    }

    let supertypes = definition
        .mapped_supertypes
        .iter()
        .map(|mapped| (&mapped.name, &mapped.supertype))
        .chain(
            definition
                .entities
                .iter()
                .map(|entity| (&entity.name, &entity.supertype)),
        );
    for (name, supertype) in supertypes {
        if let Some(supertype) = supertype {
            let id = lookup(&builder, name)?;
            let supertype = lookup(&builder, supertype)?;
            builder.set_supertype(id, supertype)?;
        }
    }

    for embeddable in &definition.embeddables {
        let owner = lookup(&builder, &embeddable.name)?;
        for attribute in &embeddable.attributes {
            let attribute = domain_attribute(&mut builder, &embeddable.name, attribute)?;
            builder.add_attribute(owner, attribute)?;
        }
    }
    for mapped in &definition.mapped_supertypes {
        let owner = lookup(&builder, &mapped.name)?;
        for attribute in &mapped.attributes {
            let attribute = domain_attribute(&mut builder, &mapped.name, attribute)?;
            builder.add_attribute(owner, attribute)?;
        }
    }
    for entity in &definition.entities {
        let owner = lookup(&builder, &entity.name)?;
        if let Some(id) = &entity.id {
            let id_type = builder.basic(id.kind);
            builder.add_attribute(owner, SqmAttribute::singular(id.name.as_str(), id_type))?;
        }
        for attribute in &entity.attributes {
            let attribute = domain_attribute(&mut builder, &entity.name, attribute)?;
            builder.add_attribute(owner, attribute)?;
        }
    }

    Ok(builder.build()?)
}

fn lookup(builder: &DomainModelBuilder, name: &str) -> Result<DomainTypeId, CatalogError> {
    builder
        .lookup(name)
        .ok_or_else(|| CatalogError::invalid(format!("unknown type `{}`", name)))
}

fn domain_attribute(
    builder: &mut DomainModelBuilder,
    owner: &str,
    attribute: &AttributeDefinition,
) -> Result<SqmAttribute, CatalogError> {
    let name = attribute.name.as_str();
    let mut sqm_attribute = match attribute.classify(owner)? {
        AttributeKind::Basic {
            kind, stored_as, ..
        } => {
            let singular = SqmAttribute::singular(name, builder.basic(kind));
            match stored_as {
                Some(relational_kind) => singular.stored_as(relational_kind),
                None => singular,
            }
        }
        AttributeKind::Embedded { embeddable, .. } => {
            SqmAttribute::singular(name, lookup(builder, embeddable)?)
        }
        AttributeKind::ToOne { target, .. } => SqmAttribute::singular(name, lookup(builder, target)?),
        AttributeKind::Plural(plural) => {
            let role = format!("{}.{}", owner, name);
            let element_type = match plural.element.classify(&role)? {
                ElementKind::Basic { kind, .. } => builder.basic(kind),
                ElementKind::Embedded { embeddable, .. } => lookup(builder, embeddable)?,
                ElementKind::Entity { target, .. } => lookup(builder, target)?,
            };
            let index_type = plural.index.as_ref().map(|index| builder.basic(index.kind));
            if plural.classification.has_identifier() {
                builder.basic(BasicKind::Long);
            }
            SqmAttribute::plural(name, element_type, plural.classification, index_type)
        }
        AttributeKind::Any(any) => SqmAttribute::singular(name, builder.any(any.discriminator, any.key)),
    };
    if attribute.generic {
        sqm_attribute = sqm_attribute.generic();
    }
    Ok(sqm_attribute)
}

// ============================================================================
// Physical side
// ============================================================================

pub(crate) fn build_metamodel(definition: &ModelDefinition) -> Result<MappingMetamodel, CatalogError> {
    let mut builder = MappingMetamodelBuilder::new();

    for entity in &definition.entities {
        let table = definition.entity_table(&entity.name).ok_or_else(|| {
            CatalogError::invalid(format!("entity `{}` needs a table", entity.name))
        })?;
        builder.declare_entity(entity.name.as_str(), table)?;
    }

    for entity in &definition.entities {
        if let Some(supertype) = nearest_entity_ancestor(definition, entity) {
            let id = entity_id(&builder, &entity.name)?;
            let supertype = entity_id(&builder, &supertype.name)?;
            builder.set_supertype(id, supertype);
        }
    }

    for entity in &definition.entities {
        let id = entity_id(&builder, &entity.name)?;
        let table = builder.table_name(id).to_string();

        if let Some(identifier) = &entity.id {
            builder.set_identifier(
                id,
                BasicValuedMapping::new(
                    identifier.name.as_str(),
                    table.as_str(),
                    identifier.column.as_str(),
                    identifier.kind,
                ),
            )?;
        }
        if let Some(discriminator) = &entity.discriminator {
            builder.set_discriminator(
                id,
                DiscriminatorMapping {
                    column: discriminator.column.clone(),
                    kind: discriminator.kind,
                    value: discriminator.value.clone(),
                },
            );
        }

        let flattened = flattened_supertypes(definition, entity);
        let attributes = flattened
            .iter()
            .flat_map(|mapped| mapped.attributes.iter())
            .chain(entity.attributes.iter());
        for attribute in attributes {
            let context = MappingContext {
                role_prefix: &entity.name,
                table: &table,
                column_prefix: "",
            };
            let mapping = attribute_mapping(&mut builder, definition, &context, attribute)?;
            builder.add_attribute(id, mapping)?;
        }
    }

    Ok(builder.build())
}

fn entity_id(builder: &MappingMetamodelBuilder, name: &str) -> Result<EntityId, CatalogError> {
    builder
        .entity_id(name)
        .ok_or_else(|| CatalogError::invalid(format!("unknown entity `{}`", name)))
}

/// First entity above `entity`, skipping mapped supertypes
fn nearest_entity_ancestor<'d>(
    definition: &'d ModelDefinition,
    entity: &EntityDefinition,
) -> Option<&'d EntityDefinition> {
    let mut current = entity.supertype.as_deref();
    let mut steps = 0;
    while let Some(name) = current {
        if let Some(ancestor) = definition.entity(name) {
            return Some(ancestor);
        }
        steps += 1;
        if steps > definition.mapped_supertypes.len() {
            return None;
        }
        current = definition
            .mapped_supertype(name)
            .and_then(|mapped| mapped.supertype.as_deref());
    }
    None
}

/// Mapped supertypes between `entity` and its nearest entity ancestor,
/// outermost first
fn flattened_supertypes<'d>(
    definition: &'d ModelDefinition,
    entity: &EntityDefinition,
) -> Vec<&'d MappedSupertypeDefinition> {
    let mut chain = Vec::new();
    let mut current = entity.supertype.as_deref();
    while let Some(name) = current {
        match definition.mapped_supertype(name) {
            Some(mapped) if chain.len() <= definition.mapped_supertypes.len() => {
                chain.push(mapped);
                current = mapped.supertype.as_deref();
            }
            _ => break,
        }
    }
    chain.reverse();
    chain
}

struct MappingContext<'a> {
    /// `Auction`, `Auction.reserve`, ...
    role_prefix: &'a str,
    table: &'a str,
    column_prefix: &'a str,
}

fn attribute_mapping(
    builder: &mut MappingMetamodelBuilder,
    definition: &ModelDefinition,
    context: &MappingContext<'_>,
    attribute: &AttributeDefinition,
) -> Result<AttributeMapping, CatalogError> {
    let name = attribute.name.as_str();
    let column = |column: &str| format!("{}{}", context.column_prefix, column);

    let mapping = match attribute.classify(context.role_prefix)? {
        AttributeKind::Basic {
            kind,
            column: column_name,
            stored_as,
        } => AttributeMapping::Basic(BasicValuedMapping::new(
            name,
            context.table,
            column(column_name),
            stored_as.unwrap_or(kind),
        )),
        AttributeKind::Embedded {
            embeddable,
            column_prefix,
        } => {
            let role = format!("{}.{}", context.role_prefix, name);
            let prefix = column(column_prefix);
            let nested = MappingContext {
                role_prefix: &role,
                table: context.table,
                column_prefix: &prefix,
            };
            let id = embeddable_mapping(builder, definition, &nested, embeddable)?;
            AttributeMapping::Embedded(EmbeddedAttributeMapping {
                name: name.to_string(),
                embeddable: id,
            })
        }
        AttributeKind::ToOne {
            target,
            join_column,
        } => AttributeMapping::ToOne(ToOneAttributeMapping {
            name: name.to_string(),
            target: entity_id(builder, target)?,
            target_entity_name: target.to_string(),
            table_expression: context.table.to_string(),
            fk_column: column(join_column),
        }),
        AttributeKind::Plural(plural) => {
            let role = format!("{}.{}", context.role_prefix, name);
            AttributeMapping::Plural(plural_mapping(builder, definition, &role, name, plural)?)
        }
        AttributeKind::Any(any) => AttributeMapping::Any(AnyAttributeMapping {
            name: name.to_string(),
            discriminator: BasicValuedMapping::new(
                DISCRIMINATOR_ROLE_NAME,
                context.table,
                column(&any.discriminator_column),
                any.discriminator,
            ),
            key: BasicValuedMapping::new(
                KEY_ROLE_NAME,
                context.table,
                column(&any.key_column),
                any.key,
            ),
            discriminator_values: any
                .values
                .iter()
                .map(|value| (value.value.clone(), value.entity.clone()))
                .collect(),
        }),
    };
    Ok(mapping)
}

fn embeddable_mapping(
    builder: &mut MappingMetamodelBuilder,
    definition: &ModelDefinition,
    context: &MappingContext<'_>,
    embeddable_name: &str,
) -> Result<EmbeddableId, CatalogError> {
    let embeddable = definition.embeddable(embeddable_name).ok_or_else(|| {
        CatalogError::invalid(format!("unknown embeddable `{}`", embeddable_name))
    })?;
    let id = builder.add_embeddable(context.role_prefix, embeddable_name, context.table);
    for attribute in &embeddable.attributes {
        let mapping = attribute_mapping(builder, definition, context, attribute)?;
        builder.add_embeddable_attribute(id, mapping)?;
    }
    Ok(id)
}

fn plural_mapping(
    builder: &mut MappingMetamodelBuilder,
    definition: &ModelDefinition,
    role: &str,
    name: &str,
    plural: &PluralDefinition,
) -> Result<PluralAttributeMapping, CatalogError> {
    let element_kind = plural.element.classify(role)?;
    let collection_table = match (&plural.table, element_kind) {
        (Some(table), _) => table.clone(),
        (None, ElementKind::Entity { target, .. }) => {
            builder.table_name(entity_id(builder, target)?).to_string()
        }
        (None, _) => {
            return Err(CatalogError::invalid(format!(
                "collection `{}` of values needs a table",
                role
            )))
        }
    };

    let part = |nature: CollectionPartNature, value: CollectionValueMapping| CollectionPartMapping {
        nature,
        collection_role: role.to_string(),
        value,
    };

    let element_value = match element_kind {
        ElementKind::Basic { kind, column } => CollectionValueMapping::Basic(BasicValuedMapping::new(
            CollectionPartNature::Element.name(),
            collection_table.as_str(),
            column,
            kind,
        )),
        ElementKind::Embedded {
            embeddable,
            column_prefix,
        } => {
            let element_role = format!("{}.{}", role, CollectionPartNature::Element.name());
            let context = MappingContext {
                role_prefix: &element_role,
                table: &collection_table,
                column_prefix,
            };
            CollectionValueMapping::Embedded(embeddable_mapping(
                builder, definition, &context, embeddable,
            )?)
        }
        ElementKind::Entity { target, column } => CollectionValueMapping::Entity {
            target: entity_id(builder, target)?,
            target_entity_name: target.to_string(),
            fk_column: column.to_string(),
        },
    };

    let index = plural.index.as_ref().map(|index| {
        part(
            CollectionPartNature::Index,
            CollectionValueMapping::Basic(BasicValuedMapping::new(
                CollectionPartNature::Index.name(),
                collection_table.as_str(),
                index.column.as_str(),
                index.kind,
            )),
        )
    });
    let identifier = plural.id_column.as_ref().map(|id_column| {
        part(
            CollectionPartNature::Id,
            CollectionValueMapping::Basic(BasicValuedMapping::new(
                CollectionPartNature::Id.name(),
                collection_table.as_str(),
                id_column.as_str(),
                BasicKind::Long,
            )),
        )
    });

    Ok(PluralAttributeMapping {
        name: name.to_string(),
        role: role.to_string(),
        classification: plural.classification,
        collection_table: plural.table.clone(),
        key_column: plural.key_column.clone(),
        element: part(CollectionPartNature::Element, element_value),
        index,
        identifier,
    })
}
