//! Path source construction.
//!
//! [`resolve_sqm_path_source`] is the single dispatch point turning a
//! (name, domain type) pair into a typed [`SqmPathSource`]. The
//! [`PathSourceRegistry`] runs it once for every reachable pair when the domain
//! model is loaded and interns the results.
//!
//! # Dispatch
//!
//! | Domain type       | Path source                                         |
//! |-------------------|-----------------------------------------------------|
//! | `Basic`           | leaf, carries logical and relational storage kinds  |
//! | `Any`             | discriminator + key only                            |
//! | `Embedded`        | composite, embeddable attributes                    |
//! | `Entity`          | declared + inherited attributes                     |
//! | `MappedSupertype` | declared + inherited attributes, never a root       |
//! | `Tuple`           | `UnrecognizedDomainType`                            |

pub mod errors;
pub mod registry;
mod source;

use std::sync::Arc;

pub use errors::PathSourceError;
pub use registry::PathSourceRegistry;
pub use source::{BindableType, PathSourceKind, PluralPathSource, SqmPathSource};

use crate::domain_model::{BasicKind, DomainModel, DomainType, DomainTypeId};
use crate::mapping_model::CollectionPartNature;

/// Build the path source for `name` typed by `value_type`.
///
/// `path_model` is the source being refined (an inherited attribute seen from a
/// subtype). `relational_kind` overrides the storage kind of basic values and is
/// ignored for every other variant.
pub fn resolve_sqm_path_source(
    name: &str,
    path_model: Option<Arc<SqmPathSource>>,
    domain_model: &DomainModel,
    value_type: DomainTypeId,
    relational_kind: Option<BasicKind>,
    bindable_type: BindableType,
    is_generic: bool,
) -> Result<SqmPathSource, PathSourceError> {
    let kind = match domain_model.get(value_type) {
        DomainType::Basic(basic) => PathSourceKind::Basic {
            kind: basic.kind,
            relational_kind: relational_kind.unwrap_or(basic.kind),
        },
        DomainType::Any(any) => PathSourceKind::AnyMapping {
            discriminator_kind: any.discriminator_kind,
            key_kind: any.key_kind,
        },
        DomainType::Embedded(embeddable) => PathSourceKind::Embedded {
            embeddable_name: embeddable.name.clone(),
        },
        DomainType::Entity(entity) => PathSourceKind::Entity {
            entity_name: entity.name.clone(),
        },
        DomainType::MappedSupertype(mapped) => PathSourceKind::MappedSupertype {
            type_name: mapped.name.clone(),
        },
        DomainType::Tuple(tuple) => {
            return Err(PathSourceError::UnrecognizedDomainType {
                name: name.to_string(),
                type_name: tuple.name.clone(),
            })
        }
    };

    Ok(SqmPathSource::new(
        name.to_string(),
        path_model,
        value_type,
        kind,
        bindable_type,
        is_generic,
    ))
}

/// Shorthand without a refined model; basic values are stored as their
/// logical kind
pub fn resolve_named_path_source(
    name: &str,
    domain_model: &DomainModel,
    value_type: DomainTypeId,
    bindable_type: BindableType,
    is_generic: bool,
) -> Result<SqmPathSource, PathSourceError> {
    resolve_sqm_path_source(
        name,
        None,
        domain_model,
        value_type,
        None,
        bindable_type,
        is_generic,
    )
}

/// Path source for a collection's index/key, named `{index}`
pub fn resolve_sqm_key_path_source(
    domain_model: &DomainModel,
    key_type: DomainTypeId,
    bindable_type: BindableType,
    is_generic: bool,
) -> Result<SqmPathSource, PathSourceError> {
    resolve_named_path_source(
        CollectionPartNature::Index.name(),
        domain_model,
        key_type,
        bindable_type,
        is_generic,
    )
}
