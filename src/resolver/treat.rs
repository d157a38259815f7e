//! Treat (downcast) handling.
//!
//! A treat step narrows a path to an entity subtype so attributes declared
//! only on the subtype become reachable. Path construction accepts any managed
//! type as target; [`validate_treat`] is the explicit check callers run when
//! they want misuse reported.

use super::errors::ResolutionError;
use crate::mapping_model::{EntityMappingType, MappingMetamodel, MappingModelError};
use crate::path_source::SqmPathSource;
use crate::sqm::SqmPath;

/// Entity descriptor for an entity-kind source. Fails like
/// [`MappingMetamodel::get_entity_descriptor`] when there is none.
pub fn resolve_entity_persister<'m>(
    entity_source: &SqmPathSource,
    metamodel: &'m MappingMetamodel,
) -> Result<&'m EntityMappingType, MappingModelError> {
    match entity_source.entity_name() {
        Some(entity_name) => metamodel.get_entity_descriptor(entity_name),
        None => Err(MappingModelError::UnknownEntity {
            entity_name: entity_source.type_name(),
        }),
    }
}

/// Descriptor of the treat target when `path`'s immediate parent is a treat
/// to an entity type. Only the parent is inspected, never the whole prefix.
///
/// # Example
///
/// ```text
/// treat(n as SpecialNode).extra   -> Some(SpecialNode)
/// n.extra                         -> None
/// treat(n as SpecialNode).a.b     -> None (parent of `b` is `a`)
/// ```
pub fn resolve_explicit_treat_target<'m>(
    path: &SqmPath,
    metamodel: &'m MappingMetamodel,
) -> Result<Option<&'m EntityMappingType>, MappingModelError> {
    let Some(lhs) = path.lhs() else {
        return Ok(None);
    };
    if lhs.treat_target_entity().is_none() {
        return Ok(None);
    }
    match lhs.referenced_path_source() {
        Some(target) => resolve_entity_persister(target, metamodel).map(Some),
        None => Ok(None),
    }
}

/// Check that a treated path narrows an entity-valued base to one of its
/// entity subtypes (or the type itself) and return the target descriptor.
pub fn validate_treat<'m>(
    path: &SqmPath,
    metamodel: &'m MappingMetamodel,
) -> Result<&'m EntityMappingType, ResolutionError> {
    let invalid = |target: &str, reason: String| ResolutionError::InvalidTreatTarget {
        path: path.navigable_path().to_string(),
        target: target.to_string(),
        reason,
    };

    let target_source = match (path.is_treated(), path.referenced_path_source()) {
        (true, Some(source)) => source,
        _ => return Err(invalid(path.referenced_path_name(), "not a treated path".to_string())),
    };
    let target_name = target_source.path_name();
    if target_source.entity_name().is_none() {
        return Err(invalid(
            target_name,
            format!("`{}` is not an entity type", target_source.type_name()),
        ));
    }

    let base_source = path
        .lhs()
        .and_then(SqmPath::referenced_path_source)
        .filter(|source| source.entity_name().is_some())
        .ok_or_else(|| invalid(target_name, "the treated path is not entity-valued".to_string()))?;

    let base = resolve_entity_persister(base_source, metamodel)?;
    let target = resolve_entity_persister(target_source, metamodel)?;
    if !metamodel.is_subtype(target, base) {
        return Err(invalid(
            target_name,
            format!("`{}` is not a subtype of `{}`", target.entity_name, base.entity_name),
        ));
    }
    Ok(target)
}
