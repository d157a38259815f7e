//! Model catalog.
//!
//! Loads a declarative model definition (YAML or JSON) and builds the three
//! read-only structures resolution needs:
//!
//! - [`DomainModel`] - logical types and attributes
//! - [`MappingMetamodel`] - physical descriptors
//! - [`PathSourceRegistry`] - interned path sources
//!
//! A [`Catalog`] is immutable once built and is shared between compilations
//! through `Arc<Catalog>`.

mod builder;
pub mod definition;
pub mod errors;

use std::path::Path;

pub use definition::ModelDefinition;
pub use errors::CatalogError;

use crate::domain_model::DomainModel;
use crate::mapping_model::MappingMetamodel;
use crate::path_source::PathSourceRegistry;

#[derive(Debug)]
pub struct Catalog {
    name: String,
    domain_model: DomainModel,
    metamodel: MappingMetamodel,
    path_sources: PathSourceRegistry,
}

impl Catalog {
    pub fn from_definition(definition: &ModelDefinition) -> Result<Self, CatalogError> {
        definition.validate()?;
        let domain_model = builder::build_domain_model(definition)?;
        let path_sources = PathSourceRegistry::build(&domain_model)?;
        let metamodel = builder::build_metamodel(definition)?;

        let name = definition
            .name
            .clone()
            .unwrap_or_else(|| "default".to_string());
        log::info!(
            "Loaded model `{}`: {} domain types, {} entity descriptors",
            name,
            domain_model.len(),
            metamodel.entity_descriptors().count()
        );
        Ok(Catalog {
            name,
            domain_model,
            metamodel,
            path_sources,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Self::from_definition(&ModelDefinition::from_yaml_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_definition(&ModelDefinition::from_json_str(json)?)
    }

    /// Load a `.yaml`/`.yml` or `.json` model definition
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        log::debug!("Reading model definition from {}", path.display());
        Self::from_definition(&ModelDefinition::from_file(path)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_model(&self) -> &DomainModel {
        &self.domain_model
    }

    pub fn metamodel(&self) -> &MappingMetamodel {
        &self.metamodel
    }

    pub fn path_sources(&self) -> &PathSourceRegistry {
        &self.path_sources
    }
}
