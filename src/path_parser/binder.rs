use std::sync::Arc;

use indexmap::IndexMap;

use super::ast::{PathExpr, PluralFunction};
use super::errors::BindError;
use super::parse_path_expression;
use crate::path_source::PathSourceRegistry;
use crate::sqm::{SqmCteTable, SqmPath};

/// Binds parsed path expressions to the identification variables of a query
pub struct PathBinder<'r> {
    registry: &'r PathSourceRegistry,
    aliases: IndexMap<String, SqmPath>,
}

impl<'r> PathBinder<'r> {
    pub fn new(registry: &'r PathSourceRegistry) -> Self {
        PathBinder {
            registry,
            aliases: IndexMap::new(),
        }
    }

    /// `from <entity_name> <alias>`
    pub fn add_root(&mut self, entity_name: &str, alias: &str) -> Result<SqmPath, BindError> {
        self.check_alias_free(alias)?;
        let root = SqmPath::root(entity_name, Some(alias), self.registry)?;
        self.aliases.insert(alias.to_string(), root.clone());
        Ok(root)
    }

    /// `from <cte> <alias>`
    pub fn add_cte_root(
        &mut self,
        cte: Arc<SqmCteTable>,
        alias: &str,
    ) -> Result<SqmPath, BindError> {
        self.check_alias_free(alias)?;
        let root = SqmPath::cte_root(cte, Some(alias));
        self.aliases.insert(alias.to_string(), root.clone());
        Ok(root)
    }

    /// `join <expression> <alias>`; the expression must end in an attribute
    pub fn add_join(&mut self, expression: &str, alias: &str) -> Result<SqmPath, BindError> {
        self.check_alias_free(alias)?;
        let expr = parse_path_expression(expression)?;
        let PathExpr::Attribute { base, name } = &expr else {
            return Err(BindError::InvalidJoin {
                expression: expr.to_string(),
            });
        };
        let join = self.bind(base)?.join(name, alias, self.registry)?;
        log::debug!("Joined {} as `{}`", join.navigable_path(), alias);
        self.aliases.insert(alias.to_string(), join.clone());
        Ok(join)
    }

    /// Parse and bind `expression`
    pub fn bind_str(&self, expression: &str) -> Result<SqmPath, BindError> {
        let expr = parse_path_expression(expression)?;
        self.bind(&expr)
    }

    pub fn bind(&self, expr: &PathExpr<'_>) -> Result<SqmPath, BindError> {
        match expr {
            PathExpr::Alias(alias) => self.alias(alias),
            PathExpr::Attribute { base, name } => Ok(self.bind(base)?.get(name, self.registry)?),
            PathExpr::Treat { base, target } => {
                Ok(self.bind(base)?.treat_as(target, self.registry)?)
            }
            PathExpr::PluralPart { function, base } => {
                let plural = self.bind(base)?;
                let part = match function {
                    PluralFunction::Element => plural.element(),
                    PluralFunction::Value => plural.value(),
                    PluralFunction::Index => plural.index(),
                    PluralFunction::Key => plural.key(),
                };
                Ok(part?)
            }
        }
    }

    pub fn alias(&self, alias: &str) -> Result<SqmPath, BindError> {
        self.aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| BindError::UnknownAlias {
                alias: alias.to_string(),
            })
    }

    /// Registered roots and joins, in declaration order
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &SqmPath)> {
        self.aliases.iter().map(|(alias, path)| (alias.as_str(), path))
    }

    fn check_alias_free(&self, alias: &str) -> Result<(), BindError> {
        if self.aliases.contains_key(alias) {
            return Err(BindError::DuplicateAlias {
                alias: alias.to_string(),
            });
        }
        Ok(())
    }
}
