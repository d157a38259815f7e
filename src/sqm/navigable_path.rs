//! Navigable paths: string keys identifying one navigation from a query root.
//!
//! ```text
//! Auction(a)                      root with alias
//! Auction(a).bids                 attribute step
//! Auction(a).bids.{element}       collection part
//! Node(n)#SpecialNode             treat step
//! Node(n)#SpecialNode.extra       attribute of the narrowed type
//! ```
//!
//! Equality and hashing use the full string only.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NavigablePath {
    parent: Option<Arc<NavigablePath>>,
    local_name: String,
    alias: Option<String>,
    full_path: String,
}

impl NavigablePath {
    pub fn root(root_name: impl Into<String>, alias: Option<&str>) -> Self {
        let local_name = root_name.into();
        let full_path = match alias {
            Some(alias) => format!("{}({})", local_name, alias),
            None => local_name.clone(),
        };
        NavigablePath {
            parent: None,
            local_name,
            alias: alias.map(str::to_string),
            full_path,
        }
    }

    pub fn append(&self, name: &str) -> Self {
        self.append_with_alias(name, None)
    }

    pub fn append_with_alias(&self, name: &str, alias: Option<&str>) -> Self {
        let full_path = match alias {
            Some(alias) => format!("{}.{}({})", self.full_path, name, alias),
            None => format!("{}.{}", self.full_path, name),
        };
        NavigablePath {
            parent: Some(Arc::new(self.clone())),
            local_name: name.to_string(),
            alias: alias.map(str::to_string),
            full_path,
        }
    }

    pub fn treat_as(&self, entity_name: &str) -> Self {
        NavigablePath {
            parent: Some(Arc::new(self.clone())),
            local_name: format!("#{}", entity_name),
            alias: None,
            full_path: format!("{}#{}", self.full_path, entity_name),
        }
    }

    pub fn parent(&self) -> Option<&NavigablePath> {
        self.parent.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

impl PartialEq for NavigablePath {
    fn eq(&self, other: &Self) -> bool {
        self.full_path == other.full_path
    }
}

impl Eq for NavigablePath {}

impl Hash for NavigablePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_path.hash(state);
    }
}

impl fmt::Display for NavigablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_full_path_rendering() {
        let root = NavigablePath::root("Auction", Some("a"));
        let bids = root.append("bids");
        let element = bids.append("{element}");
        assert_eq!(element.full_path(), "Auction(a).bids.{element}");
        assert_eq!(element.local_name(), "{element}");
        assert_eq!(element.parent(), Some(&bids));

        let treated = NavigablePath::root("Node", Some("n")).treat_as("SpecialNode");
        assert_eq!(treated.full_path(), "Node(n)#SpecialNode");
        assert_eq!(treated.append("extra").local_name(), "extra");
    }

    #[test]
    fn test_alias_discriminates_equality() {
        let first = NavigablePath::root("Auction", Some("a")).append_with_alias("bids", Some("b1"));
        let second = NavigablePath::root("Auction", Some("a")).append_with_alias("bids", Some("b2"));
        let plain = NavigablePath::root("Auction", Some("a")).append("bids");
        assert_ne!(first, second);
        assert_ne!(first, plain);

        let again = NavigablePath::root("Auction", Some("a")).append_with_alias("bids", Some("b1"));
        let set: HashSet<NavigablePath> = [first.clone(), again].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
