//! Query-defined table expressions (common table expressions).
//!
//! A CTE root has no physical model part: its columns are produced by the
//! query itself.

use crate::domain_model::BasicKind;

#[derive(Debug, Clone, PartialEq)]
pub struct SqmCteTable {
    pub name: String,
    pub columns: Vec<SqmCteColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqmCteColumn {
    pub name: String,
    pub kind: BasicKind,
}

impl SqmCteTable {
    pub fn new(name: impl Into<String>, columns: Vec<(&str, BasicKind)>) -> Self {
        SqmCteTable {
            name: name.into(),
            columns: columns
                .into_iter()
                .map(|(name, kind)| SqmCteColumn {
                    name: name.to_string(),
                    kind,
                })
                .collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&SqmCteColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}
