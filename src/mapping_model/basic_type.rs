//! Shared basic (JDBC-level) types.
//!
//! Every column-backed part and every literal resolves to one of these
//! process-wide singletons, so identity comparison is as good as equality.

use std::collections::HashMap;
use std::fmt;

use crate::domain_model::BasicKind;

#[derive(Debug, PartialEq, Eq)]
pub struct BasicType {
    /// Registry name, matches the `BasicKind` serde name
    pub name: &'static str,
    pub kind: BasicKind,
    /// Column type used when rendering DDL-like descriptions
    pub sql_type: &'static str,
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.sql_type)
    }
}

const ALL_KINDS: [BasicKind; 11] = [
    BasicKind::Boolean,
    BasicKind::Integer,
    BasicKind::Long,
    BasicKind::Double,
    BasicKind::Decimal,
    BasicKind::String,
    BasicKind::Date,
    BasicKind::Timestamp,
    BasicKind::Uuid,
    BasicKind::Binary,
    BasicKind::Enum,
];

fn sql_type_for(kind: BasicKind) -> &'static str {
    match kind {
        BasicKind::Boolean => "boolean",
        BasicKind::Integer => "integer",
        BasicKind::Long => "bigint",
        BasicKind::Double => "double precision",
        BasicKind::Decimal => "numeric",
        BasicKind::String => "varchar",
        BasicKind::Date => "date",
        BasicKind::Timestamp => "timestamp",
        BasicKind::Uuid => "uuid",
        BasicKind::Binary => "varbinary",
        BasicKind::Enum => "smallint",
    }
}

lazy_static::lazy_static! {
    static ref BASIC_TYPES: HashMap<BasicKind, BasicType> = ALL_KINDS
        .iter()
        .map(|kind| {
            (
                *kind,
                BasicType {
                    name: kind.name(),
                    kind: *kind,
                    sql_type: sql_type_for(*kind),
                },
            )
        })
        .collect();
}

/// Get the shared basic type for a kind
pub fn basic_type(kind: BasicKind) -> &'static BasicType {
    &BASIC_TYPES[&kind]
}
