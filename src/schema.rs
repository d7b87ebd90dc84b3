//! Declared column types and schema bookkeeping.
//!
//! Declared types are advisory: the join engine only ever compares `Value`s,
//! never `DataType`s. `DataType` exists for the loader's type inference and
//! for presenting a schema to a caller.

use serde::{Deserialize, Serialize};

/// The declared type of a column. Advisory — not enforced on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer column.
    Integer,
    /// IEEE-754 double column.
    Double,
    /// Text column.
    String,
    /// A column whose sampled values were all null (loader fallback only).
    Null,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Integer => "Integer",
            DataType::Double => "Double",
            DataType::String => "String",
            DataType::Null => "Null",
        };
        write!(f, "{name}")
    }
}

/// One column's declaration within a [`crate::table::Table`] schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// The column's name. Unique within its owning schema.
    pub name: String,
    /// The advisory declared type.
    pub declared_type: DataType,
    /// The column's position, equal to its index in the schema's column list.
    pub position: usize,
}
