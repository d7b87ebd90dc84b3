//! Named, schema-checked row storage.

use crate::error::{BifrostError, Result};
use crate::row::Row;
use crate::schema::{ColumnInfo, DataType};
use crate::value::Value;
use std::mem::size_of;

/// A named collection of rows over a declared, append-only schema.
///
/// Rows preserve insertion order; that order is the only order ever observed
/// by callers. Column names are unique within one table (`add_column` does
/// not check this — the loader and join engine are the only producers of
/// schemas in this crate and neither ever emits a collision — but a caller
/// building a `Table` by hand should not rely on duplicate names resolving
/// sensibly through `column_index`, which returns the first match).
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Vec<ColumnInfo>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty, schema-less table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a column declaration. The column's position is its index.
    pub fn add_column(&mut self, name: impl Into<String>, declared_type: DataType) {
        let position = self.schema.len();
        self.schema.push(ColumnInfo {
            name: name.into(),
            declared_type,
            position,
        });
    }

    /// Appends a row, failing if its arity does not match the schema.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(BifrostError::SchemaMismatch {
                expected: self.schema.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Row count.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// The table's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered column declarations.
    pub fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    /// The ordered, insertion-order rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A single row by position, or `None` if out of range.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Resolves a column name to its position, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.iter().find(|c| c.name == name).map(|c| c.position)
    }

    /// Drops all rows, keeping the schema.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// A best-effort byte estimate: fixed per-row/per-column overhead plus
    /// the byte length of every `Text` value, mirroring the original's
    /// `sizeof(*this) + capacity * sizeof(T)` style estimate.
    pub fn estimate_memory_usage(&self) -> usize {
        let mut total = size_of::<Table>();
        total += self.schema.capacity() * size_of::<ColumnInfo>();
        total += self.rows.capacity() * size_of::<Row>();
        for row in &self.rows {
            for value in row.values() {
                if let Value::Text(s) = value {
                    total += s.capacity();
                }
            }
        }
        total
    }

    /// Prints `Table: <name>` followed by a comma-separated column list.
    pub fn print_schema(&self) {
        println!("Table: {}", self.name);
        let names: Vec<&str> = self.schema.iter().map(|c| c.name.as_str()).collect();
        println!("Schema: {}", names.join(", "));
    }

    /// Prints the schema followed by up to `max_rows` sample rows.
    pub fn print_sample(&self, max_rows: usize) {
        self.print_schema();
        let shown = max_rows.min(self.rows.len());
        println!("Sample data ({shown} rows):");
        for row in self.rows.iter().take(shown) {
            println!("  {row}");
        }
        if self.rows.len() > shown {
            println!("  ... ({} more rows)", self.rows.len() - shown);
        }
        println!();
    }
}
