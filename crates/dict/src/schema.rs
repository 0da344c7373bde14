//! Schema definitions fed into the dictionary.

use serde::{Deserialize, Serialize};

/// A table (or view) definition: a name plus its columns.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TableDef {
    /// The table name. Unique identifier for the table within the dictionary.
    pub name: String,
    /// The table's columns, in declaration order.
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Creates a table definition from a name and column names, for the common
    /// case where only names matter.
    pub fn with_columns(name: impl Into<String>, columns: &[&str]) -> Self {
        TableDef {
            name: name.into(),
            columns: columns
                .iter()
                .map(|c| ColumnDef {
                    name: (*c).to_string(),
                    data_type: None,
                    nullable: true,
                })
                .collect(),
        }
    }
}

/// A column definition within a [`TableDef`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ColumnDef {
    /// The column name, unique within its table.
    pub name: String,
    /// Declared SQL type name, if known.
    pub data_type: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

/// A function definition. Functions are keyed by name and arity, so `count/1`
/// and `count/2` are distinct dictionary objects.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FunctionDef {
    /// The function name.
    pub name: String,
    /// Number of arguments the function takes.
    pub arity: usize,
}
