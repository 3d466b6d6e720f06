//! Relation schema discovered through catalog introspection

use serde::{Deserialize, Serialize};

/// One field descriptor from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(rename = "FieldName")]
    pub name: String,

    #[serde(rename = "FieldType", default)]
    pub field_type: String,
}

/// Primary key and non-key fields of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Single-component primary key
    pub primary_key: String,

    /// Non-key field names, sorted
    pub fields: Vec<String>,
}

impl TableSchema {
    /// Build a schema from discovered metadata.
    ///
    /// The primary key is removed from the field list and the remaining names
    /// are sorted so statement text is stable across runs.
    pub fn new(primary_key: impl Into<String>, fields: &[FieldInfo]) -> Self {
        let primary_key = primary_key.into();
        let mut names: Vec<String> = fields
            .iter()
            .filter(|f| f.name != primary_key)
            .map(|f| f.name.clone())
            .collect();
        names.sort();
        names.dedup();

        Self {
            primary_key,
            fields: names,
        }
    }

    /// Check if a non-key field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}
