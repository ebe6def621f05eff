use crate::record::FileType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Union of attribute keys observed for one file type, each with the first
/// sample value seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(rename = "TableName")]
    pub table_name: FileType,

    #[serde(rename = "SchemaDictionary", default)]
    pub attributes: IndexMap<String, String>,
}

impl SchemaEntry {
    pub fn new(table_name: FileType) -> Self {
        Self {
            table_name,
            attributes: IndexMap::new(),
        }
    }

    /// Record `key` with `sample` unless the key is already known.
    ///
    /// Returns `true` when the key was new.
    pub fn absorb(&mut self, key: &str, sample: &str) -> bool {
        if self.attributes.contains_key(key) {
            return false;
        }
        self.attributes.insert(key.to_string(), sample.to_string());
        true
    }
}
