use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use xmlrec_types::FileType;

/// All descriptor tables, keyed by file type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorCatalog {
    pub tables: BTreeMap<FileType, DescriptorTable>,
}

impl DescriptorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_type: FileType, table: DescriptorTable) {
        self.tables.insert(file_type, table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Descriptors for one file type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorTable {
    /// Attribute whose value is a record's display title (e.g. `name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_attr: Option<String>,

    /// Replaces the global fallback title keys for this file type when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_fallback: Option<Vec<String>>,

    pub attributes: BTreeMap<String, AttributeDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Alternate spellings that resolve to this attribute's key.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Raw value -> value description.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

impl DescriptorTable {
    /// Find an attribute by key, then by alias. Returns the canonical key.
    pub fn find_attribute(&self, key: &str) -> Option<(&str, &AttributeDescriptor)> {
        if let Some((k, d)) = self.attributes.get_key_value(key) {
            return Some((k.as_str(), d));
        }
        self.attributes
            .iter()
            .find(|(_, d)| d.aliases.iter().any(|a| a == key))
            .map(|(k, d)| (k.as_str(), d))
    }

    pub fn with_title_attr(mut self, attr: impl Into<String>) -> Self {
        self.title_attr = Some(attr.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, desc: AttributeDescriptor) -> Self {
        self.attributes.insert(key.into(), desc);
        self
    }
}

impl AttributeDescriptor {
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>, description: impl Into<String>) -> Self {
        self.values.insert(value.into(), description.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn value_description(&self, value: &str) -> Option<&str> {
        self.values.get(value).map(String::as_str)
    }
}
