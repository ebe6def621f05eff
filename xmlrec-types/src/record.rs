use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared category of a record document, taken from the root `type` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileType(pub String);

impl FileType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One resolved attribute of a record.
///
/// `attr` and `value` are the persisted pair; the descriptions are looked up
/// from the descriptor catalog and are `None` when the catalog has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub attr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_desc: Option<String>,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_desc: Option<String>,
}

impl AttributeEntry {
    /// An entry with no descriptions.
    pub fn raw(attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            attr_desc: None,
            value: value.into(),
            value_desc: None,
        }
    }

    pub fn is_described(&self) -> bool {
        self.attr_desc.is_some() || self.value_desc.is_some()
    }
}
