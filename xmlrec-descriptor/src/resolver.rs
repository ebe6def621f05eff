use crate::ports::DescriptorSource;
use std::sync::Arc;
use tracing::trace;
use xmlrec_types::{AttributeEntry, FileType};

/// Title keys probed after a file type's designated title attribute.
pub const DEFAULT_TITLE_FALLBACK: &[&str] = &["alias", "dayofweek", "store2", "job"];

/// Which lookup, if any, missed while resolving an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    Known,
    UnknownFileType,
    UnknownAttribute,
    UnknownValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entry: AttributeEntry,
    pub status: ResolveStatus,
}

/// The field the caller just changed on an existing entry.
#[derive(Debug, Clone, Copy)]
pub enum Edit<'a> {
    /// New raw value; the attribute key is kept.
    Value(&'a str),
    /// New attribute key; the current value is re-resolved under it.
    Attr(&'a str),
}

impl Edit<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Edit::Value(s) | Edit::Attr(s) => s,
        }
    }
}

/// Resolves raw attribute/value pairs against a descriptor source.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn DescriptorSource + Send + Sync>,
    title_fallback: Vec<String>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("title_fallback", &self.title_fallback)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new(source: Arc<dyn DescriptorSource + Send + Sync>) -> Self {
        Self {
            source,
            title_fallback: DEFAULT_TITLE_FALLBACK.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the global fallback title keys.
    pub fn with_title_fallback(mut self, keys: Vec<String>) -> Self {
        self.title_fallback = keys;
        self
    }

    /// Resolve a raw pair. Never fails; misses leave descriptions empty.
    pub fn resolve(&self, file_type: &FileType, attr: &str, value: &str) -> Resolution {
        let Some(table) = self.source.table(file_type) else {
            return Resolution {
                entry: AttributeEntry::raw(attr, value),
                status: ResolveStatus::UnknownFileType,
            };
        };

        let Some((key, desc)) = table.find_attribute(attr) else {
            trace!(file_type = %file_type, attr, "attribute not in descriptor table");
            return Resolution {
                entry: AttributeEntry::raw(attr, value),
                status: ResolveStatus::UnknownAttribute,
            };
        };

        let value_desc = desc.value_description(value).map(str::to_string);
        let status = if value_desc.is_some() {
            ResolveStatus::Known
        } else {
            ResolveStatus::UnknownValue
        };

        Resolution {
            entry: AttributeEntry {
                attr: key.to_string(),
                attr_desc: desc.description.clone(),
                value: value.to_string(),
                value_desc,
            },
            status,
        }
    }

    /// Re-resolve `current` after one of its fields was edited.
    pub fn resolve_edit(
        &self,
        file_type: &FileType,
        current: &AttributeEntry,
        edit: Edit<'_>,
    ) -> Resolution {
        match edit {
            Edit::Value(value) => self.resolve(file_type, &current.attr, value),
            Edit::Attr(attr) => self.resolve(file_type, attr, &current.value),
        }
    }

    /// The designated title attribute for `file_type`, if the catalog names one.
    pub fn title_attr(&self, file_type: &FileType) -> Option<&str> {
        self.source
            .table(file_type)
            .and_then(|t| t.title_attr.as_deref())
    }

    /// Title keys in probe order: the designated attribute first, then the
    /// table's own fallback list or the global one. Duplicates are dropped.
    pub fn title_candidates(&self, file_type: &FileType) -> Vec<&str> {
        let table = self.source.table(file_type);
        let fallback = table
            .and_then(|t| t.title_fallback.as_deref())
            .unwrap_or(self.title_fallback.as_slice());

        let mut out: Vec<&str> = Vec::with_capacity(fallback.len() + 1);
        if let Some(title) = self.title_attr(file_type) {
            out.push(title);
        }
        for key in fallback {
            if !out.contains(&key.as_str()) {
                out.push(key.as_str());
            }
        }
        out
    }
}
