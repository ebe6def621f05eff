use indexmap::IndexMap;
use xmlrec_edit::Document;
use xmlrec_types::{FileType, SchemaEntry};

/// Folds documents into per-type schema entries.
///
/// Tables appear in the order their type was first seen; within a table, keys keep
/// the first sample value ever absorbed for them.
#[derive(Debug, Clone, Default)]
pub struct SchemaAccumulator {
    tables: IndexMap<FileType, SchemaEntry>,
}

impl SchemaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, file_type: &FileType) -> &mut SchemaEntry {
        self.tables
            .entry(file_type.clone())
            .or_insert_with(|| SchemaEntry::new(file_type.clone()))
    }

    /// Absorb raw attribute pairs under `file_type`. Returns how many keys were new.
    pub fn absorb<'a>(
        &mut self,
        file_type: &FileType,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        let entry = self.entry(file_type);
        let mut added = 0;
        for (key, value) in pairs {
            if entry.absorb(key, value) {
                added += 1;
            }
        }
        added
    }

    /// Absorb every attribute of every record in `doc`. Passthrough nodes contribute nothing.
    pub fn absorb_document(&mut self, doc: &Document) -> usize {
        // Register the type even when the document has no records.
        self.entry(doc.file_type());
        let mut added = 0;
        for (_, record) in doc.records() {
            added += self.absorb(
                doc.file_type(),
                record
                    .attributes()
                    .iter()
                    .map(|a| (a.attr.as_str(), a.value.as_str())),
            );
        }
        added
    }

    /// Merge another accumulator that saw *later* files. Existing samples win.
    pub fn merge(&mut self, later: SchemaAccumulator) {
        for (file_type, entry) in later.tables {
            self.absorb(
                &file_type,
                entry.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn into_entries(self) -> Vec<SchemaEntry> {
        self.tables.into_values().collect()
    }
}
