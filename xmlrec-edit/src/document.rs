use crate::error::{EditError, EditResult};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use tracing::debug;
use xmlrec_descriptor::{Edit, Resolver};
use xmlrec_types::{AttributeEntry, FileType};

/// Kind of a non-element child of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Comment,
    Text,
    CData,
    ProcessingInstruction,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Comment => "Comment",
            NodeKind::Text => "Text",
            NodeKind::CData => "CData",
            NodeKind::ProcessingInstruction => "ProcessingInstruction",
        }
    }
}

/// A non-element child, kept as the markup it was read from.
///
/// Comments, CDATA sections and processing instructions round-trip unchanged. Text
/// nodes are stored with surrounding whitespace trimmed, since the writer lays out
/// its own indentation; whitespace-only text between elements is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passthrough {
    pub kind: NodeKind,
    pub raw: String,
}

/// One element child of the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub(crate) element: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) attributes: Vec<AttributeEntry>,
}

impl Record {
    /// Element name the record was read from. Saving uses the generic record name.
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Value description of the attribute whose value is the title.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn attributes(&self) -> &[AttributeEntry] {
        &self.attributes
    }

    pub fn get(&self, attr: &str) -> Option<&AttributeEntry> {
        self.attributes.iter().find(|a| a.attr == attr)
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.as_deref().is_some_and(|t| t.contains(needle))
            || self.description.as_deref().is_some_and(|d| d.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSlot {
    Passthrough(Passthrough),
    Record(Record),
}

impl RecordSlot {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            RecordSlot::Record(r) => Some(r),
            RecordSlot::Passthrough(_) => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, RecordSlot::Record(_))
    }

    /// Display title: the record title, or the raw markup of a passthrough node.
    pub fn title(&self) -> Option<&str> {
        match self {
            RecordSlot::Record(r) => r.title(),
            RecordSlot::Passthrough(p) => Some(&p.raw),
        }
    }

    /// Display description: the record description, or the passthrough node kind.
    pub fn description(&self) -> Option<&str> {
        match self {
            RecordSlot::Record(r) => r.description(),
            RecordSlot::Passthrough(p) => Some(p.kind.label()),
        }
    }
}

/// Change notifications for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    EntryChanged {
        slot: usize,
        entry: usize,
    },
    TitleChanged {
        slot: usize,
        title: Option<String>,
    },
    DirtyChanged(bool),
}

type Listener = Box<dyn FnMut(&DocumentEvent) + Send>;

/// A loaded record document.
///
/// Owned by one editing session; mutate it through [`Document::edit_attribute`] so
/// descriptions, titles and the dirty flag stay consistent.
pub struct Document {
    pub(crate) root_name: String,
    pub(crate) root_attributes: Vec<(String, String)>,
    pub(crate) file_type: FileType,
    pub(crate) slots: Vec<RecordSlot>,
    pub(crate) prolog: String,
    pub(crate) epilog: String,
    pub(crate) source_path: Option<Utf8PathBuf>,
    pub(crate) dirty: bool,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root_name", &self.root_name)
            .field("file_type", &self.file_type)
            .field("slots", &self.slots.len())
            .field("source_path", &self.source_path)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Clones the model only; listeners are not copied.
impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            root_name: self.root_name.clone(),
            root_attributes: self.root_attributes.clone(),
            file_type: self.file_type.clone(),
            slots: self.slots.clone(),
            prolog: self.prolog.clone(),
            epilog: self.epilog.clone(),
            source_path: self.source_path.clone(),
            dirty: self.dirty,
            listeners: Vec::new(),
        }
    }
}

impl Document {
    pub(crate) fn new(
        root_name: String,
        root_attributes: Vec<(String, String)>,
        file_type: FileType,
    ) -> Self {
        Self {
            root_name,
            root_attributes,
            file_type,
            slots: Vec::new(),
            prolog: String::new(),
            epilog: String::new(),
            source_path: None,
            dirty: false,
            listeners: Vec::new(),
        }
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn root_attributes(&self) -> &[(String, String)] {
        &self.root_attributes
    }

    pub fn file_type(&self) -> &FileType {
        &self.file_type
    }

    pub fn slots(&self) -> &[RecordSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&RecordSlot> {
        self.slots.get(index)
    }

    /// Records with their slot index, skipping passthrough nodes.
    pub fn records(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_record().map(|r| (i, r)))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn source_path(&self) -> Option<&Utf8Path> {
        self.source_path.as_deref()
    }

    pub(crate) fn set_source_path(&mut self, path: Utf8PathBuf) {
        self.source_path = Some(path);
    }

    /// Register a listener for [`DocumentEvent`]s.
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: DocumentEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.emit(DocumentEvent::DirtyChanged(dirty));
        }
    }

    /// Re-resolve one attribute entry after its value or key was edited.
    ///
    /// Returns `Ok(false)` without touching anything when the new text equals the
    /// current one. Validation happens before any mutation.
    pub fn edit_attribute(
        &mut self,
        resolver: &Resolver,
        slot: usize,
        entry: usize,
        edit: Edit<'_>,
    ) -> EditResult<bool> {
        let len = self.slots.len();
        let record = match self.slots.get(slot) {
            Some(RecordSlot::Record(r)) => r,
            Some(RecordSlot::Passthrough(_)) => return Err(EditError::NotARecord { index: slot }),
            None => return Err(EditError::SlotOutOfRange { index: slot, len }),
        };
        let current = record
            .attributes
            .get(entry)
            .ok_or(EditError::EntryOutOfRange {
                slot,
                entry,
                len: record.attributes.len(),
            })?;

        let unchanged = match edit {
            Edit::Value(v) => current.value == v,
            Edit::Attr(a) => current.attr == a,
        };
        if unchanged {
            return Ok(false);
        }

        let resolved = resolver.resolve_edit(&self.file_type, current, edit).entry;
        if &resolved == current {
            // e.g. an alias of the current key
            return Ok(false);
        }
        if let Edit::Attr(raw) = edit {
            if !is_valid_name(raw) {
                return Err(EditError::InvalidAttributeName {
                    attr: raw.to_string(),
                });
            }
            let clash = record
                .attributes
                .iter()
                .enumerate()
                .any(|(i, a)| i != entry && a.attr == resolved.attr);
            if clash {
                return Err(EditError::DuplicateAttribute {
                    slot,
                    attr: resolved.attr,
                });
            }
        }

        let title_attr = resolver.title_attr(&self.file_type).map(str::to_string);
        debug!(
            slot,
            entry,
            attr = %resolved.attr,
            value = %resolved.value,
            "attribute re-resolved"
        );

        let title_changed = match &mut self.slots[slot] {
            RecordSlot::Passthrough(_) => return Err(EditError::NotARecord { index: slot }),
            RecordSlot::Record(record) => {
                let is_title = title_attr.as_deref() == Some(resolved.attr.as_str());
                let (title, desc) = (resolved.value.clone(), resolved.value_desc.clone());
                record.attributes[entry] = resolved;
                if is_title {
                    record.title = Some(title);
                    record.description = desc;
                    Some(record.title.clone())
                } else {
                    None
                }
            }
        };

        self.emit(DocumentEvent::EntryChanged { slot, entry });
        if let Some(title) = title_changed {
            self.emit(DocumentEvent::TitleChanged { slot, title });
        }
        self.set_dirty(true);
        Ok(true)
    }

    /// Find the next record whose title or description contains `needle`.
    ///
    /// Scans cyclically from just after `from` (or from the start when `from` is
    /// `None` or out of range) and stops before coming back to `from`.
    pub fn search(&self, from: Option<usize>, needle: &str) -> Option<usize> {
        let n = self.slots.len();
        let order: Box<dyn Iterator<Item = usize>> = match from {
            Some(i) if i < n => Box::new((i + 1..n).chain(0..i)),
            _ => Box::new(0..n),
        };

        order.into_iter().find(|&i| match &self.slots[i] {
            RecordSlot::Record(r) => r.matches(needle),
            RecordSlot::Passthrough(_) => false,
        })
    }
}

/// Conservative XML name check for attribute keys entered by hand.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}
