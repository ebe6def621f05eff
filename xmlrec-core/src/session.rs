//! One editing session: a document plus the resolver and save options it was opened with.

use crate::ports::CatalogSource;
use crate::settings::EditSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use std::sync::Arc;
use tracing::{debug, info};
use xmlrec_descriptor::{Edit, Resolution, Resolver};
use xmlrec_edit::{Document, EditResult, SaveOptions};
use xmlrec_types::FileType;

/// Owns a [`Document`] for the duration of an edit.
///
/// Access is single-owner; hosts that share a session across threads wrap it
/// in their own lock.
#[derive(Debug)]
pub struct EditSession {
    document: Document,
    resolver: Resolver,
    save: SaveOptions,
}

/// Build the resolver an edit or schema run uses.
pub fn build_resolver(
    settings: &EditSettings,
    catalog: &dyn CatalogSource,
) -> anyhow::Result<Resolver> {
    let catalog = catalog.load_catalog()?;
    debug!(tables = catalog.len(), "descriptor catalog loaded");
    Ok(Resolver::new(Arc::new(catalog)).with_title_fallback(settings.title_fallback.clone()))
}

impl EditSession {
    pub fn open(
        path: &Utf8Path,
        settings: &EditSettings,
        catalog: &dyn CatalogSource,
    ) -> anyhow::Result<Self> {
        let resolver = build_resolver(settings, catalog)?;
        let document =
            xmlrec_edit::load_path(path, &resolver).with_context(|| format!("open {}", path))?;
        info!(
            path = %path,
            file_type = %document.file_type(),
            slots = document.slots().len(),
            "document opened"
        );
        Ok(Self::from_parts(document, resolver, settings.save_options()))
    }

    pub fn from_parts(document: Document, resolver: Resolver, save: SaveOptions) -> Self {
        Self {
            document,
            resolver,
            save,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for listener registration.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn file_type(&self) -> &FileType {
        self.document.file_type()
    }

    /// Resolve a free-standing pair against this document's file type.
    pub fn resolve(&self, attr: &str, value: &str) -> Resolution {
        self.resolver.resolve(self.document.file_type(), attr, value)
    }

    pub fn set(&mut self, slot: usize, entry: usize, edit: Edit<'_>) -> EditResult<bool> {
        self.document
            .edit_attribute(&self.resolver, slot, entry, edit)
    }

    /// Unified diff of the serialized document before and after `edit`.
    ///
    /// The session's own document is left untouched. An empty string means the
    /// edit would be a no-op.
    pub fn preview(&self, slot: usize, entry: usize, edit: Edit<'_>) -> EditResult<String> {
        let mut scratch = self.document.clone();
        if !scratch.edit_attribute(&self.resolver, slot, entry, edit)? {
            return Ok(String::new());
        }

        let before = self.document.to_xml(&self.save);
        let after = scratch.to_xml(&self.save);
        let name = self
            .document
            .source_path()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "document".to_string());

        let mut out = format!("diff --git a/{0} b/{0}\n", name);
        let patch = diffy::create_patch(&before, &after);
        out.push_str(&PatchFormatter::new().fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    /// Save to `dest`, or back to the file the document was opened from.
    pub fn save(&mut self, dest: Option<&Utf8Path>) -> EditResult<Utf8PathBuf> {
        self.document.save(dest, &self.save)
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
