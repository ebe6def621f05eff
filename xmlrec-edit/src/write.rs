use crate::document::{Document, RecordSlot};
use crate::error::{EditError, EditResult};
use camino::{Utf8Path, Utf8PathBuf};
use quick_xml::escape::escape;
use std::io::Write;
use tracing::{debug, info};
use xmlrec_types::names::DEFAULT_RECORD_ELEMENT;

const DEFAULT_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";
const INDENT: &str = "  ";

#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Element name every record is written under.
    pub record_element: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            record_element: DEFAULT_RECORD_ELEMENT.to_string(),
        }
    }
}

impl Document {
    /// Serialize the document.
    ///
    /// Root name and attributes are written as loaded, passthrough nodes verbatim,
    /// and each record as one element carrying exactly its `attr`/`value` pairs.
    pub fn to_xml(&self, opts: &SaveOptions) -> String {
        let mut out = String::new();
        if self.prolog.is_empty() {
            out.push_str(DEFAULT_DECLARATION);
        } else {
            out.push_str(&self.prolog);
        }

        out.push('<');
        out.push_str(&self.root_name);
        push_attributes(
            &mut out,
            self.root_attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        if self.slots.is_empty() {
            out.push_str("/>");
        } else {
            out.push_str(">\n");
            for slot in &self.slots {
                out.push_str(INDENT);
                match slot {
                    RecordSlot::Passthrough(p) => out.push_str(&p.raw),
                    RecordSlot::Record(r) => {
                        out.push('<');
                        out.push_str(&opts.record_element);
                        push_attributes(
                            &mut out,
                            r.attributes
                                .iter()
                                .map(|a| (a.attr.as_str(), a.value.as_str())),
                        );
                        out.push_str(" />");
                    }
                }
                out.push('\n');
            }
            out.push_str("</");
            out.push_str(&self.root_name);
            out.push('>');
        }

        if self.epilog.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&self.epilog);
        }
        out
    }

    /// Write the document to `dest`, or back to the path it was loaded from.
    ///
    /// The payload is serialized in full first and then moved into place atomically,
    /// so a failed save leaves neither a partial file nor a changed document. On
    /// success the dirty flag is cleared and `dest` becomes the document's path.
    pub fn save(&mut self, dest: Option<&Utf8Path>, opts: &SaveOptions) -> EditResult<Utf8PathBuf> {
        let dest = match dest.or(self.source_path.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => return Err(EditError::NoDestination),
        };

        let xml = self.to_xml(opts);
        atomic_write(&dest, xml.as_bytes()).map_err(|source| EditError::Io {
            path: dest.clone(),
            source,
        })?;

        info!(path = %dest, bytes = xml.len(), "saved document");
        self.source_path = Some(dest.clone());
        self.set_dirty(false);
        Ok(dest)
    }
}

fn push_attributes<'a>(out: &mut String, attrs: impl Iterator<Item = (&'a str, &'a str)>) {
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

/// Replace `dest` with `contents` via a temp file in the same directory.
pub(crate) fn atomic_write(dest: &Utf8Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;

    debug!(path = %dest, "atomic write complete");
    Ok(())
}
