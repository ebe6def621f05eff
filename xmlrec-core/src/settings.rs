//! Clap-free settings for the edit and schema pipelines.

use camino::Utf8PathBuf;
use xmlrec_descriptor::DEFAULT_TITLE_FALLBACK;
use xmlrec_edit::SaveOptions;
use xmlrec_schema::{AggregateOptions, MalformedPolicy};
use xmlrec_types::names::{DEFAULT_EXTENSION, DEFAULT_RECORD_ELEMENT, SCHEMA_FILE_NAME};

/// Settings for opening and saving documents.
#[derive(Debug, Clone)]
pub struct EditSettings {
    /// Global title keys probed after a file type's designated title attribute.
    pub title_fallback: Vec<String>,
    pub record_element: String,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            title_fallback: DEFAULT_TITLE_FALLBACK.iter().map(|s| s.to_string()).collect(),
            record_element: DEFAULT_RECORD_ELEMENT.to_string(),
        }
    }
}

impl EditSettings {
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            record_element: self.record_element.clone(),
        }
    }
}

/// Settings for the schema pipeline.
#[derive(Debug, Clone)]
pub struct SchemaSettings {
    pub scan_root: Utf8PathBuf,
    pub extension: String,
    pub skip_malformed: bool,
    pub out_dir: Utf8PathBuf,
    pub file_name: String,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            scan_root: Utf8PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            skip_malformed: false,
            out_dir: Utf8PathBuf::from("."),
            file_name: SCHEMA_FILE_NAME.to_string(),
        }
    }
}

impl SchemaSettings {
    pub fn destination(&self) -> Utf8PathBuf {
        self.out_dir.join(&self.file_name)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            extension: self.extension.clone(),
            on_malformed: if self.skip_malformed {
                MalformedPolicy::Skip
            } else {
                MalformedPolicy::Abort
            },
        }
    }
}
