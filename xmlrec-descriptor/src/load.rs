use crate::catalog::DescriptorCatalog;
use camino::Utf8Path;
use fs_err as fs;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// On-disk encodings a catalog may use, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read descriptor catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported descriptor catalog format: {path}")]
    UnsupportedFormat { path: String },

    #[error("{format} parse error in {path}: {message}")]
    Parse {
        path: String,
        format: CatalogFormat,
        message: String,
    },
}

/// Load a descriptor catalog, picking the decoder from the file extension.
pub fn load_catalog(path: &Utf8Path) -> Result<DescriptorCatalog, CatalogError> {
    let format = CatalogFormat::from_path(path).ok_or_else(|| CatalogError::UnsupportedFormat {
        path: path.to_string(),
    })?;
    let contents = fs::read_to_string(path)?;
    let catalog = parse_catalog(&contents, format).map_err(|message| CatalogError::Parse {
        path: path.to_string(),
        format,
        message,
    })?;

    debug!(path = %path, tables = catalog.len(), "loaded descriptor catalog");
    Ok(catalog)
}

/// Decode catalog text. The error is the decoder's message.
pub fn parse_catalog(contents: &str, format: CatalogFormat) -> Result<DescriptorCatalog, String> {
    match format {
        CatalogFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        CatalogFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        CatalogFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    }
}
