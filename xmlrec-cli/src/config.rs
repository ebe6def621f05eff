//! Configuration file loading for xmlrec.
//!
//! Discovers and loads `xmlrec.toml` from the working root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use xmlrec_core::settings::{EditSettings, SchemaSettings};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "xmlrec.toml";

/// Top-level configuration from xmlrec.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct XmlrecConfig {
    pub descriptors: DescriptorsConfig,
    pub titles: TitlesConfig,
    pub scan: ScanConfig,
    pub schema: SchemaConfig,
    pub save: SaveConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DescriptorsConfig {
    /// Descriptor catalog (`.json`, `.toml`, `.yaml`), relative to the root.
    pub path: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    /// Title keys probed after a file type's designated title attribute.
    pub fallback: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub root: Option<Utf8PathBuf>,
    pub extension: Option<String>,
    /// Report malformed files instead of aborting the scan.
    pub skip_malformed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub out_dir: Option<Utf8PathBuf>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Element name records are written under.
    pub record_element: Option<String>,
}

/// Discover the xmlrec.toml config file in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<XmlrecConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<XmlrecConfig> {
    let config: XmlrecConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<XmlrecConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(XmlrecConfig::default()),
    }
}

/// Edit-side configuration after merging.
#[derive(Debug, Clone)]
pub struct MergedEdit {
    pub catalog_path: Option<Utf8PathBuf>,
    pub settings: EditSettings,
}

/// Schema flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SchemaOverrides {
    pub scan_root: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
    pub extension: Option<String>,
    pub skip_malformed: bool,
}

/// Builder for merging config file with CLI arguments.
///
/// Relative paths from the config file are taken relative to `root`.
pub struct ConfigMerger {
    config: XmlrecConfig,
    root: Utf8PathBuf,
}

impl ConfigMerger {
    pub fn new(config: XmlrecConfig, root: &Utf8Path) -> Self {
        Self {
            config,
            root: root.to_path_buf(),
        }
    }

    fn rooted(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// CLI catalog path and a non-empty CLI fallback list replace the config values.
    pub fn merge_edit_args(
        &self,
        cli_descriptors: Option<&Utf8Path>,
        cli_fallback: &[String],
    ) -> MergedEdit {
        let catalog_path = match cli_descriptors {
            Some(p) => Some(p.to_path_buf()),
            None => self.config.descriptors.path.as_deref().map(|p| self.rooted(p)),
        };

        let mut settings = EditSettings::default();
        if !cli_fallback.is_empty() {
            settings.title_fallback = cli_fallback.to_vec();
        } else if let Some(fallback) = &self.config.titles.fallback {
            settings.title_fallback = fallback.clone();
        }
        if let Some(element) = &self.config.save.record_element {
            settings.record_element = element.clone();
        }

        MergedEdit {
            catalog_path,
            settings,
        }
    }

    /// The scan root defaults to the working root; the output directory to the scan root.
    pub fn merge_schema_args(&self, cli: &SchemaOverrides) -> SchemaSettings {
        let defaults = SchemaSettings::default();
        let scan_root = match &cli.scan_root {
            Some(p) => p.clone(),
            None => self
                .config
                .scan
                .root
                .as_deref()
                .map(|p| self.rooted(p))
                .unwrap_or_else(|| self.root.clone()),
        };
        let out_dir = match &cli.out_dir {
            Some(p) => p.clone(),
            None => self
                .config
                .schema
                .out_dir
                .as_deref()
                .map(|p| self.rooted(p))
                .unwrap_or_else(|| scan_root.clone()),
        };

        SchemaSettings {
            scan_root,
            out_dir,
            extension: cli
                .extension
                .clone()
                .or_else(|| self.config.scan.extension.clone())
                .unwrap_or(defaults.extension),
            skip_malformed: cli.skip_malformed || self.config.scan.skip_malformed,
            file_name: self
                .config
                .schema
                .file_name
                .clone()
                .unwrap_or(defaults.file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[descriptors]
path = "descriptors.toml"

[titles]
fallback = ["alias", "job"]

[scan]
root = "data"
extension = "rec"
skip_malformed = true

[schema]
out_dir = "out"
file_name = "schema.json"

[save]
record_element = "row"
"#;
        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.descriptors.path.as_deref(),
            Some(Utf8Path::new("descriptors.toml"))
        );
        assert_eq!(
            config.titles.fallback,
            Some(vec!["alias".to_string(), "job".to_string()])
        );
        assert!(config.scan.skip_malformed);
        assert_eq!(config.save.record_element.as_deref(), Some("row"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.descriptors.path.is_none());
        assert!(!config.scan.skip_malformed);
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[scan\nroot = 1").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_merge_edit_config_paths_are_rooted() {
        let mut config = XmlrecConfig::default();
        config.descriptors.path = Some("d.toml".into());
        config.save.record_element = Some("row".to_string());

        let merged = ConfigMerger::new(config, Utf8Path::new("/work")).merge_edit_args(None, &[]);
        assert_eq!(merged.catalog_path, Some(Utf8PathBuf::from("/work/d.toml")));
        assert_eq!(merged.settings.record_element, "row");
        assert_eq!(merged.settings.title_fallback[0], "alias");
    }

    #[test]
    fn test_merge_edit_cli_wins() {
        let mut config = XmlrecConfig::default();
        config.descriptors.path = Some("d.toml".into());
        config.titles.fallback = Some(vec!["job".to_string()]);

        let merged = ConfigMerger::new(config, Utf8Path::new("/work"))
            .merge_edit_args(Some(Utf8Path::new("cli.json")), &["name".to_string()]);
        assert_eq!(merged.catalog_path, Some(Utf8PathBuf::from("cli.json")));
        assert_eq!(merged.settings.title_fallback, vec!["name".to_string()]);
    }

    #[test]
    fn test_merge_schema_defaults() {
        let settings = ConfigMerger::new(XmlrecConfig::default(), Utf8Path::new("/work"))
            .merge_schema_args(&SchemaOverrides::default());
        assert_eq!(settings.scan_root, Utf8PathBuf::from("/work"));
        assert_eq!(settings.out_dir, Utf8PathBuf::from("/work"));
        assert_eq!(settings.extension, "xml");
        assert_eq!(settings.file_name, "Schema.json");
        assert!(!settings.skip_malformed);
    }

    #[test]
    fn test_merge_schema_config_then_cli() {
        let mut config = XmlrecConfig::default();
        config.scan.root = Some("data".into());
        config.scan.extension = Some("rec".to_string());
        config.schema.file_name = Some("s.json".to_string());

        let merger = ConfigMerger::new(config, Utf8Path::new("/work"));
        let from_file = merger.merge_schema_args(&SchemaOverrides::default());
        assert_eq!(from_file.scan_root, Utf8PathBuf::from("/work/data"));
        assert_eq!(from_file.out_dir, Utf8PathBuf::from("/work/data"));
        assert_eq!(from_file.destination(), Utf8PathBuf::from("/work/data/s.json"));

        let from_cli = merger.merge_schema_args(&SchemaOverrides {
            scan_root: Some("other".into()),
            out_dir: Some("elsewhere".into()),
            extension: Some("xml".to_string()),
            skip_malformed: true,
        });
        assert_eq!(from_cli.scan_root, Utf8PathBuf::from("other"));
        assert_eq!(from_cli.out_dir, Utf8PathBuf::from("elsewhere"));
        assert_eq!(from_cli.extension, "xml");
        assert!(from_cli.skip_malformed);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());
        assert!(load_or_default(&root).unwrap().scan.root.is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "[scan]\nextension = \"rec\"\n")
            .expect("write config");
        assert!(discover_config(&root).is_some());
        assert_eq!(
            load_or_default(&root).unwrap().scan.extension.as_deref(),
            Some("rec")
        );
    }
}
