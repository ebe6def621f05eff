use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use xmlrec_core::adapters::{FsCatalogSource, InMemoryCatalogSource};
use xmlrec_core::session::EditSession;
use xmlrec_core::settings::EditSettings;
use xmlrec_core::{Edit, EditError};
use xmlrec_descriptor::{AttributeDescriptor, DescriptorCatalog, DescriptorTable, ResolveStatus};
use xmlrec_types::FileType;

const ITEMS: &str = r#"<?xml version="1.0"?>
<data type="Item">
  <!-- weapons -->
  <item id="1" name="Sword" />
  <item id="2" alias="Shield" />
</data>
"#;

fn catalog() -> InMemoryCatalogSource {
    let mut catalog = DescriptorCatalog::new();
    catalog.insert(
        FileType::new("Item"),
        DescriptorTable::default().with_title_attr("name").with_attribute(
            "name",
            AttributeDescriptor::described("Display name")
                .with_value("Sword", "A basic blade")
                .with_value("Axe", "A heavy blade"),
        ),
    );
    InMemoryCatalogSource::new(catalog)
}

fn fixture(temp: &TempDir) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(temp.path().join("items.xml")).unwrap();
    fs::write(&path, ITEMS).unwrap();
    path
}

#[test]
fn open_edit_save_in_place() {
    let temp = TempDir::new().unwrap();
    let path = fixture(&temp);

    let mut session = EditSession::open(&path, &EditSettings::default(), &catalog()).unwrap();
    assert_eq!(session.file_type(), &FileType::new("Item"));
    assert!(session.set(1, 1, Edit::Value("Axe")).unwrap());
    let record = session.document().slot(1).unwrap().as_record().unwrap();
    assert_eq!(record.title(), Some("Axe"));
    assert_eq!(record.description(), Some("A heavy blade"));

    let saved = session.save(None).unwrap();
    assert_eq!(saved, path);
    assert!(!session.document().is_dirty());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"<record id="1" name="Axe" />"#));
    assert!(text.contains("<!-- weapons -->"));
}

#[test]
fn preview_leaves_document_untouched() {
    let temp = TempDir::new().unwrap();
    let path = fixture(&temp);
    let session = EditSession::open(&path, &EditSettings::default(), &catalog()).unwrap();

    let diff = session.preview(1, 1, Edit::Value("Axe")).unwrap();
    assert!(diff.starts_with("diff --git a/"));
    assert!(diff.contains("-  <record id=\"1\" name=\"Sword\" />\n"));
    assert!(diff.contains("+  <record id=\"1\" name=\"Axe\" />\n"));
    assert!(!session.document().is_dirty());
    assert_eq!(fs::read_to_string(&path).unwrap(), ITEMS);

    assert_eq!(session.preview(1, 1, Edit::Value("Sword")).unwrap(), "");
}

#[test]
fn preview_reports_addressing_errors() {
    let temp = TempDir::new().unwrap();
    let path = fixture(&temp);
    let session = EditSession::open(&path, &EditSettings::default(), &catalog()).unwrap();

    let err = session.preview(0, 0, Edit::Value("x")).unwrap_err();
    assert!(matches!(err, EditError::NotARecord { index: 0 }));
}

#[test]
fn custom_record_element_and_fallback() {
    let temp = TempDir::new().unwrap();
    let path = fixture(&temp);
    let settings = EditSettings {
        title_fallback: vec!["id".to_string()],
        record_element: "row".to_string(),
    };

    let mut session = EditSession::open(&path, &settings, &FsCatalogSource::default()).unwrap();
    let titles: Vec<_> = session
        .document()
        .records()
        .map(|(_, r)| r.title().map(str::to_string))
        .collect();
    assert_eq!(titles, vec![Some("1".to_string()), Some("2".to_string())]);

    let out = Utf8PathBuf::from_path_buf(temp.path().join("copy.xml")).unwrap();
    session.save(Some(&out)).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains(r#"<row id="2" alias="Shield" />"#));
}

#[test]
fn resolve_uses_document_type() {
    let temp = TempDir::new().unwrap();
    let path = fixture(&temp);
    let session = EditSession::open(&path, &EditSettings::default(), &catalog()).unwrap();

    let res = session.resolve("name", "Sword");
    assert_eq!(res.status, ResolveStatus::Known);
    assert_eq!(res.entry.value_desc.as_deref(), Some("A basic blade"));
    assert_eq!(session.resolve("weight", "3").status, ResolveStatus::UnknownAttribute);
}

#[test]
fn malformed_document_keeps_typed_error_in_chain() {
    let temp = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("bad.xml")).unwrap();
    fs::write(&path, "<data><r/></data>").unwrap();

    let err = EditSession::open(&path, &EditSettings::default(), &catalog()).unwrap_err();
    let edit = err
        .chain()
        .find_map(|e| e.downcast_ref::<EditError>())
        .unwrap();
    assert!(edit.is_malformed());
    assert_eq!(edit.exit_code(), 2);
    assert!(format!("{err:#}").contains("bad.xml"));
}
