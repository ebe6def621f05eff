use pretty_assertions::assert_eq;
use xmlrec_types::{FileType, SchemaEntry};

#[test]
fn schema_entry_uses_wire_field_names() {
    let mut entry = SchemaEntry::new(FileType::new("Item"));
    entry.absorb("id", "1");
    entry.absorb("name", "Sword");

    let value = serde_json::to_value(&entry).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "TableName": "Item",
            "SchemaDictionary": { "id": "1", "name": "Sword" }
        })
    );
}

#[test]
fn absorb_keeps_first_sample() {
    let mut entry = SchemaEntry::new(FileType::new("Item"));
    assert!(entry.absorb("id", "1"));
    assert!(!entry.absorb("id", "2"));
    assert_eq!(entry.attributes["id"], "1");
}

#[test]
fn schema_dictionary_preserves_first_seen_order() {
    let mut entry = SchemaEntry::new(FileType::new("Shop"));
    for key in ["store2", "alias", "job", "id"] {
        entry.absorb(key, "x");
    }

    let json = serde_json::to_string(&entry).expect("serialize");
    let store = json.find("store2").unwrap();
    let alias = json.find("alias").unwrap();
    let job = json.find("job").unwrap();
    let id = json.find("\"id\"").unwrap();
    assert!(store < alias && alias < job && job < id);
}

#[test]
fn schema_entry_deserializes_without_dictionary() {
    let entry: SchemaEntry =
        serde_json::from_str(r#"{ "TableName": "Npc" }"#).expect("deserialize");
    assert_eq!(entry.table_name, FileType::new("Npc"));
    assert!(entry.attributes.is_empty());
}
