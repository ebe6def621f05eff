//! End-to-end behavior of the `xmlrec` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ITEMS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<data type="Item">
  <!-- weapons -->
  <item id="1" name="Sword" quality="2" />
  <item id="2" name="Shield" qual="1" />
</data>
"#;

const DESCRIPTORS: &str = r#"
[tables.Item]
title_attr = "name"

[tables.Item.attributes.name]
description = "Display name"
values = { "Sword" = "A basic blade", "Shield" = "Blocks hits" }

[tables.Item.attributes.quality]
description = "Quality tier"
aliases = ["qual"]
values = { "1" = "Common", "2" = "Rare" }
"#;

fn xmlrec() -> Command {
    Command::cargo_bin("xmlrec").expect("xmlrec binary")
}

fn workspace() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data").join("items.xml"), ITEMS).unwrap();
    fs::write(root.join("descriptors.toml"), DESCRIPTORS).unwrap();
    fs::write(
        root.join("xmlrec.toml"),
        "[descriptors]\npath = \"descriptors.toml\"\n\n[scan]\nroot = \"data\"\n",
    )
    .unwrap();
    td
}

fn items(root: &Path) -> String {
    root.join("data").join("items.xml").display().to_string()
}

#[test]
fn list_shows_titles_and_passthrough() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["list", "data/items.xml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 0 | `<!-- weapons -->` | Comment |"))
        .stdout(predicate::str::contains("| 1 | Sword | A basic blade |"))
        .stdout(predicate::str::contains("| 2 | Shield | Blocks hits |"));
}

#[test]
fn show_canonicalizes_aliases() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["show", "data/items.xml", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 2 | `quality` | Quality tier | `1` | Common |"));
}

#[test]
fn show_rejects_passthrough_slot() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["show", "data/items.xml", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a record"));
}

#[test]
fn set_value_saves_in_place() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["set", "data/items.xml", "1", "2", "--value", "1"])
        .assert()
        .success();

    let text = fs::read_to_string(items(temp.path())).unwrap();
    assert!(text.contains(r#"<record id="1" name="Sword" quality="1" />"#));
    assert!(text.contains("<!-- weapons -->"));
}

#[test]
fn set_dry_run_prints_diff_and_keeps_file() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["set", "data/items.xml", "1", "1", "--value", "Axe", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+  <record id=\"1\" name=\"Axe\" quality=\"2\" />"));

    assert_eq!(fs::read_to_string(items(temp.path())).unwrap(), ITEMS);
}

#[test]
fn set_rejects_duplicate_attribute() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["set", "data/items.xml", "1", "0", "--attr", "name"])
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(items(temp.path())).unwrap(), ITEMS);
}

#[test]
fn set_requires_an_edit() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["set", "data/items.xml", "1", "0"])
        .assert()
        .failure();
}

#[test]
fn search_wraps_around() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["search", "data/items.xml", "S", "--from", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1\tSword"));

    xmlrec()
        .current_dir(temp.path())
        .args(["search", "data/items.xml", "Bow"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn resolve_reports_unknown_pairs() {
    let temp = workspace();
    xmlrec()
        .current_dir(temp.path())
        .args(["resolve", "Item", "qual", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quality=2  attr: Quality tier  value: Rare  [known]"));

    xmlrec()
        .current_dir(temp.path())
        .args(["resolve", "Npc", "job", "smith"])
        .assert()
        .success()
        .stdout(predicate::str::contains("job=smith  [unknown file type]"));
}

#[test]
fn malformed_document_exits_2() {
    let temp = workspace();
    fs::write(temp.path().join("bad.xml"), "<data><r/></data>").unwrap();
    xmlrec()
        .current_dir(temp.path())
        .args(["list", "bad.xml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.xml"));
}

#[test]
fn non_utf8_input_exits_2() {
    let temp = workspace();
    fs::write(
        temp.path().join("data").join("bad.xml"),
        b"<data type=\"X\"><r a=\"\xff\"/></data>",
    )
    .unwrap();

    xmlrec()
        .current_dir(temp.path())
        .args(["list", "data/bad.xml"])
        .assert()
        .code(2);

    xmlrec()
        .current_dir(temp.path())
        .args(["schema", "--print"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.xml"));
}

#[test]
fn schema_writes_once_and_refuses_overwrite() {
    let temp = workspace();
    fs::write(
        temp.path().join("data").join("more.xml"),
        r#"<data type="Item"><record id="9" dmg="10"/></data>"#,
    )
    .unwrap();

    xmlrec()
        .current_dir(temp.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 tables from 2 files"));

    let schema = temp.path().join("data").join("Schema.json");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&schema).unwrap()).unwrap();
    assert_eq!(value[0]["TableName"], "Item");
    assert_eq!(value[0]["SchemaDictionary"]["id"], "1");
    assert_eq!(value[0]["SchemaDictionary"]["dmg"], "10");

    xmlrec()
        .current_dir(temp.path())
        .arg("schema")
        .assert()
        .code(1);
}

#[test]
fn schema_print_and_skip_malformed() {
    let temp = workspace();
    fs::write(temp.path().join("data").join("zz.xml"), "<data>").unwrap();

    xmlrec()
        .current_dir(temp.path())
        .args(["schema", "--print"])
        .assert()
        .code(2);

    xmlrec()
        .current_dir(temp.path())
        .args(["schema", "--print", "--skip-malformed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"TableName\": \"Item\""))
        .stderr(predicate::str::contains("skipped"));
}
