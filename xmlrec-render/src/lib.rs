//! Rendering helpers (markdown) for human-readable listings.

use xmlrec_descriptor::{Resolution, ResolveStatus};
use xmlrec_edit::{Document, Record, RecordSlot};
use xmlrec_types::{AttributeEntry, SchemaEntry};

/// One row per slot: index, display title, display description.
pub fn render_document_md(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} ({})\n\n", doc.file_type(), doc.root_name()));
    if let Some(path) = doc.source_path() {
        out.push_str(&format!("- Source: `{}`\n", path));
    }
    out.push_str(&format!(
        "- Slots: {} (records {})\n\n",
        doc.slots().len(),
        doc.records().count()
    ));

    if doc.slots().is_empty() {
        out.push_str("_No records._\n");
        return out;
    }

    out.push_str("| # | Title | Description |\n|---|---|---|\n");
    for (i, slot) in doc.slots().iter().enumerate() {
        let title = match slot {
            RecordSlot::Record(_) => slot.title().map(cell).unwrap_or_else(|| "-".to_string()),
            RecordSlot::Passthrough(_) => format!("`{}`", cell(slot.title().unwrap_or(""))),
        };
        let desc = slot.description().map(cell).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("| {} | {} | {} |\n", i, title, desc));
    }
    out
}

/// Attribute table of a single record.
pub fn render_record_md(index: usize, record: &Record) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## {}. {}\n\n",
        index,
        record.title().unwrap_or("(untitled)")
    ));
    if let Some(desc) = record.description() {
        out.push_str(&format!("{}\n\n", desc));
    }
    if record.attributes().is_empty() {
        out.push_str("_No attributes._\n");
        return out;
    }

    out.push_str("| # | Attribute | Meaning | Value | Value meaning |\n|---|---|---|---|---|\n");
    for (i, entry) in record.attributes().iter().enumerate() {
        out.push_str(&format!("| {} | {} |\n", i, entry_cells(entry)));
    }
    out
}

/// One-line summary of a resolver lookup.
pub fn render_resolution(res: &Resolution) -> String {
    let e = &res.entry;
    let mut line = format!("{}={}", e.attr, e.value);
    if let Some(d) = &e.attr_desc {
        line.push_str(&format!("  attr: {}", d));
    }
    if let Some(d) = &e.value_desc {
        line.push_str(&format!("  value: {}", d));
    }
    line.push_str(&format!("  [{}]", status_label(res.status)));
    line
}

pub fn render_schema_md(entries: &[SchemaEntry]) -> String {
    let mut out = String::new();
    out.push_str("# Schema\n\n");
    out.push_str(&format!("- Tables: {}\n\n", entries.len()));
    if entries.is_empty() {
        out.push_str("_No tables._\n");
        return out;
    }

    for entry in entries {
        out.push_str(&format!(
            "## {} ({} attributes)\n\n",
            entry.table_name,
            entry.attributes.len()
        ));
        for (key, sample) in &entry.attributes {
            out.push_str(&format!("- `{}` e.g. `{}`\n", key, sample));
        }
        out.push('\n');
    }
    out
}

fn entry_cells(e: &AttributeEntry) -> String {
    let dash = || "-".to_string();
    format!(
        "`{}` | {} | `{}` | {}",
        cell(&e.attr),
        e.attr_desc.as_deref().map(cell).unwrap_or_else(dash),
        cell(&e.value),
        e.value_desc.as_deref().map(cell).unwrap_or_else(dash),
    )
}

fn status_label(s: ResolveStatus) -> &'static str {
    match s {
        ResolveStatus::Known => "known",
        ResolveStatus::UnknownFileType => "unknown file type",
        ResolveStatus::UnknownAttribute => "unknown attribute",
        ResolveStatus::UnknownValue => "unknown value",
    }
}

// Keep table rows on one line.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
