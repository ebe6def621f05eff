use crate::document::{Document, NodeKind, Passthrough, Record, RecordSlot};
use crate::error::MalformedDocumentError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;
use tracing::{debug, warn};
use xmlrec_descriptor::Resolver;
use xmlrec_types::{AttributeEntry, FileType};
use xmlrec_types::names::TYPE_ATTR;

/// Decode raw file bytes as UTF-8 and [`load`] them. Undecodable input is malformed.
pub fn load_bytes(bytes: &[u8], resolver: &Resolver) -> Result<Document, MalformedDocumentError> {
    let text = std::str::from_utf8(bytes).map_err(|err| MalformedDocumentError::Xml {
        message: format!("document is not valid utf-8: {err}"),
        position: err.valid_up_to(),
    })?;
    load(text, resolver)
}

/// Parse document text into a [`Document`], resolving every record attribute.
pub fn load(text: &str, resolver: &Resolver) -> Result<Document, MalformedDocumentError> {
    let mut reader = Reader::from_str(text);

    let mut doc: Option<Document> = None;
    let mut root_closed = false;
    let mut depth = 0usize;
    let mut open_record: Option<Record> = None;
    let mut nested_content = 0usize;
    let mut epilog_start = text.len();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| MalformedDocumentError::Xml {
            message: e.to_string(),
            position: reader.buffer_position() as usize,
        })?;
        let end = reader.buffer_position() as usize;

        if let Some(node) = passthrough(&event) {
            match depth {
                0 => {}
                1 => {
                    if let Some(d) = doc.as_mut() {
                        if !node.raw.is_empty() {
                            d.slots.push(RecordSlot::Passthrough(node));
                        }
                    }
                }
                _ => {
                    if !node.raw.is_empty() {
                        nested_content += 1;
                    }
                }
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                match depth {
                    0 => {
                        if root_closed {
                            return Err(MalformedDocumentError::MultipleRoots);
                        }
                        let mut root = open_root(&e, start)?;
                        root.prolog = text[..tag_start(text, end)].to_string();
                        doc = Some(root);
                    }
                    1 => {
                        let Some(d) = doc.as_ref() else {
                            return Err(MalformedDocumentError::MissingRoot);
                        };
                        open_record = Some(read_record(&e, start, &d.file_type, resolver)?);
                    }
                    _ => nested_content += 1,
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 => {
                    if root_closed {
                        return Err(MalformedDocumentError::MultipleRoots);
                    }
                    let mut root = open_root(&e, start)?;
                    root.prolog = text[..tag_start(text, end)].to_string();
                    doc = Some(root);
                    root_closed = true;
                    epilog_start = end;
                }
                1 => {
                    if let Some(d) = doc.as_mut() {
                        let record = read_record(&e, start, &d.file_type, resolver)?;
                        d.slots.push(RecordSlot::Record(record));
                    }
                }
                _ => nested_content += 1,
            },
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(MalformedDocumentError::Xml {
                    message: "unmatched end tag".to_string(),
                    position: start,
                })?;
                match depth {
                    0 => {
                        root_closed = true;
                        epilog_start = end;
                    }
                    1 => {
                        if let (Some(d), Some(record)) = (doc.as_mut(), open_record.take()) {
                            d.slots.push(RecordSlot::Record(record));
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let Some(mut doc) = doc else {
        return Err(MalformedDocumentError::MissingRoot);
    };
    if depth > 0 {
        return Err(MalformedDocumentError::UnclosedRoot {
            root: doc.root_name.clone(),
        });
    }

    doc.epilog = text[epilog_start..].to_string();
    if nested_content > 0 {
        warn!(
            nodes = nested_content,
            "nested record content is not part of the record model and will not be saved"
        );
    }
    debug!(
        root = %doc.root_name,
        file_type = %doc.file_type,
        slots = doc.slots.len(),
        records = doc.records().count(),
        "loaded document"
    );
    Ok(doc)
}

/// Rebuild a non-element node's markup from its content. Text is trimmed of
/// formatting whitespace; everything else is kept byte-for-byte.
fn passthrough(event: &Event<'_>) -> Option<Passthrough> {
    let (kind, raw) = match event {
        Event::Text(t) => (
            NodeKind::Text,
            String::from_utf8_lossy(&t[..]).trim().to_string(),
        ),
        Event::CData(c) => (
            NodeKind::CData,
            format!("<![CDATA[{}]]>", String::from_utf8_lossy(&c[..])),
        ),
        Event::Comment(c) => (
            NodeKind::Comment,
            format!("<!--{}-->", String::from_utf8_lossy(&c[..])),
        ),
        Event::PI(p) => (
            NodeKind::ProcessingInstruction,
            format!("<?{}?>", String::from_utf8_lossy(&p[..])),
        ),
        _ => return None,
    };
    Some(Passthrough { kind, raw })
}

/// Byte offset of the `<` opening the tag that ends at `end`.
///
/// Attribute values cannot contain a literal `<`, so the last one wins.
fn tag_start(text: &str, end: usize) -> usize {
    text[..end].rfind('<').unwrap_or(0)
}

fn open_root(e: &BytesStart<'_>, position: usize) -> Result<Document, MalformedDocumentError> {
    let name = element_name(e, position)?;
    let attributes = read_attributes(e, position)?;

    let file_type = match attributes.iter().find(|(k, _)| k == TYPE_ATTR) {
        None => return Err(MalformedDocumentError::MissingType { root: name }),
        Some((_, v)) if v.trim().is_empty() => {
            return Err(MalformedDocumentError::EmptyType { root: name });
        }
        Some((_, v)) => FileType::new(v.clone()),
    };

    Ok(Document::new(name, attributes, file_type))
}

fn read_record(
    e: &BytesStart<'_>,
    position: usize,
    file_type: &FileType,
    resolver: &Resolver,
) -> Result<Record, MalformedDocumentError> {
    let element = element_name(e, position)?;
    let raw = read_attributes(e, position)?;

    let attributes = resolve_attributes(&raw, file_type, resolver);

    // First candidate key present on the element (as written or canonical) supplies the title.
    let title = resolver
        .title_candidates(file_type)
        .into_iter()
        .find_map(|key| (0..raw.len()).find(|&i| raw[i].0 == key || attributes[i].attr == key))
        .map(|i| raw[i].1.clone());
    let description = title.as_deref().and_then(|t| {
        attributes
            .iter()
            .find(|a| a.value == t)
            .and_then(|a| a.value_desc.clone())
    });

    Ok(Record {
        element,
        title,
        description,
        attributes,
    })
}

/// Resolve every raw pair, canonicalizing alias keys unless the canonical key is
/// already used on the element. Keys stay unique so the record saves as valid XML.
fn resolve_attributes(
    raw: &[(String, String)],
    file_type: &FileType,
    resolver: &Resolver,
) -> Vec<AttributeEntry> {
    let mut taken: HashSet<String> = raw.iter().map(|(k, _)| k.clone()).collect();
    let mut out = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let mut entry = resolver.resolve(file_type, key, value).entry;
        if entry.attr != *key {
            if taken.contains(&entry.attr) {
                debug!(attr = %key, canonical = %entry.attr, "canonical key in use; keeping alias");
                entry.attr = key.clone();
            } else {
                taken.remove(key);
                taken.insert(entry.attr.clone());
            }
        }
        out.push(entry);
    }
    out
}

fn element_name(e: &BytesStart<'_>, position: usize) -> Result<String, MalformedDocumentError> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|err| MalformedDocumentError::Xml {
            message: format!("element name is not utf-8: {err}"),
            position,
        })
}

fn read_attributes(
    e: &BytesStart<'_>,
    position: usize,
) -> Result<Vec<(String, String)>, MalformedDocumentError> {
    let xml_err = |message: String| MalformedDocumentError::Xml { message, position };

    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_err(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| xml_err(format!("attribute name is not utf-8: {err}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| xml_err(format!("attribute '{key}': {err}")))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}
