use crate::error::AggregateError;
use xmlrec_types::SchemaEntry;

/// Serialize entries as a JSON array of `{ "TableName", "SchemaDictionary" }`.
pub fn to_json(entries: &[SchemaEntry]) -> Result<String, AggregateError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
