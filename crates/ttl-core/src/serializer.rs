//! Serializer - renders a Document as JSON
//!
//! Key order is fixed: `tables` → `name`, `columns` (`name`, `type`), `rows`.
//! Column types are written as canonical type strings and row values keep
//! their classified tag (integer vs. float vs. string vs. boolean vs. null).
//!
//! Compact and indented output encode the same JSON value.

use sha2::{Digest, Sha256};

use crate::{Column, Document, Table};

/// The JSON value a document serializes to
pub fn to_json_value(doc: &Document) -> serde_json::Value {
    let tables: Vec<serde_json::Value> = doc.tables.iter().map(table_json).collect();

    let mut out = serde_json::Map::new();
    out.insert("tables".to_string(), serde_json::Value::Array(tables));
    serde_json::Value::Object(out)
}

fn table_json(table: &Table) -> serde_json::Value {
    let columns: Vec<serde_json::Value> = table.columns.iter().map(column_json).collect();
    let rows: Vec<serde_json::Value> = table
        .rows
        .iter()
        .map(|row| serde_json::Value::Array(row.iter().map(|v| v.to_json()).collect()))
        .collect();

    let mut out = serde_json::Map::new();
    out.insert("name".to_string(), serde_json::Value::String(table.name.clone()));
    out.insert("columns".to_string(), serde_json::Value::Array(columns));
    out.insert("rows".to_string(), serde_json::Value::Array(rows));
    serde_json::Value::Object(out)
}

fn column_json(column: &Column) -> serde_json::Value {
    let mut out = serde_json::Map::new();
    out.insert("name".to_string(), serde_json::Value::String(column.name.clone()));
    out.insert("type".to_string(), serde_json::Value::String(column.ty.to_string()));
    serde_json::Value::Object(out)
}

/// Render a document as JSON, indented with two spaces when `pretty`
pub fn serialize(doc: &Document, pretty: bool) -> String {
    let value = to_json_value(doc);
    if pretty {
        format!("{:#}", value)
    } else {
        value.to_string()
    }
}

/// SHA-256 of the compact serialization, lowercase hex
///
/// Comments, blank lines and whitespace outside quoted fields do not
/// affect the hash; any change to names, types or values does.
pub fn document_hash(doc: &Document) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialize(doc, false).as_bytes());
    format!("{:x}", hasher.finalize())
}
