//! 3TL Core - parser for Typed Talking To LLMs tables
//!
//! 3TL is a typed, comma-separated text format: table headers, typed column
//! declarations and CSV-style data rows, several tables per file.
//! All front ends (CLI, Go bindings) call this same core.
//!
//! # Architecture
//!
//! ```text
//! 3TL Text → Tokenizer → Parser → ParseTree → Builder → Document → Serializer → JSON
//!                                               ↓
//!                                  type resolution + value classification
//! ```
//!
//! # Example
//!
//! ```
//! let doc = ttl_core::parse("#! User\n#@ id:uint, name:str\n1, Alice\n").unwrap();
//! assert_eq!(doc.tables[0].columns[0].ty.to_string(), "uint");
//! assert_eq!(
//!     ttl_core::serialize(&doc, false),
//!     r#"{"tables":[{"name":"User","columns":[{"name":"id","type":"uint"},{"name":"name","type":"str"}],"rows":[[1,"Alice"]]}]}"#
//! );
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Atomic**: A parse either succeeds completely or returns a `ParseError`
//! - **Ordered**: Tables, columns and rows keep their source order

pub mod builder;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod types;
pub mod value;

use std::path::Path;

pub use error::{Error, ParseError, Result};
pub use serializer::{document_hash, serialize, to_json_value};
pub use types::{BaseType, ScalarType, TypeDescriptor, TypeFamily};
pub use value::Value;

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed 3TL file: its tables in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub tables: Vec<Table>,
}

impl Document {
    /// First table with the given name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// One value per field of the source line; the count may differ from the
/// table's column count
pub type Row = Vec<Value>;

/// Parse 3TL text into a document
///
/// # Errors
/// `Error::Parse` on any grammar violation; no partial document is returned.
pub fn parse(text: &str) -> Result<Document> {
    let tree = parser::parse_tree(text)?;
    let doc = builder::build_document(&tree)?;

    tracing::debug!(
        lines = tree.lines.len(),
        tables = doc.tables.len(),
        rows = doc.tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "parsed 3TL document"
    );

    Ok(doc)
}

/// Read a UTF-8 file and parse it
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = "\
# Orders example
#! User
#@ id:uint, name:str, email:str?
1, Alice, alice@example.com
2, Bob,

#! Order
#@ id:uint, user:ref(User.id), total:decimal(10,2), status:enum(pending|shipped)
100, 1, 19.99, pending
";

    #[test]
    fn test_parse_document() {
        let doc = parse(ORDERS).unwrap();
        assert_eq!(doc.tables.len(), 2);

        let users = doc.table("User").unwrap();
        assert_eq!(users.rows[1], vec![Value::Integer(2), Value::from("Bob"), Value::Null]);
        assert!(users.column("email").unwrap().ty.is_nullable);

        let orders = doc.table("Order").unwrap();
        assert_eq!(orders.column("total").unwrap().ty.to_string(), "decimal(10,2)");
        assert_eq!(
            orders.column("status").unwrap().ty.to_string(),
            "enum(pending | shipped)"
        );
        assert_eq!(orders.rows[0][2], Value::Float(19.99));
        assert_eq!(orders.rows[0][3], Value::from("pending"));
    }

    #[test]
    fn test_parse_error_is_atomic() {
        let err = parse("#! T\n#@ a:int\n1\n#@ b int\n").unwrap_err();
        match err {
            Error::Parse(e) => assert_eq!((e.line, e.column), (4, 6)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/nonexistent/path/data.3tl").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("cannot read /nonexistent/path/data.3tl"));
    }

    #[test]
    fn test_parse_file_reads_fixture() {
        let path = std::env::temp_dir().join(format!("ttl-core-lib-{}.3tl", std::process::id()));
        std::fs::write(&path, ORDERS).unwrap();
        let from_file = parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(from_file, parse(ORDERS).unwrap());
    }

    #[test]
    fn test_determinism_100_iterations() {
        let first = serialize(&parse(ORDERS).unwrap(), false);
        for i in 0..100 {
            let result = serialize(&parse(ORDERS).unwrap(), false);
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
