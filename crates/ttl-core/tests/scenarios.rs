//! End-to-end parse scenarios

use ttl_core::types::{BaseType, ScalarType, TypeDescriptor};
use ttl_core::{parse, serialize, Error, Value};

// ── Documented scenarios ───────────────────────────────

#[test]
fn user_table() {
    let doc = parse("#! User\n#@ id:uint, name:str\n1, Alice\n").unwrap();

    assert_eq!(doc.tables.len(), 1);
    let table = &doc.tables[0];
    assert_eq!(table.name, "User");
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].name, "id");
    assert_eq!(table.columns[0].ty, TypeDescriptor::scalar(ScalarType::Uint));
    assert_eq!(table.columns[1].name, "name");
    assert_eq!(table.columns[1].ty, TypeDescriptor::scalar(ScalarType::Str));
    assert_eq!(table.rows, vec![vec![Value::Integer(1), Value::from("Alice")]]);
}

#[test]
fn decimal_price() {
    let doc = parse("#! Product\n#@ sku:str, price:decimal(10,2)\nA-1, 19.99\n").unwrap();
    let table = &doc.tables[0];

    assert_eq!(table.columns[1].ty.to_string(), "decimal(10,2)");
    assert_eq!(
        table.columns[1].ty.base,
        BaseType::Decimal {
            precision: 10,
            scale: 2
        }
    );
    assert_eq!(table.rows[0][1], Value::Float(19.99));
}

#[test]
fn enum_status() {
    let doc = parse("#! Order\n#@ id:uint, status:enum(pending|shipped)\n7, pending\n").unwrap();
    let table = &doc.tables[0];

    assert_eq!(table.columns[1].ty.to_string(), "enum(pending | shipped)");
    assert_eq!(table.rows[0][1], Value::from("pending"));
}

#[test]
fn consecutive_headers() {
    let doc = parse("#! Empty\n#! Full\n#@ a:int\n1\n").unwrap();

    assert_eq!(doc.tables.len(), 2);
    assert_eq!(doc.tables[0].name, "Empty");
    assert!(doc.tables[0].rows.is_empty());
    assert_eq!(doc.tables[1].rows.len(), 1);
}

// ── Ordering and transparency ──────────────────────────

#[test]
fn tables_keep_header_order() {
    let names = ["Zeta", "Alpha", "Mid", "Beta"];
    let input: String = names.iter().map(|n| format!("#! {}\n#@ x:int\n1\n", n)).collect();
    let doc = parse(&input).unwrap();

    let parsed: Vec<&str> = doc.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(parsed, names);
}

#[test]
fn comments_between_schema_and_data() {
    let bare = parse("#! T\n#@ a:int, b:str\n1, x\n2, y\n").unwrap();
    let noisy = parse(
        "# top\n#! T\n# before schema\n#@ a:int, b:str\n#after schema\n1, x\n   # indented\n2, y\n# tail\n",
    )
    .unwrap();

    assert_eq!(bare.tables[0].columns.len(), noisy.tables[0].columns.len());
    assert_eq!(bare.tables[0].rows.len(), noisy.tables[0].rows.len());
    assert_eq!(bare, noisy);
}

// ── Unicode ────────────────────────────────────────────

#[test]
fn unicode_names_preserved_keywords_folded() {
    let doc = parse(
        "#! Café\n#@ Ünïcode:STR, имя:Text?, 名前:ENUM(赤|青), Σ_1:Ref(Café.Ünïcode)\nx, y, 赤, z\n",
    )
    .unwrap();
    let table = &doc.tables[0];

    assert_eq!(table.name, "Café");
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ünïcode", "имя", "名前", "Σ_1"]);

    let types: Vec<String> = table.columns.iter().map(|c| c.ty.to_string()).collect();
    assert_eq!(types, vec!["str", "text?", "enum(赤 | 青)", "ref(Café.Ünïcode)"]);
    assert_eq!(table.rows[0][2], Value::from("赤"));
}

// ── Field classification in context ────────────────────

#[test]
fn quoted_and_unquoted_fields() {
    let doc = parse(concat!(
        "#! Messages\n",
        "#@ id:uint, body:text, flag:bool?, score:f64?\n",
        "1, \"Hello, World\", true, 0.5\n",
        "2, \"With \"\"quotes\"\" inside\", FALSE,\n",
        "3, \"42\", null, -3\n",
        "4, \"line one\nline two\", , 007abc\n",
    ))
    .unwrap();
    let rows = &doc.tables[0].rows;

    assert_eq!(
        rows[0],
        vec![
            Value::Integer(1),
            Value::from("Hello, World"),
            Value::Boolean(true),
            Value::Float(0.5)
        ]
    );
    assert_eq!(
        rows[1],
        vec![
            Value::Integer(2),
            Value::from("With \"quotes\" inside"),
            Value::Boolean(false),
            Value::Null
        ]
    );
    assert_eq!(
        rows[2],
        vec![Value::Integer(3), Value::Integer(42), Value::Null, Value::Integer(-3)]
    );
    assert_eq!(
        rows[3],
        vec![
            Value::Integer(4),
            Value::from("line one\nline two"),
            Value::Null,
            Value::from("007abc")
        ]
    );
}

#[test]
fn crlf_and_missing_final_break() {
    let unix = parse("#! T\n#@ a:int\n1\n2\n").unwrap();
    let windows = parse("#! T\r\n#@ a:int\r\n1\r\n2").unwrap();
    assert_eq!(unix, windows);
}

// ── Failures ───────────────────────────────────────────

fn parse_error(input: &str) -> ttl_core::ParseError {
    match parse(input) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn unterminated_quote_points_at_opening_quote() {
    let err = parse_error("#! T\n#@ a:str\n1, \"open\n2, x\n");
    assert_eq!((err.line, err.column), (3, 4));
    assert_eq!(err.found, "unterminated quoted field");
}

#[test]
fn decimal_needs_both_parameters() {
    let err = parse_error("#! T\n#@ p:decimal(10)\n");
    assert_eq!((err.line, err.column), (2, 16));
    assert_eq!(err.to_string(), "line 2, column 16: expected ',', found ')'");
}

#[test]
fn zero_precision_rejected() {
    let err = parse_error("#! T\n#@ p:decimal(0,0)\n");
    assert_eq!((err.line, err.column), (2, 14));
}

#[test]
fn serialized_scenario() {
    let doc = parse("#! User\n#@ id:uint, name:str\n1, Alice\n").unwrap();
    assert_eq!(
        serialize(&doc, false),
        r#"{"tables":[{"name":"User","columns":[{"name":"id","type":"uint"},{"name":"name","type":"str"}],"rows":[[1,"Alice"]]}]}"#
    );
}
