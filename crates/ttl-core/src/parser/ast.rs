//! 3TL parse tree - classified lines and their syntax nodes
//!
//! These types represent the parsed structure of a 3TL document before the
//! document builder resolves types and classifies field values. Every node
//! keeps the source span it was parsed from.

use std::fmt;

use super::tokenizer::{Span, TypeKeyword};

/// A value together with the span it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedValue<T> {
    pub value: T,
    pub span: Span,
}

impl<T> SpannedValue<T> {
    pub fn new(value: T, span: Span) -> Self {
        SpannedValue { value, span }
    }
}

/// Whole-file parse result: one node per source line, in order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseTree {
    pub lines: Vec<LineNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineNode {
    pub line: Line,
    pub span: Span,
}

/// Line classification
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    Comment(String),
    TableHeader(SpannedValue<String>),
    SchemaDef(Vec<ColumnDefNode>),
    DataRow(Vec<FieldNode>),
}

/// `name:type-expr`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefNode {
    pub name: SpannedValue<String>,
    pub type_expr: TypeExprNode,
}

/// `base-type type-params? modifiers?`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExprNode {
    pub keyword: SpannedValue<TypeKeyword>,
    pub params: Option<TypeParamsNode>,
    /// Modifiers in the order they were written
    pub modifiers: Vec<SpannedValue<Modifier>>,
    pub span: Span,
}

impl TypeExprNode {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.iter().any(|m| m.value == modifier)
    }
}

/// Keyword-specific parameter lists. Raw text is kept; the resolver
/// validates and converts.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeParamsNode {
    /// `(precision, scale)`
    Decimal {
        precision: SpannedValue<String>,
        scale: SpannedValue<String>,
    },
    /// `(table.column)`
    Ref {
        table: SpannedValue<String>,
        column: SpannedValue<String>,
    },
    /// `(v1 | v2 | ...)`, never empty
    Enum(Vec<SpannedValue<String>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `[]`
    Array,
    /// `?`
    Nullable,
}

/// One CSV field of a data row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    /// Raw text including the surrounding quotes
    Quoted(SpannedValue<String>),
    Unquoted(SpannedValue<String>),
    /// Nothing between two separators (or a separator and the line end)
    Empty(Span),
}

// ── Source-order rendering ─────────────────────────────────

impl fmt::Display for TypeExprNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.keyword.value)?;
        match &self.params {
            Some(TypeParamsNode::Decimal { precision, scale }) => {
                write!(f, "({},{})", precision.value, scale.value)?
            }
            Some(TypeParamsNode::Ref { table, column }) => {
                write!(f, "({}.{})", table.value, column.value)?
            }
            Some(TypeParamsNode::Enum(values)) => {
                let values: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
                write!(f, "({})", values.join(" | "))?
            }
            None => {}
        }
        for modifier in &self.modifiers {
            match modifier.value {
                Modifier::Array => f.write_str("[]")?,
                Modifier::Nullable => f.write_str("?")?,
            }
        }
        Ok(())
    }
}

impl ParseTree {
    /// Indented dump of the classified lines, one node per line
    pub fn pretty(&self) -> String {
        let mut out = String::from("file\n");

        for node in &self.lines {
            match &node.line {
                Line::Blank => out.push_str("  blank\n"),
                Line::Comment(text) => {
                    out.push_str("  comment ");
                    out.push_str(text);
                    out.push('\n');
                }
                Line::TableHeader(name) => {
                    out.push_str("  table_header ");
                    out.push_str(&name.value);
                    out.push('\n');
                }
                Line::SchemaDef(columns) => {
                    out.push_str("  schema_def\n");
                    for column in columns {
                        out.push_str(&format!(
                            "    column_def {}: {}\n",
                            column.name.value, column.type_expr
                        ));
                    }
                }
                Line::DataRow(fields) => {
                    out.push_str("  data_row\n");
                    for field in fields {
                        match field {
                            FieldNode::Quoted(raw) => {
                                out.push_str(&format!("    quoted {}\n", raw.value))
                            }
                            FieldNode::Unquoted(text) => {
                                out.push_str(&format!("    unquoted {:?}\n", text.value.trim()))
                            }
                            FieldNode::Empty(_) => out.push_str("    empty\n"),
                        }
                    }
                }
            }
        }

        out
    }
}
