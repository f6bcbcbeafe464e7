//! Document builder - folds classified lines into tables
//!
//! A single left-to-right pass over the parse tree with a function-local
//! accumulator. A table header seals the table being built and opens a new
//! one; schema lines append columns and data rows append rows to the open
//! table. Schema and data lines that appear before any table header have
//! nowhere to go and are dropped with a warning.

use crate::error::ParseError;
use crate::parser::ast::{Line, LineNode, ParseTree};
use crate::types::resolve;
use crate::value::field_value;
use crate::{Column, Document, Table};

/// Build a document from a parse tree
///
/// # Errors
/// `ParseError` when a column's type expression does not resolve
/// (for example `decimal(0,2)`).
pub fn build_document(tree: &ParseTree) -> Result<Document, ParseError> {
    tree.lines
        .iter()
        .try_fold(Accumulator::default(), Accumulator::step)
        .map(Accumulator::finish)
}

#[derive(Default)]
struct Accumulator {
    sealed: Vec<Table>,
    current: Option<Table>,
}

impl Accumulator {
    fn step(mut self, node: &LineNode) -> Result<Self, ParseError> {
        match &node.line {
            Line::Blank | Line::Comment(_) => {}
            Line::TableHeader(name) => {
                self.seal();
                self.current = Some(Table::new(name.value.clone()));
            }
            Line::SchemaDef(defs) => {
                // types resolve even when the line is dropped, so bad types still fail
                let columns = defs
                    .iter()
                    .map(|def| {
                        Ok(Column {
                            name: def.name.value.clone(),
                            ty: resolve(&def.type_expr)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ParseError>>()?;

                match self.current.as_mut() {
                    Some(table) => table.columns.extend(columns),
                    None => tracing::warn!(
                        line = node.span.line,
                        "schema line outside any table ignored"
                    ),
                }
            }
            Line::DataRow(fields) => match self.current.as_mut() {
                Some(table) => table.rows.push(fields.iter().map(field_value).collect()),
                None => tracing::warn!(
                    line = node.span.line,
                    "data row outside any table ignored"
                ),
            },
        }
        Ok(self)
    }

    fn seal(&mut self) {
        if let Some(table) = self.current.take() {
            tracing::trace!(
                table = %table.name,
                columns = table.columns.len(),
                rows = table.rows.len(),
                "table sealed"
            );
            self.sealed.push(table);
        }
    }

    fn finish(mut self) -> Document {
        self.seal();
        Document {
            tables: self.sealed,
        }
    }
}
