//! 3TL Parser - tokenizer, parse tree types, and recursive descent parser
//!
//! Converts 3TL text into a [`ParseTree`] of classified lines.
//!
//! ```text
//! file         := (blank | line)*
//! line         := comment | table-header | schema-def | data-row
//! table-header := '#!' identifier BREAK
//! schema-def   := '#@' column-def (',' column-def)* BREAK
//! column-def   := identifier ':' type-expr
//! type-expr    := base-type type-params? modifiers?
//! modifiers    := ('[' ']' '?'?) | ('?' ('[' ']')?)
//! data-row     := field (',' field)* BREAK
//! field        := quoted | unquoted | /* empty */
//! ```
//!
//! `decimal` takes `(number, number)`, `ref` takes `(identifier '.' identifier)`
//! and `enum` takes `(identifier ('|' identifier)*)`; every other base type
//! takes no parameters. End of input also terminates the final line.

pub mod ast;
pub mod tokenizer;

use crate::error::ParseError;
use ast::*;
use tokenizer::{SpannedToken, Token, TokenKind, Tokenizer, TypeKeyword};

/// Token kinds that may begin a line
const LINE_START: [TokenKind; 7] = [
    TokenKind::Comment,
    TokenKind::TableMarker,
    TokenKind::SchemaMarker,
    TokenKind::QuotedField,
    TokenKind::UnquotedField,
    TokenKind::Comma,
    TokenKind::Break,
];

/// Parse 3TL text into a parse tree
///
/// # Guarantees
/// - Deterministic: same input always produces same tree
/// - Atomic: either the whole input matches the grammar or nothing is returned
///
/// # Errors
/// Returns `ParseError` with line:column and the expected token kinds at
/// the first point where the input leaves the grammar.
pub fn parse_tree(input: &str) -> Result<ParseTree, ParseError> {
    let tokens = Tokenizer::new(input).tokenize()?;
    Parser::new(tokens).parse_file()
}

/// Parse a standalone type expression such as `enum(a | b)[]?`
pub fn parse_type_expr(input: &str) -> Result<TypeExprNode, ParseError> {
    let tokens = Tokenizer::header(input).tokenize()?;
    let mut parser = Parser::new(tokens);
    let node = parser.parse_type_expr()?;

    if !parser.check(TokenKind::Eof) {
        let mut expected = modifier_follow(&node);
        expected.push(TokenKind::Eof);
        return Err(parser.error_here(expected));
    }

    Ok(node)
}

/// Recursive descent parser over a token stream ending in `Token::Eof`
struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    // ── Token helpers ──────────────────────────────────────

    fn peek(&self) -> &SpannedToken {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().token.kind() == kind
    }

    fn advance(&mut self) -> SpannedToken {
        let token = self.peek().clone();
        if token.token != Token::Eof {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<SpannedToken> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<SpannedToken, ParseError> {
        self.eat(kind).ok_or_else(|| self.error_here(vec![kind]))
    }

    fn error_here(&self, expected: Vec<TokenKind>) -> ParseError {
        let current = self.peek();
        ParseError::new(&current.span, expected, current.token.describe())
    }

    /// BREAK, or end of input for the final line
    fn expect_line_end(&mut self, mut follow: Vec<TokenKind>) -> Result<(), ParseError> {
        if self.eat(TokenKind::Break).is_some() || self.check(TokenKind::Eof) {
            return Ok(());
        }
        follow.push(TokenKind::Break);
        Err(self.error_here(follow))
    }

    // ── Lines ──────────────────────────────────────────────

    fn parse_file(&mut self) -> Result<ParseTree, ParseError> {
        let mut lines = Vec::new();

        while !self.check(TokenKind::Eof) {
            lines.push(self.parse_line()?);
        }

        Ok(ParseTree { lines })
    }

    fn parse_line(&mut self) -> Result<LineNode, ParseError> {
        let current = self.peek().clone();
        let span = current.span;

        let (line, follow) = match current.token {
            Token::Break => {
                self.advance();
                return Ok(LineNode {
                    line: Line::Blank,
                    span,
                });
            }
            Token::Comment(text) => {
                self.advance();
                (Line::Comment(text), Vec::new())
            }
            Token::TableMarker => {
                self.advance();
                (Line::TableHeader(self.parse_identifier()?), Vec::new())
            }
            Token::SchemaMarker => {
                self.advance();
                let columns = self.parse_column_defs()?;
                let mut follow = columns
                    .last()
                    .map(|c| modifier_follow(&c.type_expr))
                    .unwrap_or_default();
                follow.push(TokenKind::Comma);
                (Line::SchemaDef(columns), follow)
            }
            Token::QuotedField(_) | Token::UnquotedField(_) | Token::Comma => {
                (Line::DataRow(self.parse_fields()), vec![TokenKind::Comma])
            }
            _ => return Err(self.error_here(LINE_START.to_vec())),
        };

        self.expect_line_end(follow)?;
        Ok(LineNode { line, span })
    }

    /// Identifier position; a type keyword is accepted with its source spelling
    fn parse_identifier(&mut self) -> Result<SpannedValue<String>, ParseError> {
        let current = self.peek().clone();
        match current.token {
            Token::Identifier(text) | Token::Keyword { text, .. } => {
                self.advance();
                Ok(SpannedValue::new(text, current.span))
            }
            _ => Err(self.error_here(vec![TokenKind::Identifier])),
        }
    }

    // ── Schema definitions ─────────────────────────────────

    fn parse_column_defs(&mut self) -> Result<Vec<ColumnDefNode>, ParseError> {
        let mut columns = vec![self.parse_column_def()?];

        while self.eat(TokenKind::Comma).is_some() {
            columns.push(self.parse_column_def()?);
        }

        Ok(columns)
    }

    fn parse_column_def(&mut self) -> Result<ColumnDefNode, ParseError> {
        let name = self.parse_identifier()?;
        self.expect(TokenKind::Colon)?;
        let type_expr = self.parse_type_expr()?;
        Ok(ColumnDefNode { name, type_expr })
    }

    fn parse_type_expr(&mut self) -> Result<TypeExprNode, ParseError> {
        let current = self.peek().clone();
        let keyword = match current.token {
            Token::Keyword { keyword, .. } => {
                self.advance();
                SpannedValue::new(keyword, current.span.clone())
            }
            _ => return Err(self.error_here(vec![TokenKind::Keyword])),
        };

        let params = match keyword.value {
            TypeKeyword::Decimal => Some(self.parse_decimal_params()?),
            TypeKeyword::Ref => Some(self.parse_ref_params()?),
            TypeKeyword::Enum => Some(self.parse_enum_params()?),
            _ => None,
        };

        let modifiers = self.parse_modifiers()?;

        Ok(TypeExprNode {
            keyword,
            params,
            modifiers,
            span: current.span,
        })
    }

    fn parse_decimal_params(&mut self) -> Result<TypeParamsNode, ParseError> {
        self.expect(TokenKind::LParen)?;
        let precision = self.parse_number()?;
        self.expect(TokenKind::Comma)?;
        let scale = self.parse_number()?;
        self.expect(TokenKind::RParen)?;
        Ok(TypeParamsNode::Decimal { precision, scale })
    }

    fn parse_ref_params(&mut self) -> Result<TypeParamsNode, ParseError> {
        self.expect(TokenKind::LParen)?;
        let table = self.parse_identifier()?;
        self.expect(TokenKind::Dot)?;
        let column = self.parse_identifier()?;
        self.expect(TokenKind::RParen)?;
        Ok(TypeParamsNode::Ref { table, column })
    }

    fn parse_enum_params(&mut self) -> Result<TypeParamsNode, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut values = vec![self.parse_identifier()?];

        loop {
            if self.eat(TokenKind::Pipe).is_some() {
                values.push(self.parse_identifier()?);
            } else if self.eat(TokenKind::RParen).is_some() {
                break;
            } else {
                return Err(self.error_here(vec![TokenKind::Pipe, TokenKind::RParen]));
            }
        }

        Ok(TypeParamsNode::Enum(values))
    }

    fn parse_number(&mut self) -> Result<SpannedValue<String>, ParseError> {
        let current = self.peek().clone();
        match current.token {
            Token::Number(text) => {
                self.advance();
                Ok(SpannedValue::new(text, current.span))
            }
            _ => Err(self.error_here(vec![TokenKind::Number])),
        }
    }

    /// Each of `[]` and `?` at most once, in either order
    fn parse_modifiers(&mut self) -> Result<Vec<SpannedValue<Modifier>>, ParseError> {
        let mut modifiers: Vec<SpannedValue<Modifier>> = Vec::new();

        loop {
            let span = self.peek().span.clone();

            if !contains(&modifiers, Modifier::Array) && self.eat(TokenKind::LBracket).is_some() {
                self.expect(TokenKind::RBracket)?;
                modifiers.push(SpannedValue::new(Modifier::Array, span));
            } else if !contains(&modifiers, Modifier::Nullable)
                && self.eat(TokenKind::Question).is_some()
            {
                modifiers.push(SpannedValue::new(Modifier::Nullable, span));
            } else {
                break;
            }
        }

        Ok(modifiers)
    }

    // ── Data rows ──────────────────────────────────────────

    fn parse_fields(&mut self) -> Vec<FieldNode> {
        let mut fields = Vec::new();

        loop {
            let current = self.peek().clone();
            let field = match current.token {
                Token::QuotedField(raw) => {
                    self.advance();
                    FieldNode::Quoted(SpannedValue::new(raw, current.span))
                }
                Token::UnquotedField(text) => {
                    self.advance();
                    FieldNode::Unquoted(SpannedValue::new(text, current.span))
                }
                _ => FieldNode::Empty(current.span),
            };
            fields.push(field);

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        fields
    }
}

fn contains(modifiers: &[SpannedValue<Modifier>], modifier: Modifier) -> bool {
    modifiers.iter().any(|m| m.value == modifier)
}

/// Modifier tokens still acceptable after a type expression
fn modifier_follow(node: &TypeExprNode) -> Vec<TokenKind> {
    let mut follow = Vec::new();
    if !node.has_modifier(Modifier::Array) {
        follow.push(TokenKind::LBracket);
    }
    if !node.has_modifier(Modifier::Nullable) {
        follow.push(TokenKind::Question);
    }
    follow
}
