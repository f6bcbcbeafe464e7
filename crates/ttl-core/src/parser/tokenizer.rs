//! 3TL Tokenizer - converts 3TL text into token stream
//!
//! The format is line oriented and so is the tokenizer. The first non-blank
//! character of a line selects how the rest of that line is lexed:
//!
//! - `#!` / `#@`: header mode: identifiers, type keywords, numbers, punctuation
//! - `#` followed by anything else: a comment running to the end of the line
//! - anything else: row mode: quoted and unquoted CSV fields
//!
//! Horizontal whitespace is elided between tokens. It is preserved inside
//! quoted fields and inside unquoted runs (the value classifier trims those).
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Characters header mode cannot place become `Token::Invalid`, so the
//!   parser reports them together with the token kinds it expected
//! - line:column (1-based, in characters) for every token

use serde::Serialize;

use crate::error::ParseError;

/// Base-type keywords. Matched case-insensitively, rendered lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    I8,
    I16,
    I32,
    I64,
    Int,
    U8,
    U16,
    U32,
    U64,
    Uint,
    F32,
    F64,
    Float,
    Bool,
    Str,
    Text,
    Date,
    Time,
    Datetime,
    Timestamp,
    Decimal,
    Ref,
    Enum,
}

impl TypeKeyword {
    pub const ALL: [TypeKeyword; 23] = [
        TypeKeyword::I8,
        TypeKeyword::I16,
        TypeKeyword::I32,
        TypeKeyword::I64,
        TypeKeyword::Int,
        TypeKeyword::U8,
        TypeKeyword::U16,
        TypeKeyword::U32,
        TypeKeyword::U64,
        TypeKeyword::Uint,
        TypeKeyword::F32,
        TypeKeyword::F64,
        TypeKeyword::Float,
        TypeKeyword::Bool,
        TypeKeyword::Str,
        TypeKeyword::Text,
        TypeKeyword::Date,
        TypeKeyword::Time,
        TypeKeyword::Datetime,
        TypeKeyword::Timestamp,
        TypeKeyword::Decimal,
        TypeKeyword::Ref,
        TypeKeyword::Enum,
    ];

    /// Look up a keyword ignoring case (`UINT`, `Uint` and `uint` all match)
    pub fn lookup(text: &str) -> Option<TypeKeyword> {
        let lowered = text.to_lowercase();
        Self::ALL.iter().copied().find(|kw| kw.as_str() == lowered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKeyword::I8 => "i8",
            TypeKeyword::I16 => "i16",
            TypeKeyword::I32 => "i32",
            TypeKeyword::I64 => "i64",
            TypeKeyword::Int => "int",
            TypeKeyword::U8 => "u8",
            TypeKeyword::U16 => "u16",
            TypeKeyword::U32 => "u32",
            TypeKeyword::U64 => "u64",
            TypeKeyword::Uint => "uint",
            TypeKeyword::F32 => "f32",
            TypeKeyword::F64 => "f64",
            TypeKeyword::Float => "float",
            TypeKeyword::Bool => "bool",
            TypeKeyword::Str => "str",
            TypeKeyword::Text => "text",
            TypeKeyword::Date => "date",
            TypeKeyword::Time => "time",
            TypeKeyword::Datetime => "datetime",
            TypeKeyword::Timestamp => "timestamp",
            TypeKeyword::Decimal => "decimal",
            TypeKeyword::Ref => "ref",
            TypeKeyword::Enum => "enum",
        }
    }
}

impl std::fmt::Display for TypeKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token types for 3TL syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Line markers
    TableMarker,     // #!
    SchemaMarker,    // #@
    Comment(String), // text after '#', trimmed

    // Header mode
    Identifier(String),
    /// Type keyword with its source spelling
    Keyword {
        keyword: TypeKeyword,
        text: String,
    },
    Number(String),
    Colon,    // :
    Comma,    // , (also separates row fields)
    Dot,      // .
    Pipe,     // |
    Question, // ?
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Invalid(char),

    // Row mode
    /// Raw quoted field, surrounding quotes and doubled-quote escapes included
    QuotedField(String),
    /// Raw unquoted run up to the next comma or line break
    UnquotedField(String),

    // Other
    Break,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::TableMarker => TokenKind::TableMarker,
            Token::SchemaMarker => TokenKind::SchemaMarker,
            Token::Comment(_) => TokenKind::Comment,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Keyword { .. } => TokenKind::Keyword,
            Token::Number(_) => TokenKind::Number,
            Token::Colon => TokenKind::Colon,
            Token::Comma => TokenKind::Comma,
            Token::Dot => TokenKind::Dot,
            Token::Pipe => TokenKind::Pipe,
            Token::Question => TokenKind::Question,
            Token::LParen => TokenKind::LParen,
            Token::RParen => TokenKind::RParen,
            Token::LBracket => TokenKind::LBracket,
            Token::RBracket => TokenKind::RBracket,
            Token::Invalid(_) => TokenKind::Invalid,
            Token::QuotedField(_) => TokenKind::QuotedField,
            Token::UnquotedField(_) => TokenKind::UnquotedField,
            Token::Break => TokenKind::Break,
            Token::Eof => TokenKind::Eof,
        }
    }

    /// Human-readable description used as the `found` part of parse errors
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(text) => format!("identifier `{}`", text),
            Token::Keyword { text, .. } => format!("type keyword `{}`", text),
            Token::Number(text) => format!("number `{}`", text),
            Token::Invalid(ch) => format!("character '{}'", ch),
            Token::QuotedField(raw) => format!("quoted field {}", raw),
            Token::UnquotedField(text) => format!("unquoted field `{}`", text.trim()),
            other => other.kind().to_string(),
        }
    }
}

/// Payload-free token classification, used for expected-token sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    TableMarker,
    SchemaMarker,
    Comment,
    Identifier,
    Keyword,
    Number,
    Colon,
    Comma,
    Dot,
    Pipe,
    Question,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Invalid,
    QuotedField,
    UnquotedField,
    Break,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TokenKind::TableMarker => "'#!'",
            TokenKind::SchemaMarker => "'#@'",
            TokenKind::Comment => "comment",
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "type keyword",
            TokenKind::Number => "number",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Pipe => "'|'",
            TokenKind::Question => "'?'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Invalid => "invalid character",
            TokenKind::QuotedField => "quoted field",
            TokenKind::UnquotedField => "unquoted field",
            TokenKind::Break => "line break",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    fn new(token: Token, span: Span) -> Self {
        SpannedToken { token, span }
    }
}

/// Lexing mode for the remainder of the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    LineStart,
    Header,
    Row,
}

/// Tokenizer for 3TL source text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    mode: Mode,
}

impl Tokenizer {
    /// Create a new tokenizer for a complete 3TL document
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            mode: Mode::LineStart,
        }
    }

    /// Create a tokenizer that lexes everything in header mode.
    ///
    /// Used for standalone type expressions such as `decimal(10,2)[]?`.
    pub fn header(text: &str) -> Self {
        Tokenizer {
            mode: Mode::Header,
            ..Tokenizer::new(text)
        }
    }

    /// Tokenize the entire input into a stream of spanned tokens.
    ///
    /// The stream always ends with a single `Token::Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    // ── Character helpers ──────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Length of the line terminator at the cursor (`\n` or `\r\n`), if any
    fn line_break_len(&self) -> Option<usize> {
        match (self.peek(), self.peek_ahead(1)) {
            (Some('\n'), _) => Some(1),
            (Some('\r'), Some('\n')) => Some(2),
            _ => None,
        }
    }

    fn skip_horizontal_whitespace(&mut self) {
        while let Some(' ' | '\t') = self.peek() {
            self.advance();
        }
    }

    // ── Main dispatch ──────────────────────────────────────

    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        self.skip_horizontal_whitespace();
        let span = self.current_span();

        let Some(ch) = self.peek() else {
            return Ok(SpannedToken::new(Token::Eof, span));
        };

        if let Some(len) = self.line_break_len() {
            for _ in 0..len {
                self.advance();
            }
            self.mode = Mode::LineStart;
            return Ok(SpannedToken::new(Token::Break, span));
        }

        match self.mode {
            Mode::LineStart => self.read_line_start(ch, span),
            Mode::Header => Ok(self.read_header_token(ch, span)),
            Mode::Row => self.read_row_token(ch, span),
        }
    }

    // ── Line markers & comments ────────────────────────────

    fn read_line_start(&mut self, ch: char, span: Span) -> Result<SpannedToken, ParseError> {
        if ch != '#' {
            self.mode = Mode::Row;
            return self.read_row_token(ch, span);
        }

        let token = match self.peek_ahead(1) {
            Some('!') => Token::TableMarker,
            Some('@') => Token::SchemaMarker,
            _ => {
                self.advance(); // consume '#'
                let start = self.position;
                while self.peek().is_some() && self.line_break_len().is_none() {
                    self.advance();
                }
                self.mode = Mode::Header;
                return Ok(SpannedToken::new(
                    Token::Comment(self.text_from(start).trim().to_string()),
                    span,
                ));
            }
        };

        self.advance();
        self.advance();
        self.mode = Mode::Header;
        Ok(SpannedToken::new(token, span))
    }

    // ── Header mode ────────────────────────────────────────

    fn read_header_token(&mut self, ch: char, span: Span) -> SpannedToken {
        let punct = match ch {
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '.' => Some(Token::Dot),
            '|' => Some(Token::Pipe),
            '?' => Some(Token::Question),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            _ => None,
        };
        if let Some(token) = punct {
            self.advance();
            return SpannedToken::new(token, span);
        }

        let starts_number = ch.is_ascii_digit()
            || (ch == '-' && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()));

        if starts_number {
            self.read_number(span)
        } else if is_identifier_start(ch) {
            self.read_identifier_or_keyword(span)
        } else {
            self.advance();
            SpannedToken::new(Token::Invalid(ch), span)
        }
    }

    /// `-?digits(.digits)?`
    fn read_number(&mut self, span: Span) -> SpannedToken {
        let start = self.position;

        if self.peek() == Some('-') {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        // A dot only belongs to the number when digits follow it
        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        SpannedToken::new(Token::Number(self.text_from(start)), span)
    }

    fn read_identifier_or_keyword(&mut self, span: Span) -> SpannedToken {
        let start = self.position;

        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }

        let text = self.text_from(start);
        let token = match TypeKeyword::lookup(&text) {
            Some(keyword) => Token::Keyword { keyword, text },
            None => Token::Identifier(text),
        };

        SpannedToken::new(token, span)
    }

    // ── Row mode ───────────────────────────────────────────

    fn read_row_token(&mut self, ch: char, span: Span) -> Result<SpannedToken, ParseError> {
        match ch {
            ',' => {
                self.advance();
                Ok(SpannedToken::new(Token::Comma, span))
            }
            '"' => self.read_quoted_field(span),
            _ => Ok(self.read_unquoted_field(span)),
        }
    }

    /// Quoted field; `""` inside is an escaped quote. May span lines.
    fn read_quoted_field(&mut self, span: Span) -> Result<SpannedToken, ParseError> {
        let start = self.position;
        self.advance(); // consume opening "

        loop {
            match self.advance() {
                None => {
                    return Err(ParseError::new(
                        &span,
                        vec![TokenKind::QuotedField],
                        "unterminated quoted field",
                    ));
                }
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                }
                Some('"') => break,
                Some(_) => {}
            }
        }

        Ok(SpannedToken::new(
            Token::QuotedField(self.text_from(start)),
            span,
        ))
    }

    fn read_unquoted_field(&mut self, span: Span) -> SpannedToken {
        let start = self.position;

        while let Some(c) = self.peek() {
            if c == ',' || self.line_break_len().is_some() {
                break;
            }
            self.advance();
        }

        SpannedToken::new(Token::UnquotedField(self.text_from(start)), span)
    }
}

/// First character of an identifier: any Unicode letter or `_`
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// Identifier continuation: any Unicode letter, digit, or `_`
pub fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Convenience wrapper: tokenize a whole document
pub fn tokenize(text: &str) -> Result<Vec<SpannedToken>, ParseError> {
    Tokenizer::new(text).tokenize()
}
