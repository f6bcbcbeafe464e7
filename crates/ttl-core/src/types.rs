//! Type-expression resolver - structured column types and their canonical form
//!
//! A column's type clause (`decimal(10,2)[]?`, `ref(User.id)`, `STR?`) is
//! resolved into a [`TypeDescriptor`]. Rendering a descriptor with `Display`
//! gives the canonical type string:
//!
//! - base keyword lowercased
//! - `decimal(p,s)`, `ref(table.column)`, `enum(a | b | c)`
//! - `[]` before `?`, whatever order the source used
//!
//! Parameters live inside [`BaseType`], so a descriptor carries them exactly
//! when its base type requires them.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::parser::ast::{Modifier, SpannedValue, TypeExprNode, TypeParamsNode};
use crate::parser::parse_type_expr;
use crate::parser::tokenizer::{TokenKind, TypeKeyword};

/// Base types that take no parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
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
}

impl ScalarType {
    pub const ALL: [ScalarType; 20] = [
        ScalarType::I8,
        ScalarType::I16,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::Int,
        ScalarType::U8,
        ScalarType::U16,
        ScalarType::U32,
        ScalarType::U64,
        ScalarType::Uint,
        ScalarType::F32,
        ScalarType::F64,
        ScalarType::Float,
        ScalarType::Bool,
        ScalarType::Str,
        ScalarType::Text,
        ScalarType::Date,
        ScalarType::Time,
        ScalarType::Datetime,
        ScalarType::Timestamp,
    ];

    /// `None` for the parameterized keywords (`decimal`, `ref`, `enum`)
    pub fn from_keyword(keyword: TypeKeyword) -> Option<ScalarType> {
        let scalar = match keyword {
            TypeKeyword::I8 => ScalarType::I8,
            TypeKeyword::I16 => ScalarType::I16,
            TypeKeyword::I32 => ScalarType::I32,
            TypeKeyword::I64 => ScalarType::I64,
            TypeKeyword::Int => ScalarType::Int,
            TypeKeyword::U8 => ScalarType::U8,
            TypeKeyword::U16 => ScalarType::U16,
            TypeKeyword::U32 => ScalarType::U32,
            TypeKeyword::U64 => ScalarType::U64,
            TypeKeyword::Uint => ScalarType::Uint,
            TypeKeyword::F32 => ScalarType::F32,
            TypeKeyword::F64 => ScalarType::F64,
            TypeKeyword::Float => ScalarType::Float,
            TypeKeyword::Bool => ScalarType::Bool,
            TypeKeyword::Str => ScalarType::Str,
            TypeKeyword::Text => ScalarType::Text,
            TypeKeyword::Date => ScalarType::Date,
            TypeKeyword::Time => ScalarType::Time,
            TypeKeyword::Datetime => ScalarType::Datetime,
            TypeKeyword::Timestamp => ScalarType::Timestamp,
            TypeKeyword::Decimal | TypeKeyword::Ref | TypeKeyword::Enum => return None,
        };
        Some(scalar)
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::Int => "int",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::Uint => "uint",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::Str => "str",
            ScalarType::Text => "text",
            ScalarType::Date => "date",
            ScalarType::Time => "time",
            ScalarType::Datetime => "datetime",
            ScalarType::Timestamp => "timestamp",
        }
    }

    pub fn family(self) -> TypeFamily {
        match self {
            ScalarType::I8 | ScalarType::I16 | ScalarType::I32 | ScalarType::I64 | ScalarType::Int => {
                TypeFamily::SignedInt
            }
            ScalarType::U8
            | ScalarType::U16
            | ScalarType::U32
            | ScalarType::U64
            | ScalarType::Uint => TypeFamily::UnsignedInt,
            ScalarType::F32 | ScalarType::F64 | ScalarType::Float => TypeFamily::Float,
            ScalarType::Bool => TypeFamily::Bool,
            ScalarType::Str | ScalarType::Text => TypeFamily::Text,
            ScalarType::Date | ScalarType::Time | ScalarType::Datetime | ScalarType::Timestamp => {
                TypeFamily::Temporal
            }
        }
    }
}

/// Type category, independent of width or spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    SignedInt,
    UnsignedInt,
    Float,
    Decimal,
    Bool,
    Text,
    Temporal,
    Enum,
    Ref,
}

/// Base type with its parameters, if it takes any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Scalar(ScalarType),
    Decimal { precision: u32, scale: u32 },
    Ref { table: String, column: String },
    /// Never empty
    Enum(Vec<String>),
}

impl BaseType {
    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Scalar(scalar) => scalar.name(),
            BaseType::Decimal { .. } => "decimal",
            BaseType::Ref { .. } => "ref",
            BaseType::Enum(_) => "enum",
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self {
            BaseType::Scalar(scalar) => scalar.family(),
            BaseType::Decimal { .. } => TypeFamily::Decimal,
            BaseType::Ref { .. } => TypeFamily::Ref,
            BaseType::Enum(_) => TypeFamily::Enum,
        }
    }
}

/// Structured representation of a column's declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub base: BaseType,
    pub is_array: bool,
    pub is_nullable: bool,
}

impl TypeDescriptor {
    pub fn new(base: BaseType) -> Self {
        TypeDescriptor {
            base,
            is_array: false,
            is_nullable: false,
        }
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        Self::new(BaseType::Scalar(scalar))
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn family(&self) -> TypeFamily {
        self.base.family()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.base {
            BaseType::Scalar(scalar) => f.write_str(scalar.name())?,
            BaseType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)?
            }
            BaseType::Ref { table, column } => write!(f, "ref({}.{})", table, column)?,
            BaseType::Enum(values) => write!(f, "enum({})", values.join(" | "))?,
        }
        if self.is_array {
            f.write_str("[]")?;
        }
        if self.is_nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = ParseError;

    /// Parse a type expression written on its own (the canonical string or
    /// any equivalent spelling)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(&parse_type_expr(s)?)
    }
}

// ── Resolution ─────────────────────────────────────────────

/// Resolve a type-expression node into a descriptor
///
/// # Errors
/// `ParseError` when decimal parameters are not integers in range
/// (precision ≥ 1, scale ≥ 0), or when the parameter list does not fit
/// the keyword.
pub fn resolve(node: &TypeExprNode) -> Result<TypeDescriptor, ParseError> {
    let keyword = node.keyword.value;

    let base = match (keyword, &node.params) {
        (TypeKeyword::Decimal, Some(TypeParamsNode::Decimal { precision, scale })) => {
            BaseType::Decimal {
                precision: integer_param(precision, 1, "precision")?,
                scale: integer_param(scale, 0, "scale")?,
            }
        }
        (TypeKeyword::Ref, Some(TypeParamsNode::Ref { table, column })) => BaseType::Ref {
            table: table.value.clone(),
            column: column.value.clone(),
        },
        (TypeKeyword::Enum, Some(TypeParamsNode::Enum(values))) if !values.is_empty() => {
            BaseType::Enum(values.iter().map(|v| v.value.clone()).collect())
        }
        (_, None) => match ScalarType::from_keyword(keyword) {
            Some(scalar) => BaseType::Scalar(scalar),
            None => {
                return Err(ParseError::new(
                    &node.keyword.span,
                    vec![TokenKind::LParen],
                    format!("`{}` without parameters", keyword),
                ))
            }
        },
        (_, Some(_)) => {
            return Err(ParseError::new(
                &node.keyword.span,
                vec![TokenKind::LBracket, TokenKind::Question],
                format!("parameters that do not fit `{}`", keyword),
            ))
        }
    };

    let mut descriptor = TypeDescriptor::new(base);
    for modifier in &node.modifiers {
        match modifier.value {
            Modifier::Array => descriptor.is_array = true,
            Modifier::Nullable => descriptor.is_nullable = true,
        }
    }

    Ok(descriptor)
}

fn integer_param(
    param: &SpannedValue<String>,
    minimum: u32,
    what: &str,
) -> Result<u32, ParseError> {
    param
        .value
        .parse::<u32>()
        .ok()
        .filter(|n| *n >= minimum)
        .ok_or_else(|| {
            ParseError::new(
                &param.span,
                vec![TokenKind::Number],
                format!(
                    "`{}` (decimal {} must be an integer >= {})",
                    param.value, what, minimum
                ),
            )
        })
}
