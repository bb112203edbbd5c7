//! Token types produced by the [`crate::lexer::Lexer`] (§4.2).

/// The kind of lexical token. Mirrors the `CIFToken` enum inside
/// `SacParser` in `original_source/include/cif++/CifParser.hpp`, minus the
/// whitespace/comment tokens which the lexer swallows internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    DataBlockName,
    Loop,
    Global,
    SaveFrameName,
    SaveFrameEnd,
    Stop,
    Tag,
    Value,
}

/// The lexical sub-kind of a `Value` token, carried alongside so the parser
/// and data model don't have to re-inspect the raw text to tell an explicit
/// `?`/`.` apart from a quoted string that merely contains one of those
/// characters. `Int`/`Float`/`Numeric` mirror the `CIFValueType` enum's
/// `eCIFValueInt`/`eCIFValueFloat`/`eCIFValueNumeric` in
/// `original_source/include/cif++/CifParser.hpp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Bare, unquoted text.
    UnquotedString,
    /// Single- or double-quoted string.
    QuotedString,
    /// `;`-delimited multi-line text field.
    TextField,
    /// An unquoted value with no fractional part, exponent, or
    /// standard-uncertainty suffix: `[+-]?\d+`.
    Int,
    /// An unquoted value with a fractional part and/or exponent:
    /// `[+-]?\d*\.\d+([eE][+-]?\d+)?` or `[+-]?\d+[eE][+-]?\d+`.
    Float,
    /// An `Int` or `Float` shape followed by a parenthesised
    /// standard-uncertainty suffix, e.g. `12.345(6)`.
    Numeric,
    /// The unknown-value marker `?`.
    Unknown,
    /// The inapplicable-value marker `.`.
    Inapplicable,
}

/// A single lexical token together with its source position and, for
/// `Value` tokens, the decoded text and sub-kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub text: String,
    pub value_kind: Option<ValueKind>,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, text: impl Into<String>) -> Self {
        Token {
            kind,
            line,
            text: text.into(),
            value_kind: None,
        }
    }

    pub fn value(line: u32, text: impl Into<String>, value_kind: ValueKind) -> Self {
        Token {
            kind: TokenKind::Value,
            line,
            text: text.into(),
            value_kind: Some(value_kind),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self.value_kind,
            Some(ValueKind::Unknown) | Some(ValueKind::Inapplicable)
        )
    }
}
