//! The lexeme model: a classified, positioned token.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Position;

/// Classification of a lexeme. Doubles as the transition label fed to the
/// grammar machine, so every kind has a stable textual name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexemeKind {
    Quoted,
    Identifier,
    Whitespace,
    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    SemiColon,
    Comma,
    Number,
    Operator,
    Equals,
    If,
    Else,
    #[serde(rename = "elseif")]
    ElseIf,
    While,
    Let,
    True,
    False,
}

impl LexemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LexemeKind::Quoted => "quoted",
            LexemeKind::Identifier => "identifier",
            LexemeKind::Whitespace => "whitespace",
            LexemeKind::ParenOpen => "paren-open",
            LexemeKind::ParenClose => "paren-close",
            LexemeKind::BraceOpen => "brace-open",
            LexemeKind::BraceClose => "brace-close",
            LexemeKind::SemiColon => "semi-colon",
            LexemeKind::Comma => "comma",
            LexemeKind::Number => "number",
            LexemeKind::Operator => "operator",
            LexemeKind::Equals => "equals",
            LexemeKind::If => "if",
            LexemeKind::Else => "else",
            LexemeKind::ElseIf => "elseif",
            LexemeKind::While => "while",
            LexemeKind::Let => "let",
            LexemeKind::True => "true",
            LexemeKind::False => "false",
        }
    }

    /// The kind of a single-character punctuation symbol.
    pub fn punctuation(symbol: char) -> Option<Self> {
        match symbol {
            '{' => Some(LexemeKind::BraceOpen),
            '}' => Some(LexemeKind::BraceClose),
            '(' => Some(LexemeKind::ParenOpen),
            ')' => Some(LexemeKind::ParenClose),
            ';' => Some(LexemeKind::SemiColon),
            ',' => Some(LexemeKind::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned token. Immutable once produced.
///
/// `text` is exactly what appeared in the source, so concatenating the text
/// of every lexeme reproduces the input. `value` is the decoded content: the
/// same as `text` except for quoted strings, where the quotes are dropped and
/// escapes applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Lexeme {
    /// A lexeme whose decoded value equals its source text.
    pub fn new(kind: LexemeKind, text: impl Into<String>, position: Position) -> Self {
        let text = text.into();
        Self {
            kind,
            value: text.clone(),
            text,
            line: position.line,
            column: position.column,
        }
    }

    /// A quoted-string lexeme: `text` is the raw source, `value` the content.
    pub fn quoted(text: impl Into<String>, value: impl Into<String>, position: Position) -> Self {
        Self {
            kind: LexemeKind::Quoted,
            text: text.into(),
            value: value.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" ({}) at position {}:{}",
            self.value, self.kind, self.line, self.column
        )
    }
}
