//! Jaslang Error Handling
//!
//! Every stage of the front end reports failures through the enums in this
//! module: [`LexError`] for the scanner, [`FsmError`] for the state machine,
//! [`ParseError`] for the parser (wrapping the other two) and [`DialectError`]
//! for configuration. All of them are `miette` diagnostics.
//!
//! Errors carry line/column positions. To render one against its source text,
//! wrap it with [`SourceContext::diagnose`], which resolves the position to a
//! byte span and produces a [`SourceDiagnostic`] with a labelled snippet.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::lexer::Lexeme;

// ============================================================================
// POSITIONS
// ============================================================================

/// A 1-based line/column location in the source text.
///
/// Columns count unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position of the first symbol of any input.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failures of the lexical scanner. Both are terminal for the lexeme stream.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum LexError {
    #[error("Unterminated string starting at {position}")]
    #[diagnostic(
        code(jaslang::lex::unterminated_string),
        help("close the string with the same quote character it was opened with")
    )]
    UnterminatedString { position: Position },

    #[error("Unexpected token: {symbol} at {position}")]
    #[diagnostic(code(jaslang::lex::unexpected_token))]
    UnexpectedToken { symbol: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position } => *position,
            LexError::UnexpectedToken { position, .. } => *position,
        }
    }
}

/// Failures of the finite-state machine, at build time or at run time.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FsmError {
    #[error("Unknown state {0}")]
    #[diagnostic(code(jaslang::fsm::unknown_state))]
    UnknownState(String),

    #[error("Path \"{via}\" already exists from \"{from}\"")]
    #[diagnostic(code(jaslang::fsm::path_exists))]
    PathExists { from: String, via: String },

    #[error("A transition callback for \"{via}\" is already registered")]
    #[diagnostic(code(jaslang::fsm::duplicate_callback))]
    DuplicateCallback { via: String },

    #[error("Don't know how to move from {from} via path {via}")]
    #[diagnostic(code(jaslang::fsm::invalid_transition))]
    InvalidTransition { from: String, via: String },

    #[error("Machine cannot be used once it has finished")]
    #[diagnostic(code(jaslang::fsm::unusable))]
    MachineUnusable,

    #[error("Cannot accept final state {0}")]
    #[diagnostic(code(jaslang::fsm::unacceptable_finish))]
    UnacceptableFinishState(String),
}

/// Failures of a `parse` call. The first error aborts the parse.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ParseError {
    #[error("Unexpected token \"{}\" ({}) at {}", .lexeme.text, .lexeme.kind, .lexeme.position())]
    #[diagnostic(code(jaslang::parse::unexpected_token))]
    UnexpectedToken { lexeme: Lexeme, route: String },

    #[error("Invalid number \"{text}\" at {position}")]
    #[diagnostic(
        code(jaslang::parse::invalid_number),
        help("numbers may contain at most one decimal point")
    )]
    InvalidNumber { text: String, position: Position },

    #[error("Unterminated statement at {position}")]
    #[diagnostic(
        code(jaslang::parse::unterminated_statement),
        help("statements end with a semi-colon")
    )]
    UnterminatedStatement { position: Position },

    #[error("Unknown operator: {symbol} at {position}")]
    #[diagnostic(code(jaslang::parse::unknown_operator))]
    UnknownOperator { symbol: String, position: Position },

    #[error("Malformed {construct} at {position}")]
    #[diagnostic(code(jaslang::parse::malformed))]
    MalformedNode {
        construct: &'static str,
        position: Position,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Machine(#[from] FsmError),
}

impl ParseError {
    /// Builds an unexpected-token error; the route is filled in by the parser.
    pub fn unexpected(lexeme: &Lexeme) -> Self {
        ParseError::UnexpectedToken {
            lexeme: lexeme.clone(),
            route: String::new(),
        }
    }

    /// Where in the source the error occurred, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { lexeme, .. } => Some(lexeme.position()),
            ParseError::InvalidNumber { position, .. }
            | ParseError::UnterminatedStatement { position }
            | ParseError::UnknownOperator { position, .. }
            | ParseError::MalformedNode { position, .. } => Some(*position),
            ParseError::Lex(err) => Some(err.position()),
            ParseError::Machine(_) => None,
        }
    }

    /// Length, in source symbols, of the offending text.
    fn width(&self) -> usize {
        let width = match self {
            ParseError::UnexpectedToken { lexeme, .. } => lexeme.text.chars().count(),
            ParseError::InvalidNumber { text, .. } => text.chars().count(),
            ParseError::UnknownOperator { symbol, .. } => symbol.chars().count(),
            _ => 1,
        };
        width.max(1)
    }

    /// The machine route trace captured when the token was rejected.
    pub fn route(&self) -> Option<&str> {
        match self {
            ParseError::UnexpectedToken { route, .. } if !route.is_empty() => Some(route),
            _ => None,
        }
    }
}

/// Failures while loading or validating a [`crate::dialect::Dialect`].
#[derive(Debug, Error, Diagnostic)]
pub enum DialectError {
    #[error("Operator \"{symbol}\" is already registered")]
    #[diagnostic(code(jaslang::dialect::duplicate_operator))]
    DuplicateOperator { symbol: String },

    #[error("Operator \"{symbol}\" contains symbols the lexer does not treat as operators")]
    #[diagnostic(
        code(jaslang::dialect::unlexable_operator),
        help("add the missing characters to `operator_symbols`")
    )]
    UnlexableOperator { symbol: String },

    #[error("Assignment symbol '{symbol}' is not an operator symbol")]
    #[diagnostic(code(jaslang::dialect::assignment))]
    AssignmentNotOperator { symbol: char },

    #[error("Cannot read dialect file: {0}")]
    #[diagnostic(code(jaslang::dialect::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid dialect definition: {0}")]
    #[diagnostic(code(jaslang::dialect::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

// ============================================================================
// SOURCE CONTEXT - rendering errors against their source
// ============================================================================

/// Named source text used to render errors with a code snippet.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to a `NamedSource` for miette reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Byte offset of a line/column position, if it lies within the content.
    ///
    /// A position one past the final symbol resolves to the content length.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let mut line = 1;
        let mut column = 1;
        for (offset, symbol) in self.content.char_indices() {
            if line == position.line && column == position.column {
                return Some(offset);
            }
            if symbol == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line == position.line && column == position.column).then_some(self.content.len())
    }

    /// Attach this source to an error for rendering.
    pub fn diagnose(&self, error: ParseError) -> SourceDiagnostic {
        let span = error.position().and_then(|position| {
            let start = self.offset_of(position)?;
            let len = self.content[start..]
                .chars()
                .take(error.width())
                .map(char::len_utf8)
                .sum::<usize>()
                .max(1);
            Some(SourceSpan::new(start.into(), len))
        });
        let label = match &error {
            ParseError::UnexpectedToken { .. } => "unexpected here",
            ParseError::InvalidNumber { .. } => "invalid number",
            ParseError::UnterminatedStatement { .. } => "statement not terminated",
            ParseError::UnknownOperator { .. } => "unknown operator",
            ParseError::MalformedNode { .. } => "malformed here",
            ParseError::Lex(_) => "cannot scan",
            ParseError::Machine(_) => "here",
        }
        .to_string();
        let help = error.help().map(|help| help.to_string());

        SourceDiagnostic {
            src: self.to_named_source(),
            span,
            label,
            help,
            error,
        }
    }
}

/// A [`ParseError`] paired with its source, ready for `miette::Report`.
#[derive(Debug, Error, Diagnostic)]
#[error("{error}")]
#[diagnostic(code(jaslang::parse))]
pub struct SourceDiagnostic {
    pub error: ParseError,
    #[source_code]
    src: Arc<NamedSource<String>>,
    #[label("{label}")]
    span: Option<SourceSpan>,
    label: String,
    #[help]
    help: Option<String>,
}
