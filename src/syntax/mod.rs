//! Syntax analysis: lexemes in, [`crate::ast::Root`] out.
//!
//! - [`operators`]: operator precedence table
//! - [`tree`]: arena tree builder with precedence rotation
//! - [`grammar`]: the statement grammar as a state machine
//! - [`parser`]: the driver tying the three together
//!
//! [`parse`] covers the stock language; [`parse_with`] takes a [`Dialect`].

use crate::ast::Root;
use crate::dialect::Dialect;
use crate::errors::{LexError, ParseError};
use crate::lexer::Lexeme;

pub mod grammar;
pub mod operators;
pub mod parser;
pub mod tree;

pub use operators::OperatorTable;
pub use parser::Parser;
pub use tree::TreeBuilder;

/// Parse `source` in the stock language.
pub fn parse(source: &str) -> Result<Root, ParseError> {
    parse_with(&Dialect::default(), source)
}

/// Parse `source` in `dialect`.
pub fn parse_with(dialect: &Dialect, source: &str) -> Result<Root, ParseError> {
    Parser::new(dialect).parse(source)
}

/// Parse a lexeme stream with the stock operator table.
pub fn parse_lexemes<I>(lexemes: I) -> Result<Root, ParseError>
where
    I: IntoIterator<Item = Result<Lexeme, LexError>>,
{
    Parser::new(&Dialect::default()).parse_lexemes(lexemes)
}
