pub use crate::errors::{LexError, ParseError, Position, SourceContext};
pub use crate::syntax::{parse, parse_with};

pub mod ast;
pub mod cli;
pub mod dialect;
pub mod errors;
pub mod fsm;
pub mod lexer;
pub mod syntax;
