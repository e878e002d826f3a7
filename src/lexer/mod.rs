//! Lexical scanning: source characters to a lazy stream of [`Lexeme`]s.
//!
//! - [`lexeme`]: the token model and its kinds
//! - [`config`]: operator, keyword and literal tables
//! - [`scanner`]: the [`Lexer`] iterator
//!
//! Whitespace is emitted as lexemes of its own, so the `text` of every
//! lexeme concatenated reproduces the input exactly.

pub mod config;
pub mod lexeme;
pub mod scanner;

pub use config::LexerConfig;
pub use lexeme::{Lexeme, LexemeKind};
pub use scanner::{tokenize, Lexer};
