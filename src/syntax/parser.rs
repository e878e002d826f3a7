//! Jaslang Parser
//!
//! Drives the grammar machine with a lexeme stream. Whitespace is dropped,
//! each remaining lexeme's kind is the transition label, and the tree builder
//! sees the lexeme itself plus the kind of the one after it.
//!
//! The first error ends the parse; no partial tree is returned.

use crate::ast::Root;
use crate::dialect::Dialect;
use crate::errors::{FsmError, LexError, ParseError, Position};
use crate::lexer::{Lexeme, LexemeKind, Lexer};

use super::grammar::{self, Grammar};
use super::tree::TreeBuilder;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses source text under one dialect. Cheap to create; holds no state
/// between parses.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'d> {
    dialect: &'d Dialect,
}

impl<'d> Parser<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// Scan and parse `source`.
    pub fn parse(&self, source: &str) -> Result<Root, ParseError> {
        self.parse_lexemes(Lexer::new(&self.dialect.lexer, source.chars()))
    }

    /// Parse an already scanned stream. Scan errors in the stream abort the
    /// parse when they are reached.
    pub fn parse_lexemes<I>(&self, lexemes: I) -> Result<Root, ParseError>
    where
        I: IntoIterator<Item = Result<Lexeme, LexError>>,
    {
        let mut lexemes = lexemes
            .into_iter()
            .filter(|lexeme| !matches!(lexeme, Ok(l) if l.kind == LexemeKind::Whitespace))
            .peekable();

        let mut machine = grammar::build_machine()?;
        let mut tree = TreeBuilder::new(self.dialect.operators.clone());
        let mut last = None;

        while let Some(lexeme) = lexemes.next() {
            let lexeme = lexeme?;
            let lookahead = match lexemes.peek() {
                Some(Ok(next)) => Some(next.kind),
                _ => None,
            };
            let kind = lexeme.kind;
            last = Some(lexeme.position());

            tree.feed(lexeme, lookahead);
            machine
                .transition(kind, &mut tree)
                .map_err(|err| with_route(err, &tree, &machine))?;
        }

        machine.finish().map_err(|err| match err {
            FsmError::UnacceptableFinishState(_) => ParseError::UnterminatedStatement {
                position: last.unwrap_or_else(Position::start),
            },
            other => other.into(),
        })?;

        tree.into_root()
    }
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

/// Turn a rejected transition into an unexpected-token error carrying the
/// machine's route.
fn with_route(err: ParseError, tree: &TreeBuilder, machine: &Grammar) -> ParseError {
    match err {
        ParseError::Machine(FsmError::InvalidTransition { .. }) => match tree.current() {
            Some(lexeme) => ParseError::UnexpectedToken {
                lexeme: lexeme.clone(),
                route: machine.debug_route(),
            },
            None => err,
        },
        ParseError::UnexpectedToken { lexeme, route } if route.is_empty() => {
            ParseError::UnexpectedToken {
                lexeme,
                route: machine.debug_route(),
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Root, ParseError> {
        Parser::new(&Dialect::default()).parse(source)
    }

    #[test]
    fn empty_input_is_empty_root() {
        assert_eq!(parse("").unwrap(), Root::default());
        assert_eq!(parse(" \n\t ").unwrap(), Root::default());
    }

    #[test]
    fn rejected_token_carries_route() {
        let err = parse("1 2;").unwrap_err();
        assert!(matches!(&err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.text == "2"));
        assert_eq!(err.route(), Some("ORIGIN: start >>number>> number"));
    }

    #[test]
    fn callback_rejection_also_carries_route() {
        let err = parse("(1;").unwrap_err();
        assert!(matches!(&err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.text == ";"));
        assert_eq!(
            err.route(),
            Some("ORIGIN: start >>paren-open>> group-open >>number>> number >>semi-colon>> term")
        );
    }

    #[test]
    fn missing_terminator_points_at_last_lexeme() {
        let err = parse("a = 1 +\n  2").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedStatement {
                position: Position::new(2, 3),
            }
        );
    }

    #[test]
    fn scan_errors_surface_as_parse_errors() {
        let err = parse("println(\"oops);").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnterminatedString { .. })
        ));
    }
}
