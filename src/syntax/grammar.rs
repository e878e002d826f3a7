//! The statement grammar, encoded as a machine over lexeme kinds.
//!
//! Each state is named after what was just read. Entering a state performs
//! one tree-building step on the [`TreeBuilder`]; taking a `;` or `,` closes
//! the statement or argument first.
//!
//! ```text
//! start/term --let--> let --identifier--> let-identifier
//!     --identifier--> let-type-identifier --equals--> let-equals --> <operand>
//! start/term --identifier--> statement-identifier --equals--> assignment --> <operand>
//! start/term --> <operand> --operator--> operator --> <operand> ... --semi-colon--> term
//! ```

use crate::errors::{FsmError, ParseError};
use crate::fsm::{Machine, MachineBuilder};
use crate::lexer::LexemeKind;

use super::tree::TreeBuilder;

/// The running grammar: labels are lexeme kinds, callbacks build the tree.
pub type Grammar = Machine<LexemeKind, TreeBuilder, ParseError>;

const START: &str = "start";
const TERM: &str = "term";
const NUMBER: &str = "number";
const QUOTED: &str = "quoted";
const TRUE: &str = "true";
const FALSE: &str = "false";
const IDENTIFIER: &str = "identifier";
const STATEMENT_IDENTIFIER: &str = "statement-identifier";
const OPERATOR: &str = "operator";
const GROUP_OPEN: &str = "group-open";
const CALL_OPEN: &str = "call-open";
const COMMA: &str = "comma";
const PAREN_CLOSE: &str = "paren-close";
const ASSIGNMENT: &str = "assignment";
const LET: &str = "let";
const LET_IDENTIFIER: &str = "let-identifier";
const LET_TYPE_IDENTIFIER: &str = "let-type-identifier";
const LET_EQUALS: &str = "let-equals";

/// States a statement may begin from.
const STATEMENT_STARTS: &[&str] = &[START, TERM];

/// States after which an operand must follow.
const EXPECTS_OPERAND: &[&str] = &[OPERATOR, GROUP_OPEN, CALL_OPEN, COMMA, ASSIGNMENT, LET_EQUALS];

/// States that complete an operand.
const ENDS_OPERAND: &[&str] = &[
    NUMBER,
    QUOTED,
    TRUE,
    FALSE,
    IDENTIFIER,
    STATEMENT_IDENTIFIER,
    PAREN_CLOSE,
];

/// Build and start the grammar machine.
pub fn build_machine() -> Result<Grammar, FsmError> {
    let mut builder = MachineBuilder::<LexemeKind, TreeBuilder, ParseError>::new();

    let literals = [
        (LexemeKind::Number, NUMBER),
        (LexemeKind::Quoted, QUOTED),
        (LexemeKind::True, TRUE),
        (LexemeKind::False, FALSE),
    ];

    // Statement openings
    for (kind, state) in literals {
        builder.paths(STATEMENT_STARTS, kind, state)?;
    }
    builder.paths(STATEMENT_STARTS, LexemeKind::Identifier, STATEMENT_IDENTIFIER)?;
    builder.paths(STATEMENT_STARTS, LexemeKind::ParenOpen, GROUP_OPEN)?;
    builder.paths(STATEMENT_STARTS, LexemeKind::Let, LET)?;

    // Operands inside expressions
    for (kind, state) in literals {
        builder.paths(EXPECTS_OPERAND, kind, state)?;
    }
    builder.paths(EXPECTS_OPERAND, LexemeKind::Identifier, IDENTIFIER)?;
    builder.paths(EXPECTS_OPERAND, LexemeKind::ParenOpen, GROUP_OPEN)?;

    // What may follow a complete operand
    builder.paths(ENDS_OPERAND, LexemeKind::Operator, OPERATOR)?;
    builder.paths(ENDS_OPERAND, LexemeKind::SemiColon, TERM)?;
    builder.paths(ENDS_OPERAND, LexemeKind::ParenClose, PAREN_CLOSE)?;
    builder.paths(ENDS_OPERAND, LexemeKind::Comma, COMMA)?;

    // Calls and assignment
    builder.paths(&[IDENTIFIER, STATEMENT_IDENTIFIER], LexemeKind::ParenOpen, CALL_OPEN)?;
    builder.path(CALL_OPEN, LexemeKind::ParenClose, PAREN_CLOSE)?;
    builder.path(STATEMENT_IDENTIFIER, LexemeKind::Equals, ASSIGNMENT)?;

    // Declarations
    builder.path(LET, LexemeKind::Identifier, LET_IDENTIFIER)?;
    builder.path(LET_IDENTIFIER, LexemeKind::Identifier, LET_TYPE_IDENTIFIER)?;
    builder.path(LET_TYPE_IDENTIFIER, LexemeKind::Equals, LET_EQUALS)?;

    builder.when_entering(NUMBER, TreeBuilder::create_number)?;
    builder.when_entering(QUOTED, TreeBuilder::create_string)?;
    builder.when_entering(TRUE, TreeBuilder::create_boolean)?;
    builder.when_entering(FALSE, TreeBuilder::create_boolean)?;
    builder.when_entering(IDENTIFIER, TreeBuilder::create_identifier)?;
    builder.when_entering(STATEMENT_IDENTIFIER, TreeBuilder::create_identifier)?;
    builder.when_entering(OPERATOR, TreeBuilder::create_operator)?;
    builder.when_entering(GROUP_OPEN, TreeBuilder::create_group)?;
    builder.when_entering(PAREN_CLOSE, TreeBuilder::close_group_or_function)?;
    builder.when_entering(ASSIGNMENT, TreeBuilder::create_assignment)?;
    builder.when_entering(LET, TreeBuilder::create_declaration)?;
    builder.when_entering(LET_IDENTIFIER, TreeBuilder::create_bare_identifier)?;
    builder.when_entering(LET_TYPE_IDENTIFIER, TreeBuilder::create_bare_identifier)?;

    builder.when_transitioning_via(LexemeKind::SemiColon, TreeBuilder::close_statement)?;
    builder.when_transitioning_via(LexemeKind::Comma, TreeBuilder::close_argument)?;

    builder.accept(START)?;
    builder.accept(TERM)?;

    builder.start(START)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Position;
    use crate::lexer::Lexeme;
    use crate::syntax::OperatorTable;

    #[test]
    fn grammar_builds() {
        let machine = build_machine().unwrap();
        assert_eq!(machine.current_state(), START);
        assert!(!machine.is_finished());
    }

    #[test]
    fn declaration_route_is_traced() {
        let mut machine = build_machine().unwrap();
        let mut tree = TreeBuilder::new(OperatorTable::standard());
        let kinds = [
            (LexemeKind::Let, "let"),
            (LexemeKind::Identifier, "b"),
            (LexemeKind::Identifier, "boolean"),
            (LexemeKind::Equals, "="),
            (LexemeKind::True, "true"),
            (LexemeKind::SemiColon, ";"),
        ];
        for (kind, text) in kinds {
            tree.feed(Lexeme::new(kind, text, Position::start()), None);
            machine.transition(kind, &mut tree).unwrap();
        }
        machine.finish().unwrap();
        assert_eq!(
            machine.debug_route(),
            "ORIGIN: start >>let>> let >>identifier>> let-identifier \
             >>identifier>> let-type-identifier >>equals>> let-equals \
             >>true>> true >>semi-colon>> term"
        );
        assert_eq!(tree.into_root().unwrap().pretty(), "(let b boolean true);");
    }
}
