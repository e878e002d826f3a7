//! Language dialects: the tables the lexer and parser are configured with.
//!
//! A [`Dialect`] bundles the lexer's symbol tables with the operator
//! precedence table. The default is the stock language; others can be loaded
//! from YAML, where any field left out keeps its stock value:
//!
//! ```yaml
//! lexer:
//!   operator_symbols: "+-*/=<>!~"
//! operators:
//!   "+": 1
//!   "-": 1
//!   "*": 2
//!   "/": 2
//!   "~": 3
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::DialectError;
use crate::lexer::LexerConfig;
use crate::syntax::OperatorTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub lexer: LexerConfig,
    pub operators: OperatorTable,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            lexer: LexerConfig::default(),
            operators: OperatorTable::standard(),
        }
    }
}

impl Dialect {
    /// Parse and validate a YAML dialect definition.
    pub fn from_yaml_str(source: &str) -> Result<Self, DialectError> {
        let dialect: Dialect = serde_yaml::from_str(source)?;
        dialect.validate()?;
        Ok(dialect)
    }

    /// Read, parse and validate a YAML dialect file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DialectError> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// Check the tables agree: every operator must scan as a single operator
    /// run, and the assignment symbol must be an operator symbol.
    ///
    /// The converse is not required. Operator symbols may form runs with no
    /// registered precedence; those fail when parsed.
    pub fn validate(&self) -> Result<(), DialectError> {
        if !self.lexer.is_operator_symbol(self.lexer.assignment) {
            return Err(DialectError::AssignmentNotOperator {
                symbol: self.lexer.assignment,
            });
        }

        let assignment = self.lexer.assignment.to_string();
        for symbol in self.operators.symbols() {
            let lexable = !symbol.is_empty()
                && symbol != assignment
                && symbol.chars().all(|c| self.lexer.is_operator_symbol(c));
            if !lexable {
                return Err(DialectError::UnlexableOperator {
                    symbol: symbol.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_dialect_is_valid() {
        assert!(Dialect::default().validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dialect = Dialect::from_yaml_str(
            r#"
operators:
  "+": 0
  "~": 1
lexer:
  operator_symbols: "+~="
"#,
        )
        .unwrap();
        assert_eq!(dialect.operators.precedence("~"), Some(1));
        assert_eq!(dialect.operators.precedence("*"), None);
        assert_eq!(dialect.lexer.assignment, '=');
        assert!(dialect.lexer.keywords.contains_key("let"));
    }

    #[test]
    fn operator_outside_symbol_set_is_rejected() {
        let err = Dialect::from_yaml_str("operators:\n  \"~\": 1\n").unwrap_err();
        assert!(matches!(err, DialectError::UnlexableOperator { symbol } if symbol == "~"));
    }

    #[test]
    fn assignment_cannot_be_an_operator() {
        let err = Dialect::from_yaml_str("operators:\n  \"=\": 1\n").unwrap_err();
        assert!(matches!(err, DialectError::UnlexableOperator { symbol } if symbol == "="));
    }

    #[test]
    fn assignment_must_be_operator_symbol() {
        let err = Dialect::from_yaml_str("lexer:\n  assignment: ':'\n").unwrap_err();
        assert!(matches!(err, DialectError::AssignmentNotOperator { symbol: ':' }));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = Dialect::from_yaml_str("operators: [1, 2").unwrap_err();
        assert!(matches!(err, DialectError::Yaml(_)));
    }
}
