//! Operator precedence register.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::DialectError;

/// Operator symbols and their binding strength. Higher binds tighter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorTable {
    precedence: BTreeMap<String, u8>,
}

/// Lookup of a symbol that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The operators of the stock language, loosest first.
    pub fn standard() -> Self {
        let levels: [&[&str]; 7] = [
            &["||"],
            &["&&"],
            &["==", "!="],
            &["<", "<=", ">", ">="],
            &["+", "-"],
            &["*", "/", "%"],
            &["^"],
        ];

        let mut table = Self::new();
        for (level, symbols) in (0u8..).zip(levels) {
            for symbol in symbols {
                table.precedence.insert(symbol.to_string(), level);
            }
        }
        table
    }

    pub fn register(&mut self, symbol: impl Into<String>, precedence: u8) -> Result<(), DialectError> {
        let symbol = symbol.into();
        if self.precedence.contains_key(&symbol) {
            return Err(DialectError::DuplicateOperator { symbol });
        }
        self.precedence.insert(symbol, precedence);
        Ok(())
    }

    pub fn precedence(&self, symbol: &str) -> Option<u8> {
        self.precedence.get(symbol).copied()
    }

    /// Whether `what` binds strictly tighter than `over`.
    ///
    /// The tree builder resolves each operator's level once, when its node is
    /// created. This is the symbol-level comparison for code that only holds
    /// operator symbols, such as an evaluator.
    pub fn takes_precedence(&self, what: &str, over: &str) -> Result<bool, UnknownOperator> {
        let what = self
            .precedence(what)
            .ok_or_else(|| UnknownOperator(what.to_string()))?;
        let over = self
            .precedence(over)
            .ok_or_else(|| UnknownOperator(over.to_string()))?;
        Ok(what > over)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.precedence.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_strict() {
        let cases = [
            (("+", 0), ("-", 0), false),
            (("+", 1), ("-", 0), true),
            (("+", 0), ("-", 1), false),
            (("+", 1), ("-", 1), false),
        ];

        for ((what, what_level), (over, over_level), expected) in cases {
            let mut table = OperatorTable::new();
            table.register(what, what_level).unwrap();
            table.register(over, over_level).unwrap();

            assert_eq!(
                table.takes_precedence(what, over),
                Ok(expected),
                "{what}({what_level}) over {over}({over_level})"
            );
        }
    }

    #[test]
    fn unknown_operator_is_reported_either_side() {
        let mut table = OperatorTable::new();
        table.register("+", 0).unwrap();

        let err = table.takes_precedence("+", "-").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operator: -");
        let err = table.takes_precedence("-", "+").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operator: -");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut table = OperatorTable::new();
        table.register("*", 1).unwrap();
        assert!(matches!(
            table.register("*", 2),
            Err(DialectError::DuplicateOperator { symbol }) if symbol == "*"
        ));
        assert_eq!(table.precedence("*"), Some(1));
    }

    #[test]
    fn standard_table_orders_arithmetic() {
        let table = OperatorTable::standard();
        assert_eq!(table.takes_precedence("*", "+"), Ok(true));
        assert_eq!(table.takes_precedence("+", "-"), Ok(false));
        assert_eq!(table.takes_precedence("^", "*"), Ok(true));
        assert_eq!(table.takes_precedence("||", "&&"), Ok(false));
    }
}
