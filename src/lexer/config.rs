//! Symbol tables the scanner classifies with.
//!
//! These are plain data passed into [`super::Lexer::new`], so several dialects
//! can coexist in one process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::LexemeKind;

/// Operator characters of the stock language.
///
/// Some of these only occur inside longer operators (`&` in `&&`, `!` in
/// `!=`). A run the operator table does not register, such as a lone `&` or
/// the second `.` of `1.2.3`, scans as an operator and is rejected by the
/// parser with `UnknownOperator`.
pub const DEFAULT_OPERATOR_SYMBOLS: &str = "+-.^*&/|=<>!%";

/// Characters that always form single-character punctuation lexemes.
pub const PUNCTUATION: &str = "{}();,";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Characters that make up operator runs.
    pub operator_symbols: String,
    /// The operator that, standing alone, is its own `equals` lexeme.
    pub assignment: char,
    /// Case-sensitive reserved words.
    pub keywords: BTreeMap<String, LexemeKind>,
    /// Case-insensitive literal words, keyed in lower case.
    pub literals: BTreeMap<String, LexemeKind>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        let keywords = [
            ("if", LexemeKind::If),
            ("else", LexemeKind::Else),
            ("elseif", LexemeKind::ElseIf),
            ("while", LexemeKind::While),
            ("let", LexemeKind::Let),
        ];
        let literals = [("true", LexemeKind::True), ("false", LexemeKind::False)];

        Self {
            operator_symbols: DEFAULT_OPERATOR_SYMBOLS.to_string(),
            assignment: '=',
            keywords: keywords
                .into_iter()
                .map(|(word, kind)| (word.to_string(), kind))
                .collect(),
            literals: literals
                .into_iter()
                .map(|(word, kind)| (word.to_string(), kind))
                .collect(),
        }
    }
}

impl LexerConfig {
    pub fn is_operator_symbol(&self, symbol: char) -> bool {
        self.operator_symbols.contains(symbol)
    }

    pub fn is_punctuation(symbol: char) -> bool {
        PUNCTUATION.contains(symbol)
    }

    pub fn is_quote(symbol: char) -> bool {
        symbol == '"' || symbol == '\''
    }

    /// Whether `symbol` may appear inside an identifier.
    pub fn is_identifier_symbol(&self, symbol: char) -> bool {
        !Self::is_quote(symbol)
            && !symbol.is_whitespace()
            && !Self::is_punctuation(symbol)
            && !self.is_operator_symbol(symbol)
    }

    /// Whether an identifier may start with `symbol`.
    pub fn is_identifier_start(&self, symbol: char) -> bool {
        self.is_identifier_symbol(symbol) && !symbol.is_ascii_digit()
    }

    /// The keyword or literal kind of a complete word, if it is one.
    pub fn classify_word(&self, word: &str) -> Option<LexemeKind> {
        self.keywords
            .get(word)
            .or_else(|| self.literals.get(&word.to_lowercase()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_sensitive_literals_are_not() {
        let config = LexerConfig::default();
        assert_eq!(config.classify_word("let"), Some(LexemeKind::Let));
        assert_eq!(config.classify_word("LET"), None);
        assert_eq!(config.classify_word("TrUe"), Some(LexemeKind::True));
        assert_eq!(config.classify_word("FALSE"), Some(LexemeKind::False));
        assert_eq!(config.classify_word("letter"), None);
    }

    #[test]
    fn identifier_symbols_exclude_every_other_class() {
        let config = LexerConfig::default();
        for symbol in ['"', '\'', ' ', '\t', '(', ';', '+', '=', '.'] {
            assert!(!config.is_identifier_symbol(symbol), "{symbol:?}");
        }
        assert!(config.is_identifier_symbol('7'));
        assert!(!config.is_identifier_start('7'));
        assert!(config.is_identifier_start('ϝ'));
        assert!(config.is_identifier_start('_'));
    }
}
