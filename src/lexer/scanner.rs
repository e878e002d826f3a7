//! The pull scanner.
//!
//! Each call to [`Lexer::next`] looks at the current symbol, dispatches to one
//! scan routine and runs it until exactly one lexeme is complete. The scanner
//! holds a two-symbol lookahead window over its character source and a
//! line/column cursor advanced on every consumed symbol.

use crate::errors::{LexError, Position};

use super::{Lexeme, LexemeKind, LexerConfig};

/// Scan routine selected by the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Quoted,
    Whitespace,
    Punctuation(LexemeKind),
    Number,
    Operator,
    Identifier,
}

/// Lazy lexeme stream over a source of unicode scalar values.
///
/// Yields `Ok(lexeme)` items in source order, `None` at end of input, and at
/// most one `Err`, after which the stream is exhausted. A lexer cannot be
/// restarted; build a fresh one per input.
pub struct Lexer<'c, I>
where
    I: Iterator<Item = char>,
{
    config: &'c LexerConfig,
    source: I,
    lookahead: [Option<char>; 2],
    cursor: Position,
    start: Position,
    text: String,
    halted: bool,
}

impl<'c, I> Lexer<'c, I>
where
    I: Iterator<Item = char>,
{
    pub fn new<S>(config: &'c LexerConfig, source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        let mut source = source.into_iter();
        let lookahead = [source.next(), source.next()];
        Self {
            config,
            source,
            lookahead,
            cursor: Position::start(),
            start: Position::start(),
            text: String::new(),
            halted: false,
        }
    }

    // ------------------------------------------------------------------------
    // Lookahead window
    // ------------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.lookahead[0]
    }

    fn peek_second(&self) -> Option<char> {
        self.lookahead[1]
    }

    /// Consume the current symbol into the pending lexeme text.
    fn bump(&mut self) -> Option<char> {
        let symbol = self.lookahead[0].take()?;
        self.lookahead = [self.lookahead[1], self.source.next()];

        if symbol == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        self.text.push(symbol);

        Some(symbol)
    }

    fn emit(&mut self, kind: LexemeKind) -> Lexeme {
        Lexeme::new(kind, std::mem::take(&mut self.text), self.start)
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    fn dispatch(&self, symbol: char) -> Option<Scan> {
        if LexerConfig::is_quote(symbol) {
            Some(Scan::Quoted)
        } else if symbol.is_whitespace() {
            Some(Scan::Whitespace)
        } else if let Some(kind) = LexemeKind::punctuation(symbol) {
            Some(Scan::Punctuation(kind))
        } else if symbol == '+' || symbol == '-' || symbol.is_ascii_digit() {
            Some(Scan::Number)
        } else if self.config.is_operator_symbol(symbol) {
            Some(Scan::Operator)
        } else if self.config.is_identifier_start(symbol) {
            Some(Scan::Identifier)
        } else {
            None
        }
    }

    fn scan(&mut self, symbol: char) -> Result<Lexeme, LexError> {
        match self.dispatch(symbol) {
            Some(Scan::Quoted) => self.scan_quoted(),
            Some(Scan::Whitespace) => Ok(self.scan_whitespace()),
            Some(Scan::Punctuation(kind)) => Ok(self.scan_punctuation(kind)),
            Some(Scan::Number) => self.scan_number(),
            Some(Scan::Operator) => self.scan_operator(),
            Some(Scan::Identifier) => Ok(self.scan_identifier()),
            None => Err(LexError::UnexpectedToken {
                symbol,
                position: self.start,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Scan routines
    // ------------------------------------------------------------------------

    fn scan_quoted(&mut self) -> Result<Lexeme, LexError> {
        let unterminated = LexError::UnterminatedString {
            position: self.start,
        };
        let quote = self.bump().ok_or_else(|| unterminated.clone())?;
        let mut value = String::new();

        loop {
            match self.bump() {
                None => return Err(unterminated),
                Some('\\') => match self.bump() {
                    Some(escaped) if escaped == '\\' || escaped == quote => value.push(escaped),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(unterminated),
                },
                Some(symbol) if symbol == quote => break,
                Some(symbol) => value.push(symbol),
            }
        }

        Ok(Lexeme::quoted(
            std::mem::take(&mut self.text),
            value,
            self.start,
        ))
    }

    fn scan_whitespace(&mut self) -> Lexeme {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.emit(LexemeKind::Whitespace)
    }

    fn scan_punctuation(&mut self, kind: LexemeKind) -> Lexeme {
        self.bump();
        self.emit(kind)
    }

    fn scan_number(&mut self) -> Result<Lexeme, LexError> {
        if matches!(self.peek(), Some('+' | '-')) {
            if !self.peek_second().is_some_and(|next| next.is_ascii_digit()) {
                // A sign with no digit after it is an operator.
                return self.scan_operator();
            }
            self.bump();
        }

        let mut seen_decimal = false;
        while let Some(symbol) = self.peek() {
            match symbol {
                '0'..='9' => {}
                '.' if !seen_decimal => seen_decimal = true,
                _ => break,
            }
            self.bump();
        }

        Ok(self.emit(LexemeKind::Number))
    }

    fn scan_operator(&mut self) -> Result<Lexeme, LexError> {
        while self
            .peek()
            .is_some_and(|symbol| self.config.is_operator_symbol(symbol))
        {
            self.bump();
        }

        if self.text.is_empty() {
            return Err(LexError::UnexpectedToken {
                symbol: self.peek().unwrap_or_default(),
                position: self.start,
            });
        }

        let mut symbols = self.text.chars();
        let kind = match (symbols.next(), symbols.next()) {
            (Some(only), None) if only == self.config.assignment => LexemeKind::Equals,
            _ => LexemeKind::Operator,
        };
        Ok(self.emit(kind))
    }

    fn scan_identifier(&mut self) -> Lexeme {
        while self
            .peek()
            .is_some_and(|symbol| self.config.is_identifier_symbol(symbol))
        {
            self.bump();
        }

        let kind = self
            .config
            .classify_word(&self.text)
            .unwrap_or(LexemeKind::Identifier);
        self.emit(kind)
    }
}

impl<I> Iterator for Lexer<'_, I>
where
    I: Iterator<Item = char>,
{
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        let Some(symbol) = self.peek() else {
            self.halted = true;
            return None;
        };

        self.start = self.cursor;
        let result = self.scan(symbol);
        if result.is_err() {
            self.halted = true;
        }
        Some(result)
    }
}

/// Scan a whole string, stopping at the first error.
pub fn tokenize(config: &LexerConfig, source: &str) -> Result<Vec<Lexeme>, LexError> {
    Lexer::new(config, source.chars()).collect()
}
