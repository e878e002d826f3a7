//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use jaslang::ast::Root;
use jaslang::errors::{ParseError, Position};
use jaslang::lexer::{tokenize, Lexeme, LexemeKind, LexerConfig};

/// `(kind, value, line, column)` for every lexeme of `source`.
pub fn scan(source: &str) -> Vec<(LexemeKind, String, usize, usize)> {
    tokenize(&LexerConfig::default(), source)
        .unwrap_or_else(|err| panic!("cannot scan {source:?}: {err}"))
        .into_iter()
        .map(|l| (l.kind, l.value, l.line, l.column))
        .collect()
}

/// Shorthand for an expected single-line lexeme.
pub fn lx(value: &str, kind: LexemeKind, column: usize) -> (LexemeKind, String, usize, usize) {
    (kind, value.to_string(), 1, column)
}

/// A lexeme as the parser would receive it from the scanner.
pub fn lexeme(kind: LexemeKind, text: &str, column: usize) -> Result<Lexeme, jaslang::LexError> {
    Ok(Lexeme::new(kind, text, Position::new(1, column)))
}

pub fn parse(source: &str) -> Root {
    jaslang::parse(source).unwrap_or_else(|err| panic!("cannot parse {source:?}: {err}"))
}

pub fn parse_err(source: &str) -> ParseError {
    match jaslang::parse(source) {
        Ok(root) => panic!("{source:?} parsed to {}", root.pretty()),
        Err(err) => err,
    }
}

/// A fresh directory under the system temp dir, unique per call.
pub fn scratch_dir(label: &str) -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "jaslang-{label}-{}-{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `content` to `name` inside `dir` and return the file's path.
pub fn write_source(dir: &PathBuf, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
