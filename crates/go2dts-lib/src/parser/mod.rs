//! Go declaration parser.
//!
//! Produces a [`SourceFile`] holding the package clause, imports, type specs,
//! and string-typed constants. Function bodies and value declarations are
//! skipped by delimiter balancing.
//!
//! A syntax error abandons the whole file; the caller reports it and moves on.
//! Unsupported-but-valid constructs (generic types) are skipped with a warning
//! and parsing continues.

pub mod ast;
mod core;
mod grammar;
pub mod lexer;
pub mod syntax_kind;
pub mod tag;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod tag_tests;

pub use ast::SourceFile;
pub use self::core::{Parser, SyntaxError};
pub use tag::JsonTag;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::source_map::{SourceId, Span};

#[derive(Debug)]
pub struct ParseResult {
    /// `None` when a syntax error abandoned the file.
    pub file: Option<SourceFile>,
    pub diagnostics: Diagnostics,
}

/// Parses one Go file. Never fails: syntax errors become a `Parse` warning.
pub fn parse(source: &str, source_id: SourceId) -> ParseResult {
    let tokens = lexer::lex(source);
    let mut parser = Parser::new(source, tokens, source_id);
    let parsed = parser.parse_file();
    let mut diagnostics = std::mem::take(&mut parser.diagnostics);

    match parsed {
        Ok(file) => ParseResult {
            file: Some(file),
            diagnostics,
        },
        Err(err) => {
            diagnostics
                .report(DiagnosticKind::Parse, Span::new(source_id, err.range))
                .message(err.message)
                .emit();
            ParseResult {
                file: None,
                diagnostics,
            }
        }
    }
}

/// Whether the file carries the standard generated-code marker
/// (`// Code generated ... DO NOT EDIT.`) before its package clause.
pub fn is_generated(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            return false;
        }
        if let Some(rest) = line.strip_prefix("// Code generated ")
            && rest.ends_with(" DO NOT EDIT.")
        {
            return true;
        }
    }
    false
}
