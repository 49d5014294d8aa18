//! Parser state and low-level token operations.

use rowan::{TextRange, TextSize};

use super::lexer::{Token, token_text};
use super::syntax_kind::SyntaxKind;
use crate::diagnostics::Diagnostics;
use crate::source_map::{SourceId, Span};

/// Nesting limit for type expressions.
const MAX_DEPTH: u32 = 256;

/// A syntax error aborts the parse of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

pub(super) type PResult<T> = Result<T, SyntaxError>;

pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) source_id: SourceId,
    pub(super) diagnostics: Diagnostics,
    depth: u32,
    last_end: TextSize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>, source_id: SourceId) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            source_id,
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_end: TextSize::from(0),
        }
    }

    pub(super) fn skip_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.pos += 1;
        }
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.tokens.get(self.pos).map_or(SyntaxKind::Eof, |t| t.kind)
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia();
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        self.skip_trivia();
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    /// LL(k) lookahead past trivia. Newlines are not trivia.
    pub(super) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia();
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    /// End offset of the last consumed token.
    pub(super) fn last_end(&self) -> TextSize {
        self.last_end
    }

    pub(super) fn bump(&mut self) -> Token {
        self.skip_trivia();
        match self.tokens.get(self.pos) {
            Some(&token) => {
                self.pos += 1;
                self.last_end = token.span.end();
                token
            }
            None => Token::new(SyntaxKind::Eof, TextRange::empty(self.eof_offset())),
        }
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.currently_is(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> PResult<Token> {
        if self.currently_is(kind) {
            return Ok(self.bump());
        }
        Err(self.error(format!("expected {what}")))
    }

    pub(super) fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    /// Skips newlines and semicolons between list items.
    pub(super) fn skip_separators(&mut self) {
        while matches!(self.current(), SyntaxKind::Newline | SyntaxKind::Semicolon) {
            self.bump();
        }
    }

    /// Skips newlines inside delimited lists where Go would not insert a semicolon.
    pub(super) fn skip_newlines(&mut self) {
        while self.currently_is(SyntaxKind::Newline) {
            self.bump();
        }
    }

    pub(super) fn error(&mut self, message: impl Into<String>) -> SyntaxError {
        let found = match self.current() {
            SyntaxKind::Eof => "end of file".to_string(),
            SyntaxKind::Newline => "newline".to_string(),
            _ => format!("`{}`", self.current_text()),
        };
        SyntaxError {
            message: format!("{}, found {found}", message.into()),
            range: self.current_span(),
        }
    }

    pub(super) fn span(&self, range: TextRange) -> Span {
        Span::new(self.source_id, range)
    }

    pub(super) fn enter(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError {
                message: "type expression nested too deeply".to_string(),
                range: self.current_span(),
            });
        }
        Ok(())
    }

    pub(super) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skips tokens up to the end of the current spec or declaration.
    ///
    /// Stops before a newline or semicolon at nesting depth zero, or before
    /// `closer` when it would close the enclosing group.
    pub(super) fn skip_spec(&mut self, closer: Option<SyntaxKind>) {
        let mut depth = 0usize;
        loop {
            let kind = self.current();
            match kind {
                SyntaxKind::Eof => return,
                SyntaxKind::Newline | SyntaxKind::Semicolon if depth == 0 => return,
                SyntaxKind::ParenOpen | SyntaxKind::BracketOpen | SyntaxKind::BraceOpen => {
                    depth += 1
                }
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose => {
                    if depth == 0 && Some(kind) == closer {
                        return;
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Collects the comment group ending on the line directly above the
    /// token at `index`.
    pub(super) fn doc_before(&self, index: usize) -> Option<String> {
        let skip_ws = |mut i: usize| {
            while i > 0 && self.tokens[i - 1].kind == SyntaxKind::Whitespace {
                i -= 1;
            }
            i
        };

        let mut i = skip_ws(index.min(self.tokens.len()));
        if i == 0 || self.tokens[i - 1].kind != SyntaxKind::Newline {
            return None;
        }
        i -= 1;

        let mut groups: Vec<&str> = Vec::new();
        loop {
            let end = skip_ws(i);
            if end == 0 || !self.tokens[end - 1].kind.is_comment() {
                break;
            }
            let comment = end - 1;
            let start = skip_ws(comment);
            if start > 0 && self.tokens[start - 1].kind != SyntaxKind::Newline {
                // Trailing comment of the line above.
                break;
            }
            groups.push(token_text(self.source, &self.tokens[comment]));
            if start == 0 {
                break;
            }
            i = start - 1;
        }

        let lines: Vec<String> = groups
            .into_iter()
            .rev()
            .flat_map(comment_lines)
            .collect();
        let doc = lines.join("\n").trim().to_string();
        (!doc.is_empty()).then_some(doc)
    }
}

fn comment_lines(text: &str) -> Vec<String> {
    if let Some(line) = text.strip_prefix("//") {
        if line.starts_with("go:") || line.starts_with("line ") {
            return Vec::new();
        }
        return vec![line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()];
    }

    let body = text
        .strip_prefix("/*")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(text);
    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix('*'))
                .unwrap_or(line)
                .to_string()
        })
        .collect()
}
