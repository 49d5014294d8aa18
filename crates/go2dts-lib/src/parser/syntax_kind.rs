//! Token kinds for Go source.
//!
//! Only the declaration-level grammar is parsed; everything inside function
//! bodies and value expressions is skipped by delimiter balancing, so tokens
//! the type grammar never looks at fall into `Garbage`.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,

    #[token("*")]
    Star,

    #[token("=")]
    Equals,

    #[token("|")]
    Pipe,

    #[token("~")]
    Tilde,

    /// Channel direction arrow.
    #[token("<-")]
    Arrow,

    #[token("package")]
    KwPackage,

    #[token("import")]
    KwImport,

    #[token("type")]
    KwType,

    #[token("const")]
    KwConst,

    #[token("var")]
    KwVar,

    #[token("func")]
    KwFunc,

    #[token("struct")]
    KwStruct,

    #[token("interface")]
    KwInterface,

    #[token("map")]
    KwMap,

    #[token("chan")]
    KwChan,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"`[^`]*`")]
    RawStringLit,

    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    RuneLit,

    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    NumberLit,

    #[regex(r"[ \t\r\x0C]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Coalesced unrecognized characters (operators, stray bytes).
    Garbage,

    /// Sentinel returned past end of input.
    Eof,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Trivia never separates declarations. Newlines are significant and
    /// handled by the parser.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, LineComment | BlockComment)
    }

    #[inline]
    pub fn is_string(self) -> bool {
        matches!(self, StringLit | RawStringLit)
    }
}

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenSet({:#x})", self.0)
    }
}

pub mod token_sets {
    use super::*;

    /// Tokens that can start a type expression.
    pub const TYPE_FIRST: TokenSet = TokenSet::new(&[
        Ident,
        Star,
        BracketOpen,
        ParenOpen,
        Arrow,
        KwMap,
        KwChan,
        KwFunc,
        KwStruct,
        KwInterface,
    ]);

    /// Tokens that end a spec or field at nesting depth zero.
    pub const SPEC_END: TokenSet = TokenSet::new(&[Newline, Semicolon, Eof]);
}
