//! Recursive-descent grammar for Go declarations.

use rowan::TextRange;

use super::ast::{
    ChanDir, ConstSpec, FieldDecl, Ident, ImportSpec, InterfaceElem, Param, Signature, SourceFile,
    TypeExpr, TypeSpec,
};
use super::core::{PResult, Parser};
use super::lexer::unquote;
use super::syntax_kind::{SyntaxKind, TokenSet, token_sets};
use crate::diagnostics::DiagnosticKind;

use SyntaxKind::*;

/// Tokens after `[Ident` that mark a type parameter list rather than an array length.
const TYPE_PARAM_FOLLOW: TokenSet = TokenSet::new(&[
    Ident,
    Comma,
    Tilde,
    BracketOpen,
    KwInterface,
    KwMap,
    KwFunc,
    KwChan,
    KwStruct,
]);

/// One comma-separated entry of a parameter list before name grouping.
struct ParamEntry {
    name: Option<String>,
    bare: Option<String>,
    ty: TypeExpr,
    variadic: bool,
}

impl Parser<'_> {
    pub(super) fn parse_file(&mut self) -> PResult<SourceFile> {
        self.skip_separators();
        while self.currently_is(Garbage) && self.current_text() == "\u{FEFF}" {
            self.bump();
            self.skip_separators();
        }

        let package = if self.eat(KwPackage) {
            let package = self.ident("package name")?;
            self.end_spec(None)?;
            package
        } else {
            let at = TextRange::empty(self.current_span().start());
            self.diagnostics
                .report(DiagnosticKind::MissingPackage, self.span(at))
                .emit();
            Ident::new("", at)
        };

        let mut file = SourceFile {
            source: self.source_id,
            package,
            imports: Vec::new(),
            types: Vec::new(),
            consts: Vec::new(),
        };

        loop {
            self.skip_separators();
            match self.current() {
                Eof => break,
                KwImport => self.parse_import_decl(&mut file.imports)?,
                KwType => self.parse_type_decl(&mut file.types)?,
                KwConst => self.parse_const_decl(&mut file.consts)?,
                _ => {
                    self.bump();
                    self.skip_spec(None);
                }
            }
        }

        Ok(file)
    }

    fn ident(&mut self, what: &str) -> PResult<Ident> {
        let token = self.expect(Ident, what)?;
        Ok(Ident::new(self.text(&token), token.span))
    }

    /// Consumes the terminator of a spec. A pending group closer is left in place.
    fn end_spec(&mut self, closer: Option<SyntaxKind>) -> PResult<()> {
        match self.current() {
            Newline | Semicolon => {
                self.bump();
                Ok(())
            }
            Eof => Ok(()),
            kind if Some(kind) == closer => Ok(()),
            _ => Err(self.error("expected end of declaration")),
        }
    }

    /// Runs `spec` once, or for each entry of a parenthesized group.
    fn parse_group(
        &mut self,
        mut spec: impl FnMut(&mut Self, Option<SyntaxKind>) -> PResult<()>,
    ) -> PResult<()> {
        if !self.eat(ParenOpen) {
            spec(self, None)?;
            return self.end_spec(None);
        }

        loop {
            self.skip_separators();
            match self.current() {
                ParenClose => {
                    self.bump();
                    return self.end_spec(None);
                }
                Eof => return Err(self.error("expected `)`")),
                _ => {
                    spec(self, Some(ParenClose))?;
                    self.end_spec(Some(ParenClose))?;
                }
            }
        }
    }

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> PResult<()> {
        self.bump();
        self.parse_group(|p, _| {
            let start = p.current_span().start();
            let alias = match p.current() {
                Ident | Dot => Some(p.bump()),
                _ => None,
            }
            .map(|t| p.text(&t).to_string());

            if !matches!(p.current(), StringLit | RawStringLit) {
                return Err(p.error("expected import path"));
            }
            let token = p.bump();
            let Some(path) = unquote(p.text(&token)) else {
                return Err(p.error("malformed import path"));
            };
            imports.push(ImportSpec {
                alias,
                path,
                range: TextRange::new(start, token.span.end()),
            });
            Ok(())
        })
    }

    fn parse_type_decl(&mut self, types: &mut Vec<TypeSpec>) -> PResult<()> {
        self.skip_trivia();
        let decl_doc = self.doc_before(self.pos);
        self.bump();
        let grouped = self.nth(0) == ParenOpen;

        self.parse_group(|p, closer| {
            p.skip_trivia();
            let doc = if grouped {
                p.doc_before(p.pos)
            } else {
                decl_doc.clone()
            };
            p.parse_type_spec(doc, closer, types)
        })
    }

    fn parse_type_spec(
        &mut self,
        doc: Option<String>,
        closer: Option<SyntaxKind>,
        types: &mut Vec<TypeSpec>,
    ) -> PResult<()> {
        let name = self.ident("type name")?;

        if self.currently_is(BracketOpen)
            && self.nth(1) == Ident
            && TYPE_PARAM_FOLLOW.contains(self.nth(2))
        {
            self.diagnostics
                .report(DiagnosticKind::UnsupportedSyntax, self.span(name.range))
                .message(format!("generic type `{}`", name.text))
                .emit();
            self.skip_spec(closer);
            return Ok(());
        }

        let is_alias = self.eat(Equals);
        let ty = self.parse_type()?;
        types.push(TypeSpec {
            name,
            is_alias,
            ty,
            doc,
        });
        Ok(())
    }

    fn parse_const_decl(&mut self, consts: &mut Vec<ConstSpec>) -> PResult<()> {
        self.bump();
        self.parse_group(|p, closer| {
            let ends = |kind: SyntaxKind| token_sets::SPEC_END.contains(kind) || Some(kind) == closer;
            let is_literal = |kind: SyntaxKind| matches!(kind, StringLit | RawStringLit);

            // `Name Type = "lit"` or `Name = Type("lit")`
            let typed = p.nth(0) == Ident
                && p.nth(1) == Ident
                && p.nth(2) == Equals
                && is_literal(p.nth(3))
                && ends(p.nth(4));
            let converted = !typed
                && p.nth(0) == Ident
                && p.nth(1) == Equals
                && p.nth(2) == Ident
                && p.nth(3) == ParenOpen
                && is_literal(p.nth(4))
                && p.nth(5) == ParenClose
                && ends(p.nth(6));

            if !typed && !converted {
                p.skip_spec(closer);
                return Ok(());
            }

            let name = p.ident("constant name")?;
            let (type_token, literal) = if typed {
                let type_token = p.bump();
                p.bump();
                (type_token, p.bump())
            } else {
                p.bump();
                let type_token = p.bump();
                p.bump();
                let literal = p.bump();
                p.bump();
                (type_token, literal)
            };
            let Some(value) = unquote(p.text(&literal)) else {
                return Err(p.error("malformed string literal"));
            };
            consts.push(ConstSpec {
                name,
                type_name: p.text(&type_token).to_string(),
                value,
            });
            Ok(())
        })
    }

    pub(super) fn parse_type(&mut self) -> PResult<TypeExpr> {
        self.enter()?;
        let ty = self.parse_type_inner();
        self.leave();
        ty
    }

    fn parse_type_inner(&mut self) -> PResult<TypeExpr> {
        match self.current() {
            Ident => self.parse_type_name(),
            Star => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            BracketOpen => {
                self.bump();
                if self.eat(BracketClose) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.array_len()?;
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            KwMap => {
                self.bump();
                self.expect(BracketOpen, "`[` after `map`")?;
                let key = self.parse_type()?;
                self.expect(BracketClose, "`]`")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            KwChan => {
                self.bump();
                let dir = if self.eat(Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Arrow => {
                self.bump();
                self.expect(KwChan, "`chan` after `<-`")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            KwFunc => {
                self.bump();
                Ok(TypeExpr::Func(self.parse_signature()?))
            }
            KwStruct => {
                self.bump();
                Ok(TypeExpr::Struct(self.parse_struct_body()?))
            }
            KwInterface => {
                self.bump();
                Ok(TypeExpr::Interface(self.parse_interface_body()?))
            }
            ParenOpen => {
                self.bump();
                self.skip_newlines();
                let inner = self.parse_type()?;
                self.skip_newlines();
                self.expect(ParenClose, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.error("expected type")),
        }
    }

    fn parse_type_name(&mut self) -> PResult<TypeExpr> {
        let first = self.ident("type name")?;
        let (qualifier, name) = if self.eat(Dot) {
            let second = self.ident("type name after `.`")?;
            (Some(first.text), second)
        } else {
            (None, first.clone())
        };
        let range = TextRange::new(first.range.start(), name.range.end());

        let mut args = Vec::new();
        if self.eat(BracketOpen) {
            loop {
                self.skip_newlines();
                args.push(self.parse_type()?);
                self.skip_newlines();
                if !self.eat(Comma) {
                    break;
                }
            }
            self.expect(BracketClose, "`]`")?;
        }

        Ok(TypeExpr::Name {
            qualifier,
            name: name.text,
            args,
            range,
        })
    }

    /// Raw source text of an array length, up to the matching `]`.
    fn array_len(&mut self) -> PResult<String> {
        let start = self.current_span().start();
        let mut depth = 0usize;
        loop {
            match self.current() {
                Eof => return Err(self.error("expected `]`")),
                BracketOpen => depth += 1,
                BracketClose if depth == 0 => break,
                BracketClose => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        let end = self.last_end();
        self.bump();
        Ok(self.source[TextRange::new(start, end.max(start))].trim().to_string())
    }

    fn parse_signature(&mut self) -> PResult<Signature> {
        let params = self.parse_params()?;
        let results = match self.current() {
            ParenOpen => self.parse_params()?,
            kind if token_sets::TYPE_FIRST.contains(kind) => vec![Param {
                name: None,
                ty: self.parse_type()?,
                variadic: false,
            }],
            _ => Vec::new(),
        };
        Ok(Signature { params, results })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(ParenOpen, "`(`")?;
        let mut entries: Vec<ParamEntry> = Vec::new();

        loop {
            self.skip_newlines();
            if self.eat(ParenClose) {
                break;
            }
            entries.push(self.parse_param_entry()?);
            self.skip_newlines();
            if !self.eat(Comma) {
                self.skip_newlines();
                self.expect(ParenClose, "`,` or `)` in parameter list")?;
                break;
            }
        }

        // `(a, b int)` groups bare names with the next type; `(int, string)` has no names.
        if entries.iter().any(|e| e.name.is_some()) {
            let mut carry: Option<(TypeExpr, bool)> = None;
            for entry in entries.iter_mut().rev() {
                match entry.bare.take() {
                    Some(bare) if entry.name.is_none() => {
                        entry.name = Some(bare);
                        if let Some((ty, variadic)) = &carry {
                            entry.ty = ty.clone();
                            entry.variadic = *variadic;
                        }
                    }
                    _ => carry = Some((entry.ty.clone(), entry.variadic)),
                }
            }
        }

        Ok(entries
            .into_iter()
            .map(|e| Param {
                name: e.name,
                ty: e.ty,
                variadic: e.variadic,
            })
            .collect())
    }

    fn parse_param_entry(&mut self) -> PResult<ParamEntry> {
        if self.currently_is(Ident) {
            match self.nth(1) {
                Comma | ParenClose | Newline => {
                    let ty = self.parse_type_name()?;
                    let bare = ty.as_name().map(|(_, name)| name.to_string());
                    return Ok(ParamEntry {
                        name: None,
                        bare,
                        ty,
                        variadic: false,
                    });
                }
                Dot => {}
                _ => {
                    let name = self.ident("parameter name")?;
                    let variadic = self.eat(Ellipsis);
                    return Ok(ParamEntry {
                        name: Some(name.text),
                        bare: None,
                        ty: self.parse_type()?,
                        variadic,
                    });
                }
            }
        }

        let variadic = self.eat(Ellipsis);
        Ok(ParamEntry {
            name: None,
            bare: None,
            ty: self.parse_type()?,
            variadic,
        })
    }

    fn parse_struct_body(&mut self) -> PResult<Vec<FieldDecl>> {
        self.expect(BraceOpen, "`{` after `struct`")?;
        let mut fields = Vec::new();

        loop {
            self.skip_separators();
            match self.current() {
                BraceClose => {
                    self.bump();
                    return Ok(fields);
                }
                Eof => return Err(self.error("expected `}`")),
                _ => {}
            }

            fields.push(self.parse_field_decl()?);

            match self.current() {
                Newline | Semicolon => {
                    self.bump();
                }
                BraceClose => {}
                _ => return Err(self.error("expected end of field")),
            }
        }
    }

    fn parse_field_decl(&mut self) -> PResult<FieldDecl> {
        self.skip_trivia();
        let doc = self.doc_before(self.pos);
        let start = self.current_span().start();

        let (names, ty) = match self.current() {
            Star => {
                self.bump();
                (Vec::new(), TypeExpr::Pointer(Box::new(self.parse_type_name()?)))
            }
            Ident => match self.nth(1) {
                Dot | Newline | Semicolon | BraceClose | StringLit | RawStringLit | Eof => {
                    (Vec::new(), self.parse_type_name()?)
                }
                _ => {
                    let mut names = vec![self.ident("field name")?];
                    while self.eat(Comma) {
                        self.skip_newlines();
                        names.push(self.ident("field name")?);
                    }
                    (names, self.parse_type()?)
                }
            },
            _ => return Err(self.error("expected field")),
        };

        let tag = if matches!(self.current(), StringLit | RawStringLit) {
            let token = self.bump();
            match unquote(self.text(&token)) {
                Some(tag) => Some(tag),
                None => return Err(self.error("malformed struct tag")),
            }
        } else {
            None
        };

        Ok(FieldDecl {
            names,
            ty,
            tag,
            doc,
            range: TextRange::new(start, self.last_end()),
        })
    }

    fn parse_interface_body(&mut self) -> PResult<Vec<InterfaceElem>> {
        self.expect(BraceOpen, "`{` after `interface`")?;
        let mut elems = Vec::new();

        loop {
            self.skip_separators();
            match self.current() {
                BraceClose => {
                    self.bump();
                    return Ok(elems);
                }
                Eof => return Err(self.error("expected `}`")),
                _ => {}
            }

            self.skip_trivia();
            let doc = self.doc_before(self.pos);
            let elem = if self.currently_is(Ident) && self.nth(1) == ParenOpen {
                let name = self.ident("method name")?;
                InterfaceElem::Method {
                    name,
                    signature: self.parse_signature()?,
                    doc,
                }
            } else {
                self.parse_type_terms()?
            };
            elems.push(elem);

            match self.current() {
                Newline | Semicolon => {
                    self.bump();
                }
                BraceClose => {}
                _ => return Err(self.error("expected end of interface element")),
            }
        }
    }

    fn parse_type_terms(&mut self) -> PResult<InterfaceElem> {
        let mut terms = Vec::new();
        let mut approximate = false;
        loop {
            approximate |= self.eat(Tilde);
            terms.push(self.parse_type()?);
            if !self.eat(Pipe) {
                break;
            }
            self.skip_newlines();
        }

        if terms.len() == 1 && !approximate {
            return Ok(InterfaceElem::Embedded(terms.remove(0)));
        }
        Ok(InterfaceElem::TypeSet(terms))
    }
}
