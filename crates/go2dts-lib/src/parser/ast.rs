//! Declaration-level syntax tree for one Go source file.
//!
//! Only what type generation needs is kept: the package clause, imports,
//! type specs, and string-valued typed constants.

use std::fmt;

use rowan::TextRange;

use crate::source_map::{SourceId, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub range: TextRange,
}

impl Ident {
    pub fn new(text: impl Into<String>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: SourceId,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
    pub consts: Vec<ConstSpec>,
}

impl SourceFile {
    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.source, range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name: an identifier, `_`, or `.`.
    pub alias: Option<String>,
    pub path: String,
    pub range: TextRange,
}

impl ImportSpec {
    pub fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }

    pub fn is_blank(&self) -> bool {
        self.alias.as_deref() == Some("_")
    }
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B` rather than `type A B`.
    pub is_alias: bool,
    pub ty: TypeExpr,
    pub doc: Option<String>,
}

/// `const Name Type = "value"`; other constant forms are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstSpec {
    pub name: Ident,
    pub type_name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Empty for embedded fields.
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// Decoded tag literal.
    pub tag: Option<String>,
    pub doc: Option<String>,
    pub range: TextRange,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum InterfaceElem {
    Method {
        name: Ident,
        signature: Signature,
        doc: Option<String>,
    },
    Embedded(TypeExpr),
    /// Type-set constraint terms (`~int | ~string`); only meaningful for generics.
    TypeSet(Vec<TypeExpr>),
}

#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone)]
pub enum TypeExpr {
    Name {
        qualifier: Option<String>,
        name: String,
        /// Generic instantiation arguments.
        args: Vec<TypeExpr>,
        range: TextRange,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func(Signature),
    Struct(Vec<FieldDecl>),
    Interface(Vec<InterfaceElem>),
}

impl TypeExpr {
    /// Bare and qualified names only; `*T` and the rest return `None`.
    pub fn as_name(&self) -> Option<(Option<&str>, &str)> {
        match self {
            TypeExpr::Name {
                qualifier, name, ..
            } => Some((qualifier.as_deref(), name.as_str())),
            _ => None,
        }
    }

    /// First name range found in this expression, for diagnostics.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            TypeExpr::Name { range, .. } => Some(*range),
            TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => inner.range(),
            TypeExpr::Array { elem, .. } | TypeExpr::Chan { elem, .. } => elem.range(),
            TypeExpr::Map { key, value } => key.range().or_else(|| value.range()),
            TypeExpr::Func(_) | TypeExpr::Struct(_) | TypeExpr::Interface(_) => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name {
                qualifier,
                name,
                args,
                ..
            } => {
                if let Some(q) = qualifier {
                    write!(f, "{q}.")?;
                }
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "[")?;
                    write_list(f, args)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(inner) => write!(f, "[]{inner}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func(sig) => write!(f, "func{sig}"),
            TypeExpr::Struct(fields) if fields.is_empty() => write!(f, "struct{{}}"),
            TypeExpr::Struct(fields) => {
                write!(f, "struct{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    let names: Vec<&str> = field.names.iter().map(|n| n.text.as_str()).collect();
                    if !names.is_empty() {
                        write!(f, "{} ", names.join(", "))?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                write!(f, " }}")
            }
            TypeExpr::Interface(elems) if elems.is_empty() => write!(f, "interface{{}}"),
            TypeExpr::Interface(elems) => {
                write!(f, "interface{{ ")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    match elem {
                        InterfaceElem::Method {
                            name, signature, ..
                        } => write!(f, "{}{signature}", name.text)?,
                        InterfaceElem::Embedded(ty) => write!(f, "{ty}")?,
                        InterfaceElem::TypeSet(terms) => {
                            for (j, term) in terms.iter().enumerate() {
                                if j > 0 {
                                    write!(f, " | ")?;
                                }
                                write!(f, "{term}")?;
                            }
                        }
                    }
                }
                write!(f, " }}")
            }
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_params(f, &self.params)?;
        write!(f, ")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_none() => write!(f, " {}", single.ty),
            results => {
                write!(f, " (")?;
                write_params(f, results)?;
                write!(f, ")")
            }
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if let Some(name) = &param.name {
            write!(f, "{name} ")?;
        }
        if param.variadic {
            write!(f, "...")?;
        }
        write!(f, "{}", param.ty)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
