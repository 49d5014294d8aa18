//! Resolved type model.
//!
//! Named references are stored by `DeclId` and never inlined, so cyclic and
//! self-referential declarations need no special handling downstream.

use super::symbol_table::{DeclId, PackageId, SourcePackage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Number,
    String,
    /// `[]byte`, base64 text on the wire.
    Bytes,
    /// Timestamps, RFC 3339 text on the wire.
    Temporal,
    Any,
}

/// Key kinds JSON objects can be keyed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    String,
    Number,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeRef {
    Primitive(Primitive),
    Named(DeclId),
    /// Literal TypeScript from a configured override.
    Verbatim(String),
    /// Pointer indirection: the value may be null.
    Optional(Box<TypeRef>),
    Repeated(Box<TypeRef>),
    Keyed {
        key: KeyKind,
        value: Box<TypeRef>,
    },
    /// Anonymous struct.
    Object(Vec<ResolvedField>),
}

impl TypeRef {
    pub const ANY: TypeRef = TypeRef::Primitive(Primitive::Any);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    /// Wire name.
    pub name: String,
    pub ty: TypeRef,
    /// `omitempty`: the key may be absent.
    pub omit_empty: bool,
    pub doc: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParam {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub variadic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMethod {
    pub name: String,
    pub params: Vec<ResolvedParam>,
    pub results: Vec<TypeRef>,
    pub doc: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclBody {
    /// Struct fields after embedding is flattened.
    Interface(Vec<ResolvedField>),
    Alias(TypeRef),
    /// String literal union from typed constants.
    Union(Vec<String>),
    Contract(Vec<ResolvedMethod>),
}

#[derive(Clone, Debug)]
pub struct ResolvedDecl {
    pub id: DeclId,
    pub package: PackageId,
    pub name: String,
    pub doc: Option<String>,
    pub body: DeclBody,
}

/// Every declaration of the run with fully resolved bodies, indexed by `DeclId`.
#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub packages: Vec<SourcePackage>,
    pub decls: Vec<ResolvedDecl>,
}

impl ResolvedModel {
    pub fn decl(&self, id: DeclId) -> &ResolvedDecl {
        &self.decls[id.index()]
    }

    pub fn package(&self, id: PackageId) -> &SourcePackage {
        &self.packages[id.index()]
    }

    /// Stable emission order: package display path, then declaration name.
    pub fn emission_order(&self) -> Vec<DeclId> {
        let mut order: Vec<DeclId> = self.decls.iter().map(|d| d.id).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (self.decl(a), self.decl(b));
            self.package(a.package)
                .display_path
                .cmp(&self.package(b.package).display_path)
                .then(a.package.cmp(&b.package))
                .then(a.name.cmp(&b.name))
        });
        order
    }

    /// Declarations of one package in emission order.
    pub fn package_decls(&self, package: PackageId) -> Vec<DeclId> {
        self.emission_order()
            .into_iter()
            .filter(|&id| self.decl(id).package == package)
            .collect()
    }
}
