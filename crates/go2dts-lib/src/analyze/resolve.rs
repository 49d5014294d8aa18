//! Type resolver: turns raw type expressions into `TypeRef`s.
//!
//! Named types resolve by identity only; a referent's own fields are not
//! expanded, so recursive type graphs terminate without bookkeeping. The one
//! place fields are expanded is embedding, which is memoized per declaration
//! and guarded by a visiting stack.
//!
//! A result computed while the stack cut an embedding cycle below the
//! declaration's own stack position is partial for that declaration and is
//! not memoized.

use std::collections::{HashMap, HashSet};

use rowan::TextRange;

use go2dts_core::utils::is_exported;

use super::symbol_table::{DeclId, DeclKind, Declaration, FileId, PackageId, SymbolTable};
use super::types::{
    DeclBody, KeyKind, Primitive, ResolvedDecl, ResolvedField, ResolvedMethod, ResolvedModel,
    ResolvedParam, TypeRef,
};
use super::well_known;
use crate::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::JsonTag;
use crate::parser::ast::{FieldDecl, Ident, InterfaceElem, Signature, TypeExpr};
use crate::source_map::{SourceId, Span};

/// Alias chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: u32 = 32;

/// Lookup context: the file a type expression appears in.
#[derive(Clone, Copy, Debug)]
struct Scope {
    file: FileId,
    package: PackageId,
    source: SourceId,
    /// Fallback range for diagnostics on expressions without a name.
    range: TextRange,
}

enum Target {
    Decl(DeclId),
    Primitive(Primitive),
    Verbatim(String),
    /// Carries a hint explaining why.
    Unresolved(String),
}

/// Resolves every declaration in the table.
pub fn resolve(table: &SymbolTable, config: &Config, diagnostics: &mut Diagnostics) -> ResolvedModel {
    let mut resolver = Resolver {
        table,
        config,
        diagnostics,
        struct_cache: HashMap::new(),
        method_cache: HashMap::new(),
        visiting: Vec::new(),
        lowest_cut: NO_CUT,
    };

    let decls = table
        .decls()
        .iter()
        .map(|decl| resolver.resolve_decl(decl))
        .collect();

    ResolvedModel {
        packages: table.packages().to_vec(),
        decls,
    }
}

struct Resolver<'a> {
    table: &'a SymbolTable,
    config: &'a Config,
    diagnostics: &'a mut Diagnostics,
    struct_cache: HashMap<DeclId, Vec<(ResolvedField, u32)>>,
    method_cache: HashMap<DeclId, Vec<ResolvedMethod>>,
    visiting: Vec<DeclId>,
    /// Lowest stack position an embedding cycle was cut at during the
    /// current expansion.
    lowest_cut: usize,
}

const NO_CUT: usize = usize::MAX;

impl<'a> Resolver<'a> {
    fn resolve_decl(&mut self, decl: &'a Declaration) -> ResolvedDecl {
        let scope = decl_scope(decl);
        let body = match decl.kind {
            DeclKind::Composite => DeclBody::Interface(
                self.struct_fields(decl.id)
                    .into_iter()
                    .map(|(field, _)| field)
                    .collect(),
            ),
            DeclKind::Contract => {
                let methods = self.contract_methods(decl.id);
                if methods.is_empty() {
                    DeclBody::Alias(TypeRef::ANY)
                } else {
                    DeclBody::Contract(methods)
                }
            }
            DeclKind::Alias => {
                let ty = self.resolve_type(&decl.spec.ty, &scope);
                let values = self.table.package(decl.package).consts.get(&decl.name);
                match values {
                    Some(values)
                        if self.config.const_unions
                            && ty == TypeRef::Primitive(Primitive::String) =>
                    {
                        let mut seen = HashSet::new();
                        DeclBody::Union(
                            values
                                .iter()
                                .filter(|v| seen.insert(v.as_str()))
                                .cloned()
                                .collect(),
                        )
                    }
                    _ => DeclBody::Alias(ty),
                }
            }
        };

        ResolvedDecl {
            id: decl.id,
            package: decl.package,
            name: decl.name.clone(),
            doc: decl.spec.doc.clone(),
            body,
        }
    }

    fn lookup(&self, qualifier: Option<&str>, name: &str, scope: &Scope) -> Target {
        let table = self.table;
        let file = table.file(scope.file);

        let Some(qualifier) = qualifier else {
            if let Some(prim) = well_known::primitive(name) {
                return Target::Primitive(prim);
            }
            if let Some(path) = &table.package(scope.package).import_path
                && let Some(ts) = self.config.type_overrides.get(&format!("{path}.{name}"))
            {
                return Target::Verbatim(ts.clone());
            }
            if let Some(id) = table.lookup(scope.package, name) {
                return Target::Decl(id);
            }
            let dot_match = file
                .imports
                .iter()
                .filter(|import| import.name == ".")
                .filter_map(|import| import.package)
                .find_map(|pkg| table.lookup(pkg, name));
            if let Some(id) = dot_match {
                return Target::Decl(id);
            }
            return Target::Unresolved(format!(
                "no type `{name}` in package `{}`",
                table.package(scope.package).display_path
            ));
        };

        let Some(import) = file.imports.iter().find(|i| i.name == qualifier) else {
            return Target::Unresolved(format!("`{qualifier}` is not an imported package"));
        };
        if let Some(ts) = self
            .config
            .type_overrides
            .get(&format!("{}.{name}", import.path))
        {
            return Target::Verbatim(ts.clone());
        }
        if let Some(prim) = well_known::external(&import.path, name) {
            return Target::Primitive(prim);
        }
        match import.package {
            Some(pkg) => table.lookup(pkg, name).map_or_else(
                || {
                    Target::Unresolved(format!(
                        "no type `{name}` in package `{}`",
                        table.package(pkg).display_path
                    ))
                },
                Target::Decl,
            ),
            None => Target::Unresolved(format!("package `{}` was not scanned", import.path)),
        }
    }

    fn resolve_type(&mut self, expr: &TypeExpr, scope: &Scope) -> TypeRef {
        match expr {
            TypeExpr::Name {
                qualifier,
                name,
                range,
                ..
            } => match self.lookup(qualifier.as_deref(), name, scope) {
                Target::Decl(id) => TypeRef::Named(id),
                Target::Primitive(prim) => TypeRef::Primitive(prim),
                Target::Verbatim(ts) => TypeRef::Verbatim(ts),
                Target::Unresolved(hint) => {
                    self.diagnostics
                        .report(
                            DiagnosticKind::UnresolvedReference,
                            Span::new(scope.source, *range),
                        )
                        .message(expr.to_string())
                        .hint(hint)
                        .emit();
                    TypeRef::ANY
                }
            },
            TypeExpr::Pointer(inner) => match self.resolve_type(inner, scope) {
                optional @ TypeRef::Optional(_) => optional,
                ty => TypeRef::Optional(Box::new(ty)),
            },
            TypeExpr::Slice(inner) if is_byte(inner) => TypeRef::Primitive(Primitive::Bytes),
            TypeExpr::Slice(inner) | TypeExpr::Array { elem: inner, .. } => {
                TypeRef::Repeated(Box::new(self.resolve_type(inner, scope)))
            }
            TypeExpr::Map { key, value } => match self.key_kind(key, scope, 0) {
                Some(kind) => TypeRef::Keyed {
                    key: kind,
                    value: Box::new(self.resolve_type(value, scope)),
                },
                None => {
                    let range = key.range().unwrap_or(scope.range);
                    self.diagnostics
                        .report(
                            DiagnosticKind::UnsupportedKeyType,
                            Span::new(scope.source, range),
                        )
                        .message(key.to_string())
                        .emit();
                    TypeRef::ANY
                }
            },
            TypeExpr::Chan { .. } | TypeExpr::Func(_) | TypeExpr::Interface(_) => TypeRef::ANY,
            TypeExpr::Struct(fields) => TypeRef::Object(
                self.resolve_fields(fields, scope)
                    .into_iter()
                    .map(|(field, _)| field)
                    .collect(),
            ),
        }
    }

    /// Key kind for a map key type, following named types to their underlying type.
    fn key_kind(&self, expr: &TypeExpr, scope: &Scope, depth: u32) -> Option<KeyKind> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        let (qualifier, name) = expr.as_name()?;
        if qualifier.is_none() {
            if name == "string" {
                return Some(KeyKind::String);
            }
            if well_known::is_integer(name) {
                return Some(KeyKind::Number);
            }
        }

        match self.lookup(qualifier, name, scope) {
            // Text-marshaled types (UUIDs, timestamps) and overrides key by string.
            Target::Primitive(Primitive::String | Primitive::Temporal) | Target::Verbatim(_) => {
                Some(KeyKind::String)
            }
            Target::Decl(id) => {
                let decl = self.table.decl(id);
                if decl.kind != DeclKind::Alias {
                    return None;
                }
                self.key_kind(&decl.spec.ty, &decl_scope(decl), depth + 1)
            }
            Target::Primitive(_) | Target::Unresolved(_) => None,
        }
    }

    fn resolve_fields(&mut self, fields: &[FieldDecl], scope: &Scope) -> Vec<(ResolvedField, u32)> {
        let mut out: Vec<(ResolvedField, u32)> = Vec::new();

        for field in fields {
            let tag = JsonTag::from_tag(field.tag.as_deref());
            if tag.skip {
                continue;
            }
            let scope = Scope {
                range: field.range,
                ..*scope
            };

            if field.is_embedded() {
                let inner = match &field.ty {
                    TypeExpr::Pointer(inner) => inner.as_ref(),
                    ty => ty,
                };
                let Some((qualifier, name)) = inner.as_name() else {
                    continue;
                };

                if tag.name.is_none()
                    && let Some(target) = self.struct_referent(qualifier, name, &scope, 0)
                {
                    if !self.cut_if_visiting(target) {
                        out.extend(
                            self.struct_fields(target)
                                .into_iter()
                                .map(|(promoted, depth)| (promoted, depth + 1)),
                        );
                    }
                    continue;
                }

                if !is_exported(name) {
                    continue;
                }
                let ty = self.field_type(&field.ty, &tag, &scope);
                out.push((
                    ResolvedField {
                        name: tag.name.clone().unwrap_or_else(|| name.to_string()),
                        ty,
                        omit_empty: tag.omitempty,
                        doc: field.doc.clone(),
                    },
                    0,
                ));
                continue;
            }

            let exported: Vec<&Ident> = field
                .names
                .iter()
                .filter(|ident| is_exported(&ident.text))
                .collect();
            if exported.is_empty() {
                continue;
            }
            let ty = self.field_type(&field.ty, &tag, &scope);
            for ident in exported {
                out.push((
                    ResolvedField {
                        name: tag.name.clone().unwrap_or_else(|| ident.text.clone()),
                        ty: ty.clone(),
                        omit_empty: tag.omitempty,
                        doc: field.doc.clone(),
                    },
                    0,
                ));
            }
        }

        dominant(out, |field| &field.name)
    }

    fn field_type(&mut self, expr: &TypeExpr, tag: &JsonTag, scope: &Scope) -> TypeRef {
        let ty = self.resolve_type(expr, scope);
        if tag.as_string { stringified(ty) } else { ty }
    }

    /// The composite declaration an embedded name promotes fields from, if any.
    fn struct_referent(
        &self,
        qualifier: Option<&str>,
        name: &str,
        scope: &Scope,
        depth: u32,
    ) -> Option<DeclId> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        let Target::Decl(id) = self.lookup(qualifier, name, scope) else {
            return None;
        };
        let decl = self.table.decl(id);
        match decl.kind {
            DeclKind::Composite => Some(id),
            DeclKind::Alias => {
                let (qualifier, name) = decl.spec.ty.as_name()?;
                self.struct_referent(qualifier, name, &decl_scope(decl), depth + 1)
            }
            DeclKind::Contract => None,
        }
    }

    /// Flattened fields of a composite declaration, with promotion depth.
    fn struct_fields(&mut self, id: DeclId) -> Vec<(ResolvedField, u32)> {
        if let Some(cached) = self.struct_cache.get(&id) {
            return cached.clone();
        }

        let table = self.table;
        let decl = table.decl(id);
        let TypeExpr::Struct(fields) = &decl.spec.ty else {
            return Vec::new();
        };

        let (resolved, complete) =
            self.expanding(id, |this| this.resolve_fields(fields, &decl_scope(decl)));
        if complete {
            self.struct_cache.insert(id, resolved.clone());
        }
        resolved
    }

    /// Records a cycle cut when `target` is already being expanded.
    fn cut_if_visiting(&mut self, target: DeclId) -> bool {
        match self.visiting.iter().position(|&v| v == target) {
            Some(pos) => {
                self.lowest_cut = self.lowest_cut.min(pos);
                true
            }
            None => false,
        }
    }

    /// Runs `expand` with `id` on the visiting stack. The flag is false when a
    /// cycle was cut at an ancestor of `id`, leaving the result partial.
    fn expanding<T>(&mut self, id: DeclId, expand: impl FnOnce(&mut Self) -> T) -> (T, bool) {
        let pos = self.visiting.len();
        let outer_cut = std::mem::replace(&mut self.lowest_cut, NO_CUT);

        self.visiting.push(id);
        let result = expand(self);
        self.visiting.pop();

        let inner_cut = self.lowest_cut;
        self.lowest_cut = outer_cut.min(inner_cut);
        (result, inner_cut >= pos)
    }

    /// Exported methods of a contract declaration, embedded interfaces flattened.
    fn contract_methods(&mut self, id: DeclId) -> Vec<ResolvedMethod> {
        if let Some(cached) = self.method_cache.get(&id) {
            return cached.clone();
        }

        let table = self.table;
        let decl = table.decl(id);
        let TypeExpr::Interface(elems) = &decl.spec.ty else {
            return Vec::new();
        };
        let scope = decl_scope(decl);

        let (out, complete) = self.expanding(id, |this| this.collect_methods(elems, &scope));

        let methods: Vec<ResolvedMethod> = dominant(out, |method| &method.name)
            .into_iter()
            .map(|(method, _)| method)
            .collect();
        if complete {
            self.method_cache.insert(id, methods.clone());
        }
        methods
    }

    fn collect_methods(
        &mut self,
        elems: &[InterfaceElem],
        scope: &Scope,
    ) -> Vec<(ResolvedMethod, u32)> {
        let table = self.table;
        let mut out: Vec<(ResolvedMethod, u32)> = Vec::new();
        for elem in elems {
            match elem {
                InterfaceElem::Method {
                    name,
                    signature,
                    doc,
                } => {
                    if is_exported(&name.text) {
                        let method = self.resolve_method(&name.text, signature, doc, scope);
                        out.push((method, 0));
                    }
                }
                InterfaceElem::Embedded(ty) => match ty.as_name() {
                    Some((None, "error")) => out.push((error_method(), 1)),
                    Some((qualifier, name)) => match self.lookup(qualifier, name, scope) {
                        Target::Decl(other) if table.decl(other).kind == DeclKind::Contract => {
                            if !self.cut_if_visiting(other) {
                                out.extend(
                                    self.contract_methods(other)
                                        .into_iter()
                                        .map(|method| (method, 1)),
                                );
                            }
                        }
                        Target::Unresolved(hint) => {
                            let range = ty.range().unwrap_or(scope.range);
                            self.diagnostics
                                .report(
                                    DiagnosticKind::UnresolvedReference,
                                    Span::new(scope.source, range),
                                )
                                .message(ty.to_string())
                                .hint(hint)
                                .emit();
                        }
                        _ => {}
                    },
                    None => {}
                },
                InterfaceElem::TypeSet(_) => {}
            }
        }
        out
    }

    fn resolve_method(
        &mut self,
        name: &str,
        signature: &Signature,
        doc: &Option<String>,
        scope: &Scope,
    ) -> ResolvedMethod {
        let params = signature
            .params
            .iter()
            .map(|param| ResolvedParam {
                name: param.name.clone(),
                ty: self.resolve_type(&param.ty, scope),
                variadic: param.variadic,
            })
            .collect();
        let results = signature
            .results
            .iter()
            .map(|result| self.resolve_type(&result.ty, scope))
            .collect();
        ResolvedMethod {
            name: name.to_string(),
            params,
            results,
            doc: doc.clone(),
        }
    }
}

fn decl_scope(decl: &Declaration) -> Scope {
    Scope {
        file: decl.file,
        package: decl.package,
        source: decl.span.source,
        range: decl.span.range,
    }
}

fn is_byte(expr: &TypeExpr) -> bool {
    matches!(expr.as_name(), Some((None, "byte" | "uint8")))
}

/// `,string` tag option: scalars travel as JSON strings.
fn stringified(ty: TypeRef) -> TypeRef {
    match ty {
        TypeRef::Optional(inner) => TypeRef::Optional(Box::new(stringified(*inner))),
        TypeRef::Primitive(Primitive::Number | Primitive::Boolean) => {
            TypeRef::Primitive(Primitive::String)
        }
        other => other,
    }
}

fn error_method() -> ResolvedMethod {
    ResolvedMethod {
        name: "Error".to_string(),
        params: Vec::new(),
        results: vec![TypeRef::Primitive(Primitive::String)],
        doc: None,
    }
}

/// Applies Go's promotion rule: per name, the shallowest entry wins and the
/// first one wins among equals. Survivors keep their original order.
fn dominant<T>(items: Vec<(T, u32)>, name: impl Fn(&T) -> &String) -> Vec<(T, u32)> {
    let mut best: HashMap<String, (usize, u32)> = HashMap::new();
    for (idx, (item, depth)) in items.iter().enumerate() {
        match best.get(name(item)) {
            Some(&(_, best_depth)) if best_depth <= *depth => {}
            _ => {
                best.insert(name(item).clone(), (idx, *depth));
            }
        }
    }
    let winners: HashSet<usize> = best.values().map(|&(idx, _)| idx).collect();
    items
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| winners.contains(idx))
        .map(|(_, item)| item)
        .collect()
}
