//! Symbol table: the run-wide registry of packages and type declarations.
//!
//! Built once, single-threaded, after every file has been parsed:
//! 1. Register packages in scan order (already sorted by display path)
//! 2. Register each file's type specs under `(package, name)`, rejecting duplicates
//! 3. Match each file's imports against scanned packages and record import edges

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::SourceFile;
use crate::parser::ast::{TypeExpr, TypeSpec};
use crate::scan::ScanResult;
use crate::source_map::{SourceId, SourceMap, Span};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PackageId(u32);

impl PackageId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeclId(u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directory-scoped Go package.
#[derive(Clone, Debug)]
pub struct SourcePackage {
    pub id: PackageId,
    /// Identifier from the `package` clause, or the directory name when no
    /// file has one.
    pub name: String,
    pub display_path: String,
    pub root: usize,
    pub rel_dir: PathBuf,
    pub import_path: Option<String>,
    /// Scanned packages imported by any file of this package.
    pub imports: BTreeSet<PackageId>,
    /// Typed string constants: type name to values in source order.
    pub consts: IndexMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclKind {
    Composite,
    Alias,
    Contract,
}

#[derive(Clone, Debug)]
pub struct Declaration {
    pub id: DeclId,
    pub package: PackageId,
    pub file: FileId,
    pub name: String,
    pub kind: DeclKind,
    pub spec: TypeSpec,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ImportEntry {
    /// Name the file refers to the package by; `.` for dot imports.
    pub name: String,
    pub path: String,
    pub package: Option<PackageId>,
}

/// Per-file lookup scope.
#[derive(Clone, Debug)]
pub struct FileScope {
    pub source: SourceId,
    pub package: PackageId,
    pub imports: Vec<ImportEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    packages: Vec<SourcePackage>,
    decls: Vec<Declaration>,
    index: IndexMap<(PackageId, String), DeclId>,
    files: Vec<FileScope>,
}

impl SymbolTable {
    /// Builds the registry from parsed files given in scan order.
    ///
    /// Duplicate identities are reported as errors; the caller aborts on them.
    pub fn build(
        scan: &ScanResult,
        parsed: Vec<(usize, SourceFile)>,
        sources: &SourceMap,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut table = Self {
            packages: scan
                .packages
                .iter()
                .enumerate()
                .map(|(idx, pkg)| SourcePackage {
                    id: PackageId(idx as u32),
                    name: String::new(),
                    display_path: pkg.display_path.clone(),
                    root: pkg.root,
                    rel_dir: pkg.rel_dir.clone(),
                    import_path: pkg.import_path.clone(),
                    imports: BTreeSet::new(),
                    consts: IndexMap::new(),
                })
                .collect(),
            ..Self::default()
        };

        let mut raw_imports = Vec::with_capacity(parsed.len());
        for (file_idx, file) in parsed {
            let package = PackageId(scan.files[file_idx].package as u32);
            let file_id = FileId(table.files.len() as u32);
            table.register_package_name(package, &file, diagnostics);

            for spec in file.types {
                table.register_decl(package, file_id, file.source, spec, sources, diagnostics);
            }

            let consts = &mut table.packages[package.index()].consts;
            for c in file.consts {
                consts.entry(c.type_name).or_default().push(c.value);
            }

            raw_imports.push(file.imports);
            table.files.push(FileScope {
                source: file.source,
                package,
                imports: Vec::new(),
            });
        }

        for pkg in &mut table.packages {
            if pkg.name.is_empty() {
                let path = pkg.import_path.as_deref().unwrap_or(&pkg.display_path);
                pkg.name = go2dts_core::utils::default_import_name(path);
            }
        }

        for (file_idx, imports) in raw_imports.into_iter().enumerate() {
            let owner = table.files[file_idx].package;
            let entries: Vec<ImportEntry> = imports
                .into_iter()
                .filter(|spec| !spec.is_blank())
                .map(|spec| {
                    let package = table.match_import(&spec.path);
                    if let Some(target) = package.filter(|&p| p != owner) {
                        table.packages[owner.index()].imports.insert(target);
                    }
                    ImportEntry {
                        name: spec
                            .alias
                            .unwrap_or_else(|| table.default_import_name(&spec.path, package)),
                        path: spec.path,
                        package,
                    }
                })
                .collect();
            table.files[file_idx].imports = entries;
        }

        tracing::debug!(
            packages = table.packages.len(),
            declarations = table.decls.len(),
            "symbol table built"
        );
        table
    }

    fn register_package_name(
        &mut self,
        package: PackageId,
        file: &SourceFile,
        diagnostics: &mut Diagnostics,
    ) {
        if file.package.text.is_empty() {
            return;
        }
        let pkg = &mut self.packages[package.index()];
        if pkg.name.is_empty() {
            pkg.name = file.package.text.clone();
        } else if pkg.name != file.package.text {
            diagnostics
                .report(DiagnosticKind::PackageNameMismatch, file.span(file.package.range))
                .message(format!(
                    "`{}` declares package `{}`, expected `{}`",
                    pkg.display_path, file.package.text, pkg.name
                ))
                .emit();
        }
    }

    fn register_decl(
        &mut self,
        package: PackageId,
        file: FileId,
        source: SourceId,
        spec: TypeSpec,
        sources: &SourceMap,
        diagnostics: &mut Diagnostics,
    ) {
        let span = Span::new(source, spec.name.range);
        let key = (package, spec.name.text.clone());

        if let Some(&existing) = self.index.get(&key) {
            let first = self.decls[existing.index()].span;
            diagnostics
                .report(DiagnosticKind::DuplicateType, span)
                .message(format!(
                    "`{}` in package `{}`: {} and {}",
                    spec.name.text,
                    self.packages[package.index()].display_path,
                    location(sources, first),
                    location(sources, span),
                ))
                .related_to("first declared here", first)
                .emit();
            return;
        }

        let kind = match &spec.ty {
            TypeExpr::Struct(_) => DeclKind::Composite,
            TypeExpr::Interface(_) => DeclKind::Contract,
            _ => DeclKind::Alias,
        };
        let id = DeclId(self.decls.len() as u32);
        self.index.insert(key, id);
        self.decls.push(Declaration {
            id,
            package,
            file,
            name: spec.name.text.clone(),
            kind,
            spec,
            span,
        });
    }

    /// Finds the scanned package for a Go import path.
    ///
    /// Exact `go.mod`-derived import paths win; otherwise a package without a
    /// known import path matches when its display path (or, failing that,
    /// its root-relative directory) is a unique suffix of the import path.
    fn match_import(&self, path: &str) -> Option<PackageId> {
        if let Some(pkg) = self
            .packages
            .iter()
            .find(|p| p.import_path.as_deref() == Some(path))
        {
            return Some(pkg.id);
        }

        let unknown = || self.packages.iter().filter(|p| p.import_path.is_none());
        let unique = |candidates: Vec<&SourcePackage>| match candidates.as_slice() {
            [single] => Some(single.id),
            _ => None,
        };

        let by_display = unknown()
            .filter(|p| is_path_suffix(path, &p.display_path))
            .collect();
        if let Some(id) = unique(by_display) {
            return Some(id);
        }

        let by_rel = unknown()
            .filter(|p| {
                let rel = crate::scan::slash_path(&p.rel_dir);
                !rel.is_empty() && is_path_suffix(path, &rel)
            })
            .collect();
        unique(by_rel)
    }

    fn default_import_name(&self, path: &str, package: Option<PackageId>) -> String {
        match package {
            Some(id) if !self.packages[id.index()].name.is_empty() => {
                self.packages[id.index()].name.clone()
            }
            _ => go2dts_core::utils::default_import_name(path),
        }
    }

    pub fn packages(&self) -> &[SourcePackage] {
        &self.packages
    }

    pub fn package(&self, id: PackageId) -> &SourcePackage {
        &self.packages[id.index()]
    }

    pub fn decls(&self) -> &[Declaration] {
        &self.decls
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn file(&self, id: FileId) -> &FileScope {
        &self.files[id.index()]
    }

    /// Look up a declaration by identity.
    pub fn lookup(&self, package: PackageId, name: &str) -> Option<DeclId> {
        self.index.get(&(package, name.to_owned())).copied()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

fn is_path_suffix(path: &str, suffix: &str) -> bool {
    path == suffix
        || path
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('/'))
}

/// `path:line:col` for a span.
pub fn location(sources: &SourceMap, span: Span) -> String {
    let path = sources.path(span.source).unwrap_or("<unknown>");
    match sources.line_col(span.source, span.range.start()) {
        Some((line, col)) => format!("{path}:{line}:{col}"),
        None => path.to_string(),
    }
}
