//! Input enumeration: walks each root, filters Go sources, and groups them
//! into directory-scoped packages.
//!
//! The walk is sorted at every level, so package and file order (and with it
//! every `SourceId`) is stable between runs.


use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", "node_modules"];

#[derive(Debug, Clone)]
pub struct InputRoot {
    pub path: PathBuf,
    /// Unique directory name used in display paths and multi-root tree output.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ScannedPackage {
    pub root: usize,
    pub dir: PathBuf,
    /// Directory relative to its root; empty for the root itself.
    pub rel_dir: PathBuf,
    /// `<root label>/<rel dir>`
    pub display_path: String,
    /// Go import path derived from the nearest `go.mod`.
    pub import_path: Option<String>,
    /// Indices into `ScanResult::files`.
    pub files: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub package: usize,
}

impl ScannedFile {
    pub fn display(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub roots: Vec<InputRoot>,
    pub packages: Vec<ScannedPackage>,
    pub files: Vec<ScannedFile>,
    pub diagnostics: Diagnostics,
}

/// Enumerates Go source files under `roots`.
///
/// Missing roots are recorded as errors and nothing else is scanned; the
/// caller aborts on `diagnostics.has_errors()`.
pub fn scan(roots: &[PathBuf], config: &Config) -> ScanResult {
    let mut result = ScanResult::default();

    for root in roots {
        if !root.exists() {
            result
                .diagnostics
                .report_path(DiagnosticKind::InputNotFound, root.display().to_string())
                .message(root.display().to_string())
                .emit();
        }
    }
    if result.diagnostics.has_errors() {
        return result;
    }

    let mut labels: Vec<String> = Vec::new();
    let mut found: Vec<(usize, PathBuf, PathBuf, Vec<PathBuf>)> = Vec::new();

    for (idx, root) in roots.iter().enumerate() {
        let label = unique_label(root_label(root), &labels);
        labels.push(label.clone());
        result.roots.push(InputRoot {
            path: root.clone(),
            label,
        });

        if root.is_file() {
            if is_source_file(root, config) {
                found.push((idx, parent_dir(root), PathBuf::new(), vec![root.clone()]));
            }
            continue;
        }

        walk(
            root,
            Path::new(""),
            idx,
            config,
            &mut found,
            &mut result.diagnostics,
        );
    }

    let mut modules = ModuleCache::default();
    let mut packages: Vec<(ScannedPackage, Vec<PathBuf>)> = found
        .into_iter()
        .map(|(root, dir, rel_dir, files)| {
            let display_path = display_path(&result.roots[root].label, &rel_dir);
            let import_path = modules.import_path(&dir);
            let package = ScannedPackage {
                root,
                dir,
                rel_dir,
                display_path,
                import_path,
                files: Vec::new(),
            };
            (package, files)
        })
        .collect();
    packages.sort_by(|(a, _), (b, _)| {
        a.display_path
            .cmp(&b.display_path)
            .then(a.root.cmp(&b.root))
    });

    for (pkg_idx, (mut package, files)) in packages.into_iter().enumerate() {
        for path in files {
            package.files.push(result.files.len());
            result.files.push(ScannedFile {
                path,
                package: pkg_idx,
            });
        }
        result.packages.push(package);
    }

    tracing::debug!(
        roots = result.roots.len(),
        packages = result.packages.len(),
        files = result.files.len(),
        "scan finished"
    );
    result
}

fn walk(
    dir: &Path,
    rel: &Path,
    root: usize,
    config: &Config,
    found: &mut Vec<(usize, PathBuf, PathBuf, Vec<PathBuf>)>,
    diagnostics: &mut Diagnostics,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            diagnostics
                .report_path(DiagnosticKind::FileRead, dir.display().to_string())
                .message(err.to_string())
                .emit();
            return;
        }
    };

    let mut entries: Vec<(String, PathBuf, bool)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            (
                entry.file_name().to_string_lossy().into_owned(),
                entry.path(),
                is_dir,
            )
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let files: Vec<PathBuf> = entries
        .iter()
        .filter(|(_, path, is_dir)| !is_dir && is_source_file(path, config))
        .map(|(_, path, _)| path.clone())
        .collect();
    if !files.is_empty() {
        tracing::trace!(dir = %dir.display(), files = files.len(), "package directory");
        found.push((root, dir.to_path_buf(), rel.to_path_buf(), files));
    }

    for (name, path, is_dir) in entries {
        if !is_dir || name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if SKIPPED_DIRS.contains(&name.as_str()) {
            continue;
        }
        walk(&path, &rel.join(&name), root, config, found, diagnostics);
    }
}

fn is_source_file(path: &Path, config: &Config) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !name.ends_with(".go") || name.starts_with('.') || name.starts_with('_') {
        return false;
    }
    !(config.skip_tests && name.ends_with("_test.go"))
}

fn parent_dir(file: &Path) -> PathBuf {
    file.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn root_label(root: &Path) -> String {
    let dir = if root.is_file() {
        parent_dir(root)
    } else {
        root.to_path_buf()
    };
    fs::canonicalize(&dir)
        .unwrap_or(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "root".to_string())
}

fn unique_label(base: String, taken: &[String]) -> String {
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|i| format!("{base}-{i}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Slash-separated relative path, independent of the host separator.
pub fn slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn display_path(label: &str, rel: &Path) -> String {
    let rel = slash_path(rel);
    if rel.is_empty() {
        label.to_string()
    } else {
        format!("{label}/{rel}")
    }
}

/// Memoized `go.mod` lookup per directory.
#[derive(Default)]
struct ModuleCache {
    modules: HashMap<PathBuf, Option<(PathBuf, String)>>,
}

impl ModuleCache {
    fn import_path(&mut self, dir: &Path) -> Option<String> {
        let dir = fs::canonicalize(dir).ok()?;
        let (module_root, module) = self.module_for(&dir)?;
        let rel = slash_path(dir.strip_prefix(&module_root).ok()?);
        if rel.is_empty() {
            Some(module)
        } else {
            Some(format!("{module}/{rel}"))
        }
    }

    fn module_for(&mut self, dir: &Path) -> Option<(PathBuf, String)> {
        if let Some(cached) = self.modules.get(dir) {
            return cached.clone();
        }
        let found = match fs::read_to_string(dir.join("go.mod")) {
            Ok(content) => module_name(&content).map(|name| (dir.to_path_buf(), name)),
            Err(_) => dir.parent().and_then(|parent| self.module_for(parent)),
        };
        self.modules.insert(dir.to_path_buf(), found.clone());
        found
    }
}

/// Extracts the module path from `go.mod` content.
pub fn module_name(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.split("//").next()?.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
