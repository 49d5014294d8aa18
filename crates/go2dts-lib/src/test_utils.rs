//! Test utilities: in-memory pipeline runs over `(path, source)` fixtures.
//!
//! Paths are relative to a single root labelled `app`; each directory is a
//! package, exactly as the scanner would group them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::analyze::{self, ResolvedModel, SymbolTable};
use crate::diagnostics::Diagnostics;
use crate::parser;
use crate::scan::{InputRoot, ScanResult, ScannedFile, ScannedPackage, slash_path};
use crate::source_map::{SourceId, SourceMap};
use crate::typegen::typescript::{self, TreeLayout};
use crate::Config;

pub struct Analyzed {
    pub sources: SourceMap,
    pub table: SymbolTable,
    pub model: ResolvedModel,
    pub diagnostics: Diagnostics,
    pub root_labels: Vec<String>,
}

/// Scan result for in-memory fixtures.
pub fn fixture_scan(files: &[(&str, &str)]) -> ScanResult {
    let mut by_dir: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (path, _) in files {
        let dir = Path::new(path).parent().map(slash_path).unwrap_or_default();
        by_dir.entry(dir).or_default().push(*path);
    }

    let mut result = ScanResult {
        roots: vec![InputRoot {
            path: PathBuf::from("app"),
            label: "app".to_string(),
        }],
        ..ScanResult::default()
    };
    for (dir, mut paths) in by_dir {
        paths.sort_unstable();
        let package = result.packages.len();
        let files: Vec<usize> = (result.files.len()..result.files.len() + paths.len()).collect();
        result.files.extend(paths.iter().map(|p| ScannedFile {
            path: Path::new("app").join(p),
            package,
        }));
        result.packages.push(ScannedPackage {
            root: 0,
            dir: Path::new("app").join(&dir),
            rel_dir: PathBuf::from(&dir),
            display_path: if dir.is_empty() {
                "app".to_string()
            } else {
                format!("app/{dir}")
            },
            import_path: None,
            files,
        });
    }
    result
}

/// Parse, build the symbol table, and resolve. Resolution is skipped when
/// the table reported errors.
pub fn analyze_with(files: &[(&str, &str)], config: &Config) -> Analyzed {
    let scan = fixture_scan(files);
    let contents: BTreeMap<PathBuf, &str> = files
        .iter()
        .map(|(path, src)| (Path::new("app").join(path), *src))
        .collect();

    let mut sources = SourceMap::new();
    let mut diagnostics = Diagnostics::new();
    let mut parsed = Vec::new();
    for (idx, file) in scan.files.iter().enumerate() {
        let content = contents[&file.path];
        sources.add_file(&slash_path(&file.path), content);
        let result = parser::parse(content, SourceId::from_index(idx));
        diagnostics.extend(result.diagnostics);
        if let Some(parsed_file) = result.file {
            parsed.push((idx, parsed_file));
        }
    }

    let table = SymbolTable::build(&scan, parsed, &sources, &mut diagnostics);
    let model = if diagnostics.has_errors() {
        ResolvedModel::default()
    } else {
        analyze::resolve(&table, config, &mut diagnostics)
    };

    Analyzed {
        sources,
        table,
        model,
        diagnostics,
        root_labels: scan.roots.iter().map(|r| r.label.clone()).collect(),
    }
}

pub fn analyze_str(files: &[(&str, &str)]) -> Analyzed {
    analyze_with(files, &Config::new())
}

/// Merged-mode output and diagnostics for the fixtures.
pub fn generate_str(files: &[(&str, &str)]) -> (String, Diagnostics) {
    generate_str_with(files, &Config::new())
}

pub fn generate_str_with(files: &[(&str, &str)], config: &Config) -> (String, Diagnostics) {
    let analyzed = analyze_with(files, config);
    let output = typescript::emit_merged(&analyzed.model, config);
    (output, analyzed.diagnostics)
}

/// Tree-mode modules for the fixtures: `(relative file, contents)`.
pub fn generate_tree_str(files: &[(&str, &str)]) -> Vec<(String, String)> {
    let config = Config::new();
    let analyzed = analyze_with(files, &config);
    let layout = TreeLayout::new(&analyzed.model, &analyzed.root_labels);
    typescript::emit_tree(&analyzed.model, &layout, &config)
}
