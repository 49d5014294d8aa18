//! The `generate` entry point.
//!
//! Phase 1 reads and parses files on scoped worker threads; each task owns
//! its file and returns an immutable result. Phase 2 (symbol table, resolver,
//! emitter, writer) runs on the calling thread over the merged results.

use std::fs;
use std::path::PathBuf;

use crate::analyze::{self, SymbolTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::output::{self, Artifact, OutputTarget};
use crate::parser::{self, ParseResult};
use crate::scan::{self, ScanResult, ScannedFile};
use crate::source_map::{SourceId, SourceMap};
use crate::typegen::typescript::{self, TreeLayout};
use crate::{Config, Error, Result};

/// Outcome of a run: diagnostics plus the sources they point into.
#[derive(Debug, Default)]
pub struct Report {
    pub diagnostics: Diagnostics,
    pub sources: SourceMap,
    /// Rendered outputs; already written unless the target is stdout.
    pub artifacts: Vec<Artifact>,
}

impl Report {
    pub fn render_diagnostics(&self, colored: bool) -> String {
        self.diagnostics.render_colored(&self.sources, colored)
    }
}

enum Loaded {
    Unreadable(String),
    Generated,
    Parsed { content: String, result: ParseResult },
}

/// Generate TypeScript declarations for every Go package under `inputs`.
///
/// Warnings never fail the run. Missing roots, duplicate declarations, and
/// write failures return [`Error::Aborted`] carrying the full report.
pub fn generate(inputs: &[PathBuf], target: &OutputTarget, config: &Config) -> Result<Report> {
    if inputs.is_empty() {
        return Err(Error::NoInputs);
    }
    let _span = tracing::info_span!("generate", roots = inputs.len()).entered();

    let mut scan = scan::scan(inputs, config);
    let mut diagnostics = std::mem::take(&mut scan.diagnostics);
    if diagnostics.has_errors() {
        return Err(abort(diagnostics, SourceMap::new()));
    }
    tracing::debug!(
        files = scan.files.len(),
        packages = scan.packages.len(),
        "scanned inputs"
    );

    let loaded = load_files(&scan.files, config);

    let mut sources = SourceMap::new();
    let mut parsed = Vec::new();
    for (idx, (file, outcome)) in scan.files.iter().zip(loaded).enumerate() {
        let path = file.display();
        match outcome {
            Loaded::Unreadable(err) => {
                sources.add_file(&path, "");
                diagnostics
                    .report_path(DiagnosticKind::FileRead, path)
                    .message(err)
                    .emit();
            }
            Loaded::Generated => {
                sources.add_file(&path, "");
                tracing::debug!(path = %path, "skipped generated file");
            }
            Loaded::Parsed { content, result } => {
                sources.add_file(&path, &content);
                diagnostics.extend(result.diagnostics);
                if let Some(file) = result.file {
                    parsed.push((idx, file));
                }
            }
        }
    }
    tracing::debug!(parsed = parsed.len(), "parsed sources");

    let table = SymbolTable::build(&scan, parsed, &sources, &mut diagnostics);
    if diagnostics.has_errors() {
        return Err(abort(diagnostics, sources));
    }

    let model = analyze::resolve(&table, config, &mut diagnostics);
    let artifacts = render(&model, &scan, target, config);

    output::write_artifacts(&artifacts, &mut diagnostics);
    if diagnostics.has_errors() {
        return Err(abort(diagnostics, sources));
    }

    tracing::debug!(
        declarations = model.decls.len(),
        artifacts = artifacts.len(),
        warnings = diagnostics.warning_count(),
        "generation finished"
    );
    Ok(Report {
        diagnostics,
        sources,
        artifacts,
    })
}

fn render(
    model: &analyze::ResolvedModel,
    scan: &ScanResult,
    target: &OutputTarget,
    config: &Config,
) -> Vec<Artifact> {
    // ANSI codes only ever go to the terminal
    let plain = config.clone().colored(false);

    match target {
        OutputTarget::Stdout => vec![Artifact {
            path: None,
            contents: typescript::emit_merged(model, config),
        }],
        OutputTarget::File(path) => vec![Artifact {
            path: Some(path.clone()),
            contents: typescript::emit_merged(model, &plain),
        }],
        OutputTarget::Directory(dir) => {
            let labels: Vec<String> = scan.roots.iter().map(|r| r.label.clone()).collect();
            let layout = TreeLayout::new(model, &labels);
            typescript::emit_tree(model, &layout, &plain)
                .into_iter()
                .map(|(rel, contents)| Artifact {
                    path: Some(dir.join(rel)),
                    contents,
                })
                .collect()
        }
    }
}

fn load_files(files: &[ScannedFile], config: &Config) -> Vec<Loaded> {
    if files.is_empty() {
        return Vec::new();
    }
    let jobs = config.jobs.clamp(1, files.len());
    let chunk_len = files.len().div_ceil(jobs);

    std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_len)
            .enumerate()
            .map(|(n, chunk)| {
                let base = n * chunk_len;
                scope.spawn(move || {
                    chunk
                        .iter()
                        .enumerate()
                        .map(|(i, file)| load_file(base + i, file))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

fn load_file(idx: usize, file: &ScannedFile) -> Loaded {
    let content = match fs::read_to_string(&file.path) {
        Ok(content) => content,
        Err(err) => return Loaded::Unreadable(err.to_string()),
    };

    let is_protobuf = file
        .path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(".pb.go"));
    if !is_protobuf && parser::is_generated(&content) {
        return Loaded::Generated;
    }

    tracing::trace!(path = %file.path.display(), "parsing");
    let result = parser::parse(&content, SourceId::from_index(idx));
    Loaded::Parsed { content, result }
}

fn abort(diagnostics: Diagnostics, sources: SourceMap) -> Error {
    Error::Aborted(Box::new(Report {
        diagnostics,
        sources,
        artifacts: Vec::new(),
    }))
}
