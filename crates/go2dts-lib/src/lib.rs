//! go2dts: TypeScript declarations from Go type definitions.
//!
//! This crate provides the generation pipeline:
//! - `scan` - input enumeration and package grouping
//! - `parser` - lexer and declaration parser
//! - `analyze` - symbol table and type resolution
//! - `typegen` - TypeScript emission, merged or per-package tree
//! - `output` - output targets and the artifact writer
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod config;
pub mod diagnostics;
pub mod output;
pub mod parser;
mod pipeline;
pub mod scan;
pub mod source_map;
pub mod typegen;

#[cfg(test)]
pub mod test_utils;

pub use config::{Config, NullStyle};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use output::{Artifact, OutputTarget};
pub use pipeline::{Report, generate};
pub use source_map::{SourceId, SourceMap, Span};

/// Errors that end a generation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no input roots given")]
    NoInputs,

    /// A fatal diagnostic was recorded; the report holds all of them.
    #[error("generation aborted with {} errors", .0.diagnostics.error_count())]
    Aborted(Box<Report>),
}

/// Result type for generation runs.
pub type Result<T> = std::result::Result<T, Error>;
