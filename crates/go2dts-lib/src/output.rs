//! Output targets and the artifact writer.
//!
//! Everything is rendered before the first write. Each artifact goes to a
//! temp file in its destination directory and is renamed into place, so a
//! failed write never leaves a truncated file behind.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// One merged `.d.ts` file.
    File(PathBuf),
    /// A mirrored tree of `index.d.ts` modules.
    Directory(PathBuf),
    /// Merged text handed back to the caller.
    Stdout,
}

impl OutputTarget {
    /// Classify an output argument: `-` is stdout; a trailing separator, an
    /// existing directory, or `force_tree` selects tree mode.
    pub fn from_arg(arg: &str, force_tree: bool) -> Self {
        if arg == "-" {
            return Self::Stdout;
        }
        let path = PathBuf::from(arg);
        let trailing_sep = arg.ends_with('/') || arg.ends_with(std::path::MAIN_SEPARATOR);
        if force_tree || trailing_sep || path.is_dir() {
            Self::Directory(path)
        } else {
            Self::File(path)
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) | Self::Directory(path) => write!(f, "{}", path.display()),
            Self::Stdout => write!(f, "<stdout>"),
        }
    }
}

/// One rendered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Destination; `None` for stdout.
    pub path: Option<PathBuf>,
    pub contents: String,
}

/// Writes every artifact that has a path. Stops at the first failure and
/// records it as a `WriteFailed` error.
pub fn write_artifacts(artifacts: &[Artifact], diagnostics: &mut Diagnostics) {
    for artifact in artifacts {
        let Some(path) = &artifact.path else {
            continue;
        };
        if let Err(err) = write_atomic(path, &artifact.contents) {
            diagnostics
                .report_path(DiagnosticKind::WriteFailed, path.display().to_string())
                .message(err.to_string())
                .emit();
            return;
        }
        tracing::debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
    }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
