use serde::Serialize;

use crate::source_map::Span;

/// Diagnostic kinds, fatal ones first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    // Abort the run
    InputNotFound,
    DuplicateType,
    WriteFailed,

    // Skip one file
    FileRead,
    Parse,

    // Degrade one declaration or field
    UnsupportedSyntax,
    UnresolvedReference,
    UnsupportedKeyType,
    PackageNameMismatch,
    MissingPackage,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::InputNotFound | Self::DuplicateType | Self::WriteFailed => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::InputNotFound => "input root does not exist",
            Self::DuplicateType => "type is declared more than once in the same package",
            Self::WriteFailed => "failed to write output",
            Self::FileRead => "failed to read source file",
            Self::Parse => "syntax error; file skipped",
            Self::UnsupportedSyntax => "unsupported syntax; declaration skipped",
            Self::UnresolvedReference => "unresolved type reference; emitted as `any`",
            Self::UnsupportedKeyType => "unsupported map key type; field emitted as `any`",
            Self::PackageNameMismatch => "files in one directory declare different packages",
            Self::MissingPackage => "file has no `package` clause; package name inferred",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InputNotFound => "input root `{}` does not exist".to_string(),
            Self::DuplicateType => "duplicate type {}".to_string(),
            Self::FileRead => "failed to read source file: {}".to_string(),
            Self::Parse => "syntax error: {}".to_string(),
            Self::UnresolvedReference => "`{}` cannot be resolved; emitted as `any`".to_string(),
            Self::UnsupportedKeyType => {
                "map key type `{}` is not supported; field emitted as `any`".to_string()
            }
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Where a diagnostic points: a range inside a parsed file, or just a path
/// when there is no readable content (unreadable files, missing roots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Span(Span),
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) location: Location,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, location: Location) -> Self {
        Self::new(kind, location, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn span(&self) -> Option<Span> {
        match &self.location {
            Location::Span(span) => Some(*span),
            Location::Path(_) => None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.severity())?;
        match &self.location {
            Location::Span(span) => write!(
                f,
                " at {}..{}",
                u32::from(span.range.start()),
                u32::from(span.range.end())
            )?,
            Location::Path(path) => write!(f, " in {path}")?,
        }
        write!(f, ": {}", self.message)?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.span.range.start()),
                u32::from(related.span.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
