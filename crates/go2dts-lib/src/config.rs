//! Configuration for a generation run.

use indexmap::IndexMap;

use go2dts_core::Colors;

/// How a pointer field without `omitempty` is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullStyle {
    /// `name: T | null`
    #[default]
    Union,
    /// `name?: T | null`
    OptionalUnion,
}

/// Configuration for scanning, resolution, and TypeScript emission.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether to export declarations
    pub(crate) export: bool,
    pub(crate) null_style: NullStyle,
    /// Render string types with typed constants as literal unions
    pub(crate) const_unions: bool,
    /// Carry Go doc comments into the output
    pub(crate) include_docs: bool,
    /// `"import/path.Name"` to literal TypeScript type
    pub(crate) type_overrides: IndexMap<String, String>,
    pub(crate) skip_tests: bool,
    /// Parse-phase worker count
    pub(crate) jobs: usize,
    /// Color configuration for output
    pub(crate) colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export: true,
            null_style: NullStyle::default(),
            const_unions: true,
            include_docs: true,
            type_overrides: IndexMap::new(),
            skip_tests: true,
            jobs: std::thread::available_parallelism().map_or(1, |n| n.get()),
            colors: Colors::OFF,
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to export declarations.
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    pub fn null_style(mut self, value: NullStyle) -> Self {
        self.null_style = value;
        self
    }

    pub fn const_unions(mut self, value: bool) -> Self {
        self.const_unions = value;
        self
    }

    pub fn include_docs(mut self, value: bool) -> Self {
        self.include_docs = value;
        self
    }

    /// Map a qualified Go type (`"github.com/shopspring/decimal.Decimal"`) to a
    /// literal TypeScript type. Takes precedence over built-in mappings.
    pub fn type_override(mut self, go_type: impl Into<String>, ts_type: impl Into<String>) -> Self {
        self.type_overrides.insert(go_type.into(), ts_type.into());
        self
    }

    pub fn skip_tests(mut self, value: bool) -> Self {
        self.skip_tests = value;
        self
    }

    /// Set the parse-phase worker count. Zero is treated as one.
    pub fn jobs(mut self, value: usize) -> Self {
        self.jobs = value.max(1);
        self
    }

    /// Set whether to use colored output.
    pub fn colored(mut self, enabled: bool) -> Self {
        self.colors = Colors::new(enabled);
        self
    }
}
