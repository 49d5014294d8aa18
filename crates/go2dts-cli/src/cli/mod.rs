mod args;
mod commands;
mod dispatch;


pub use commands::build_cli;
pub use dispatch::GenerateParams;

/// Color output mode for CLI commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Whether output written to `stream` should carry ANSI codes.
    pub fn should_colorize(self, stream: &impl std::io::IsTerminal) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stream.is_terminal(),
        }
    }
}

/// How diagnostics are written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageFormat {
    /// Annotated source snippets.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}
