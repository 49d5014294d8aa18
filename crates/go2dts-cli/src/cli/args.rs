//! Argument builders for the CLI.
//!
//! Each function returns a `clap::Arg`; `commands.rs` composes them.

use clap::{Arg, ArgAction, value_parser};

/// Input roots followed by the output target (positional).
pub fn paths_arg() -> Arg {
    Arg::new("paths")
        .value_name("PATH")
        .num_args(2..)
        .required(true)
        .help("Input directories followed by the output file or directory")
}

/// Force directory output (--tree).
pub fn tree_arg() -> Arg {
    Arg::new("tree")
        .long("tree")
        .action(ArgAction::SetTrue)
        .help("Write one index.d.ts per package even without a trailing separator")
}

/// Don't export declarations (--no-export).
pub fn no_export_arg() -> Arg {
    Arg::new("no_export")
        .long("no-export")
        .action(ArgAction::SetTrue)
        .help("Don't export declarations")
}

/// Pointer field rendering (--null-style).
pub fn null_style_arg() -> Arg {
    Arg::new("null_style")
        .long("null-style")
        .value_name("STYLE")
        .default_value("union")
        .value_parser(["union", "optional-union"])
        .help("Render pointer fields as `T | null` or `?: T | null`")
}

/// Disable literal unions for typed string constants (--no-const-unions).
pub fn no_const_unions_arg() -> Arg {
    Arg::new("no_const_unions")
        .long("no-const-unions")
        .action(ArgAction::SetTrue)
        .help("Render string types with constants as plain `string`")
}

/// Drop doc comments (--no-docs).
pub fn no_docs_arg() -> Arg {
    Arg::new("no_docs")
        .long("no-docs")
        .action(ArgAction::SetTrue)
        .help("Don't carry Go doc comments into the output")
}

/// Type override (--map path.Name=tsType), repeatable.
pub fn map_arg() -> Arg {
    Arg::new("map")
        .long("map")
        .value_name("GO=TS")
        .action(ArgAction::Append)
        .value_parser(parse_mapping)
        .help("Map a Go type (import/path.Name) to a literal TypeScript type")
}

/// Include `_test.go` files (--include-tests).
pub fn include_tests_arg() -> Arg {
    Arg::new("include_tests")
        .long("include-tests")
        .action(ArgAction::SetTrue)
        .help("Also read _test.go files")
}

/// Parse worker count (-j/--jobs).
pub fn jobs_arg() -> Arg {
    Arg::new("jobs")
        .short('j')
        .long("jobs")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Number of parse workers [default: available parallelism]")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Diagnostic format (--message-format).
pub fn message_format_arg() -> Arg {
    Arg::new("message_format")
        .long("message-format")
        .value_name("FMT")
        .default_value("human")
        .value_parser(["human", "json"])
        .help("Diagnostic output format")
}

/// Log verbosity (-v, repeatable).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
}

/// `import/path.Name=tsType` into its two halves.
pub fn parse_mapping(value: &str) -> Result<(String, String), String> {
    let (go_type, ts_type) = value
        .split_once('=')
        .ok_or_else(|| format!("expected GO=TS, got `{value}`"))?;
    let (go_type, ts_type) = (go_type.trim(), ts_type.trim());
    match go_type.rsplit_once('.') {
        Some((path, name)) if !path.is_empty() && !name.is_empty() => {}
        _ => return Err(format!("expected `import/path.Name` before `=`, got `{go_type}`")),
    }
    if ts_type.is_empty() {
        return Err("TypeScript type after `=` is empty".to_string());
    }
    Ok((go_type.to_string(), ts_type.to_string()))
}
