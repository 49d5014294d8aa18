//! Dispatch logic: extract params from `ArgMatches` and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use go2dts_lib::NullStyle;

use super::{ColorChoice, MessageFormat};
use crate::commands::generate::GenerateArgs;

pub struct GenerateParams {
    pub inputs: Vec<PathBuf>,
    pub output: String,
    pub tree: bool,
    pub export: bool,
    pub null_style: NullStyle,
    pub const_unions: bool,
    pub docs: bool,
    pub mappings: Vec<(String, String)>,
    pub include_tests: bool,
    pub jobs: Option<usize>,
    pub color: ColorChoice,
    pub message_format: MessageFormat,
    pub verbosity: u8,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        // The last positional is the output target
        let mut paths: Vec<String> = m
            .get_many::<String>("paths")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let output = paths.pop().unwrap_or_default();

        Self {
            inputs: paths.into_iter().map(PathBuf::from).collect(),
            output,
            tree: m.get_flag("tree"),
            export: !m.get_flag("no_export"),
            null_style: parse_null_style(m),
            const_unions: !m.get_flag("no_const_unions"),
            docs: !m.get_flag("no_docs"),
            mappings: m
                .get_many::<(String, String)>("map")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            include_tests: m.get_flag("include_tests"),
            jobs: m.get_one::<usize>("jobs").copied(),
            color: parse_color(m),
            message_format: parse_message_format(m),
            verbosity: m.get_count("verbose"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            inputs: p.inputs,
            output: p.output,
            tree: p.tree,
            export: p.export,
            null_style: p.null_style,
            const_unions: p.const_unions,
            docs: p.docs,
            mappings: p.mappings,
            include_tests: p.include_tests,
            jobs: p.jobs,
            color: p.color,
            message_format: p.message_format,
        }
    }
}

fn parse_null_style(m: &ArgMatches) -> NullStyle {
    match m.get_one::<String>("null_style").map(|s| s.as_str()) {
        Some("optional-union") => NullStyle::OptionalUnion,
        _ => NullStyle::Union,
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_message_format(m: &ArgMatches) -> MessageFormat {
    match m.get_one::<String>("message_format").map(|s| s.as_str()) {
        Some("json") => MessageFormat::Json,
        _ => MessageFormat::Human,
    }
}
