use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use go2dts_lib::{Config, Error, NullStyle, OutputTarget, Report, generate};
use tracing::debug;

use crate::cli::{ColorChoice, MessageFormat};

pub struct GenerateArgs {
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
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

pub fn run(args: GenerateArgs) -> ExitCode {
    match execute(&args) {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Failed => ExitCode::from(1),
    }
}

pub fn execute(args: &GenerateArgs) -> Outcome {
    let target = OutputTarget::from_arg(&args.output, args.tree);
    let config = build_config(args, &target);
    debug!(inputs = args.inputs.len(), %target, "starting generation");

    match generate(&args.inputs, &target, &config) {
        Ok(report) => {
            print_diagnostics(&report, args);
            if target == OutputTarget::Stdout {
                let mut stdout = io::stdout().lock();
                for artifact in &report.artifacts {
                    if let Err(err) = stdout.write_all(artifact.contents.as_bytes()) {
                        eprintln!("error: failed to write to stdout: {err}");
                        return Outcome::Failed;
                    }
                }
            } else {
                println!("Types definition created into {}", args.output);
            }
            Outcome::Success
        }
        Err(Error::Aborted(report)) => {
            print_diagnostics(&report, args);
            Outcome::Failed
        }
        Err(err) => {
            eprintln!("error: {err}");
            Outcome::Failed
        }
    }
}

pub fn build_config(args: &GenerateArgs, target: &OutputTarget) -> Config {
    let mut config = Config::new()
        .export(args.export)
        .null_style(args.null_style)
        .const_unions(args.const_unions)
        .include_docs(args.docs)
        .skip_tests(!args.include_tests)
        .colored(*target == OutputTarget::Stdout && args.color.should_colorize(&io::stdout()));
    if let Some(jobs) = args.jobs {
        config = config.jobs(jobs);
    }
    for (go_type, ts_type) in &args.mappings {
        config = config.type_override(go_type, ts_type);
    }
    config
}

fn print_diagnostics(report: &Report, args: &GenerateArgs) {
    if report.diagnostics.is_empty() {
        return;
    }
    match args.message_format {
        MessageFormat::Human => {
            let colored = args.color.should_colorize(&io::stderr());
            eprint!("{}", report.render_diagnostics(colored));
        }
        MessageFormat::Json => {
            for record in report.diagnostics.records(&report.sources) {
                match serde_json::to_string(&record) {
                    Ok(line) => eprintln!("{line}"),
                    Err(err) => eprintln!("error: failed to serialize diagnostic: {err}"),
                }
            }
        }
    }
}
