mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use cli::{GenerateParams, build_cli};

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors
    let matches = build_cli().get_matches();
    let params = GenerateParams::from_matches(&matches);

    logging::init(params.verbosity);
    commands::generate::run(params.into())
}
