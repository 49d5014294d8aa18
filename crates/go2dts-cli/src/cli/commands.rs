//! Command builder for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI.
pub fn build_cli() -> Command {
    Command::new("go2dts")
        .about("Generate TypeScript declarations from Go types")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("go2dts [OPTIONS] <INPUT>... <OUTPUT>")
        .after_help(
            r#"OUTPUT:
  types.d.ts    one merged file
  types/        one index.d.ts per package (also: existing directory, --tree)
  -             merged output on stdout

EXAMPLES:
  go2dts ./backend web/src/types.d.ts
  go2dts ./api ./shared web/src/types/
  go2dts --map github.com/shopspring/decimal.Decimal=string ./api -"#,
        )
        .arg(paths_arg())
        .arg(tree_arg())
        .arg(no_export_arg())
        .arg(null_style_arg())
        .arg(no_const_unions_arg())
        .arg(no_docs_arg())
        .arg(map_arg())
        .arg(include_tests_arg())
        .arg(jobs_arg())
        .arg(color_arg())
        .arg(message_format_arg())
        .arg(verbose_arg())
}
