//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! Running a program is also the default action: `quill FILE` behaves like
//! `quill run FILE`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("quill")
        .about("Interpreter for a one-character-per-instruction register language")
        .version(env!("CARGO_PKG_VERSION"))
        .args_conflicts_with_subcommands(true)
        .override_usage(
            "\
  quill [FILE] [--fuel <N>]
  quill <COMMAND>",
        )
        .arg(program_path_arg())
        .arg(fuel_arg())
        .subcommand(run_command())
        .subcommand(trace_command())
        .subcommand(dump_command())
        .subcommand(check_command())
}

/// Run a program.
pub fn run_command() -> Command {
    Command::new("run")
        .about("Run a program")
        .override_usage("  quill run [FILE] [--fuel <N>]")
        .after_help(
            r#"Without FILE, the program path is read from stdin; the rest of stdin
is the program's input. An empty path exits without running anything.

EXAMPLES:
  quill run countdown.ql            # program input from the terminal
  echo 5 | quill run square.ql      # piped program input
  quill run spin.ql --fuel 10000    # stop endless loops"#,
        )
        .arg(program_path_arg())
        .arg(fuel_arg())
}

/// Run a program with an execution trace on stderr.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace program execution for debugging")
        .override_usage("  quill trace [FILE] [-v|-vv] [--fuel <N>] [--no-result]")
        .after_help(
            r#"EXAMPLES:
  quill trace countdown.ql              # loop events and instructions
  quill trace countdown.ql -v           # also register contents
  quill trace countdown.ql -vv          # also skipped instructions
  quill trace spin.ql --fuel 200        # bounded trace of an endless loop"#,
        )
        .arg(program_path_arg())
        .arg(color_arg())
        .arg(verbose_arg())
        .arg(no_result_arg())
        .arg(fuel_arg())
}

/// Show the decoded instruction listing.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show decoded instructions and loop pairing")
        .override_usage("  quill dump <FILE>")
        .arg(required_program_path_arg())
        .arg(color_arg())
}

/// Report loop-structure problems.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Check loop structure without running")
        .override_usage("  quill check <FILE>")
        .after_help(
            r#"Exits with status 1 when a `\` has no matching `?` or a `?` is never
closed."#,
        )
        .arg(required_program_path_arg())
}
