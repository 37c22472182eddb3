use std::path::PathBuf;

use super::program_loader::load_program;

pub struct CheckArgs {
    pub program_path: PathBuf,
}

pub fn run(args: CheckArgs) {
    let program = load_program(&args.program_path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    let issues = program.verify();
    for issue in &issues {
        eprintln!("warning: {}", issue);
    }
    if !issues.is_empty() {
        std::process::exit(1);
    }
}
