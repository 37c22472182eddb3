use std::path::PathBuf;

use quill_bytecode::{Colors, dump};

use super::program_loader::load_program;

pub struct DumpArgs {
    pub program_path: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let program = load_program(&args.program_path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    let colors = Colors::new(args.color);
    print!("{}", dump(&program, colors));
}
