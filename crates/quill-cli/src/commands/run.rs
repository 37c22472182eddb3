use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::run_common::{self, PreparedProgram};

pub struct RunArgs {
    pub program_path: Option<PathBuf>,
    pub fuel: Option<u64>,
}

pub fn run(args: RunArgs) {
    let Some(PreparedProgram { program, mut input }) =
        run_common::prepare_program(args.program_path.as_deref())
    else {
        return;
    };

    let mut vm = run_common::build_vm(args.fuel);
    let mut out = BufWriter::new(io::stdout().lock());
    let result = vm.execute(&program, &mut input, &mut out);
    let flushed = out.flush();

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }
    if let Err(e) = flushed {
        eprintln!("error: failed to write output: {}", e);
        std::process::exit(2);
    }
}
