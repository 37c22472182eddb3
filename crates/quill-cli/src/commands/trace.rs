//! Trace program execution for debugging.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use quill_bytecode::Colors;
use quill_vm::{PrintTracer, Verbosity};

use super::run_common::{self, PreparedProgram};

pub struct TraceArgs {
    pub program_path: Option<PathBuf>,
    pub verbosity: Verbosity,
    pub no_result: bool,
    pub fuel: Option<u64>,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let Some(PreparedProgram { program, mut input }) =
        run_common::prepare_program(args.program_path.as_deref())
    else {
        return;
    };

    let mut vm = run_common::build_vm(args.fuel);
    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::builder(&program)
        .verbosity(args.verbosity)
        .colored(args.color)
        .build();

    let mut out = BufWriter::new(io::stdout().lock());
    let result = vm.execute_with(&program, &mut input, &mut out, &mut tracer);
    let flushed = out.flush();
    tracer.print();

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }
    if let Err(e) = flushed {
        eprintln!("error: failed to write output: {}", e);
        std::process::exit(2);
    }

    if args.no_result {
        return;
    }

    eprintln!("{}---{}", colors.dim, colors.reset);
    match serde_json::to_string_pretty(vm.registers()) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => {
            eprintln!("error: failed to serialize registers: {}", e);
            std::process::exit(1);
        }
    }
}
