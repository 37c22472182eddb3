//! Shared logic for run and trace commands.

use std::io::{self, StdinLock};
use std::path::Path;

use quill_bytecode::Program;
use quill_vm::{FuelLimits, StreamInput, VM};

use super::program_loader::{load_program, read_program_path};

pub struct PreparedProgram {
    pub program: Program,
    /// Program input; already past the program path when it came from stdin.
    pub input: StreamInput<StdinLock<'static>>,
}

/// Load the program and open stdin as its input.
///
/// Without a path, the path is read from stdin first. Returns `None` when
/// stdin holds no path. Load failures exit with status 1.
pub fn prepare_program(program_path: Option<&Path>) -> Option<PreparedProgram> {
    let mut input = StreamInput::new(io::stdin().lock());

    let path = match program_path {
        Some(path) => path.to_path_buf(),
        None => match read_program_path(&mut input) {
            Ok(Some(path)) => path,
            Ok(None) => return None,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let program = load_program(&path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    Some(PreparedProgram { program, input })
}

/// Build a VM with an optional step limit.
pub fn build_vm(fuel: Option<u64>) -> VM {
    let mut limits = FuelLimits::new();
    if let Some(fuel) = fuel {
        limits = limits.exec_fuel(fuel);
    }
    VM::builder().limits(limits).build()
}
