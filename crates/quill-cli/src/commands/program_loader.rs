//! Program loading from a file or from a path given on stdin.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quill_bytecode::Program;
use quill_vm::Input;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read program path from stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Load the program in `path`. Only its first line is kept.
pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Program::load(&String::from_utf8_lossy(&bytes)))
}

/// Read a program path as one whitespace-delimited token.
///
/// Returns `None` when the input holds no token; the caller then has nothing
/// to run.
pub fn read_program_path<I: Input + ?Sized>(input: &mut I) -> Result<Option<PathBuf>, LoadError> {
    let token = input.read_token().map_err(LoadError::Stdin)?;
    Ok(token.map(|t| PathBuf::from(String::from_utf8_lossy(&t).into_owned())))
}
