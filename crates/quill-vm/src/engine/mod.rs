//! Execution engine for Quill programs.
//!
//! The VM fetches one instruction at a time and either executes it against
//! the register bank or, while skipping a false loop body, only scans it for
//! loop brackets.

mod error;
mod io;
mod register;
mod trace;
mod value;
mod vm;

#[cfg(test)]
mod engine_tests;

pub use error::RuntimeError;
pub use io::{Input, Output, StreamInput, format_float};
pub use register::{Register, RegisterBank};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use value::Value;
pub use vm::{FuelLimits, VM, VMBuilder};
