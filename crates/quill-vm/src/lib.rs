//! Runtime VM for executing Quill programs.
//!
//! This crate provides the interpreter that runs a loaded program against a
//! bank of 26 double-ended registers, reading from an [`Input`] and writing
//! to an [`Output`] collaborator.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    FuelLimits, Input, NoopTracer, Output, PrintTracer, Register, RegisterBank, RuntimeError,
    StreamInput, Tracer, VM, Value, Verbosity, format_float,
};
