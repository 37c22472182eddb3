//! Errors that halt program execution.

/// Fatal runtime condition. Every variant stops the VM at an instruction
/// boundary; no instruction is left partially applied.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// `\` executed while no loop was open.
    #[error("loop close at {ip} has no open loop")]
    UnmatchedLoopClose { ip: usize },

    /// Integer remainder with a zero divisor.
    #[error("integer remainder by zero at {ip}")]
    RemainderByZero { ip: usize },

    /// Execution fuel exhausted (too many interpreter steps).
    #[error("runtime execution limit exceeded ({0} steps)")]
    ExecFuelExhausted(u64),

    /// The input or output collaborator failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
