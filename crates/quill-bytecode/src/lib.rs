//! Instruction set and program representation for Quill.
//!
//! This crate contains:
//! - The one-character instruction set (`Instruction`, `RegisterId`)
//! - The program loader and static loop analysis (`Program`, `LoopTable`)
//! - Human-readable program dumps and the shared color palette

pub mod colors;
pub mod dump;
pub mod instruction;
pub mod program;
pub mod register;

// Re-export commonly used items at crate root
pub use colors::Colors;
pub use dump::{dump, width_for_count};
pub use instruction::Instruction;
pub use program::{LoopTable, Program, StructureIssue};
pub use register::RegisterId;
