pub mod check;
pub mod dump;
pub mod program_loader;
pub mod run;
pub mod run_common;
pub mod trace;

#[cfg(test)]
mod program_loader_tests;
