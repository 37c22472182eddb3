//! Program representation and loader.
//!
//! A program is the first line of a source text, decoded one instruction per
//! character and terminated by a newline no-op. Later lines are ignored.

use crate::instruction::Instruction;

/// A loaded Quill program: a flat, linear instruction sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Load a program from source text.
    pub fn load(source: &str) -> Self {
        let line = source.lines().next().unwrap_or("");
        let instructions = line
            .chars()
            .chain(std::iter::once('\n'))
            .map(Instruction::decode)
            .collect();
        Self { instructions }
    }

    /// Build a program from already-decoded instructions.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at `ip`, or `None` past the end.
    #[inline]
    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Pair every loop open with its loop close.
    ///
    /// Pairing follows bracket nesting, the same rule the runtime skip
    /// scanner applies when it looks for the close of a false loop.
    pub fn loop_table(&self) -> LoopTable {
        let mut partners = vec![None; self.len()];
        let mut open = Vec::new();
        for (ip, instr) in self.instructions.iter().enumerate() {
            match instr {
                Instruction::LoopOpen => open.push(ip),
                Instruction::LoopClose => {
                    if let Some(start) = open.pop() {
                        partners[start] = Some(ip);
                        partners[ip] = Some(start);
                    }
                }
                _ => {}
            }
        }
        LoopTable { partners }
    }

    /// Report loop-structure problems, in program order.
    pub fn verify(&self) -> Vec<StructureIssue> {
        let table = self.loop_table();
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(ip, instr)| match instr {
                Instruction::LoopOpen if table.partner(ip).is_none() => {
                    Some(StructureIssue::UnclosedOpen { ip })
                }
                Instruction::LoopClose if table.partner(ip).is_none() => {
                    Some(StructureIssue::UnmatchedClose { ip })
                }
                _ => None,
            })
            .collect()
    }
}

/// Static pairing of `?` and `\` positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopTable {
    partners: Vec<Option<usize>>,
}

impl LoopTable {
    /// Matching loop instruction for the one at `ip`.
    pub fn partner(&self, ip: usize) -> Option<usize> {
        self.partners.get(ip).copied().flatten()
    }

    /// Number of matched loops.
    pub fn loop_count(&self) -> usize {
        self.partners
            .iter()
            .enumerate()
            .filter(|(ip, p)| p.is_some_and(|p| p > *ip))
            .count()
    }
}

/// Loop-structure problem found by [`Program::verify`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructureIssue {
    /// Fatal at runtime if reached while no loop is open.
    #[error("loop close `\\` at {ip} has no matching `?`")]
    UnmatchedClose { ip: usize },
    /// A false condition skips to program end; a true one runs to program end.
    #[error("loop open `?` at {ip} is never closed")]
    UnclosedOpen { ip: usize },
}

impl StructureIssue {
    pub fn ip(&self) -> usize {
        match self {
            Self::UnmatchedClose { ip } | Self::UnclosedOpen { ip } => *ip,
        }
    }
}
