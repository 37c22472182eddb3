//! Human-readable program dump for debugging.

use std::fmt::Write as _;

use crate::colors::Colors;
use crate::instruction::Instruction;
use crate::program::{LoopTable, Program};

/// Generate a listing of every non-nop instruction in the program.
///
/// Each line shows the instruction index, its source symbol and its decoded
/// form. Loop instructions also show the index of their partner, or `?`
/// when unpaired.
pub fn dump(program: &Program, colors: Colors) -> String {
    let c = &colors;
    let table = program.loop_table();
    let width = width_for_count(program.len());
    let mut out = String::new();

    writeln!(out, "{}[code]{}", c.header, c.reset).unwrap();
    for (ip, instr) in program.instructions().iter().enumerate() {
        if instr.is_nop() {
            continue;
        }
        out.push_str(&format_line(ip, *instr, &table, width, c));
        out.push('\n');
    }
    out
}

fn format_line(ip: usize, instr: Instruction, table: &LoopTable, width: usize, c: &Colors) -> String {
    let mut line = format!(
        "  {}{ip:0width$}{}  {}  {}",
        c.dim,
        c.reset,
        display_symbol(instr),
        format_instruction(instr, c)
    );
    if matches!(instr, Instruction::LoopOpen | Instruction::LoopClose) {
        let target = match table.partner(ip) {
            Some(p) => format!("{p:0width$}"),
            None => "?".to_string(),
        };
        write!(line, " {}→ {target}{}", c.target, c.reset).unwrap();
    }
    line
}

/// Instruction with its register operand highlighted.
pub fn format_instruction(instr: Instruction, c: &Colors) -> String {
    match instr {
        Instruction::Select(r) | Instruction::Transfer(r) => {
            format!("{} {}{}{}", instr.mnemonic(), c.register, r, c.reset)
        }
        _ => instr.to_string(),
    }
}

/// Source symbol, with the drop instruction made visible.
pub fn display_symbol(instr: Instruction) -> char {
    match instr {
        Instruction::Drop => '·',
        other => other.symbol(),
    }
}

/// Number of decimal digits needed to print indices below `count`.
pub fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10().floor() as usize + 1
    }
}
