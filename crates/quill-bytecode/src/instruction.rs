//! Instruction decoding.
//!
//! Every source character decodes to exactly one instruction. Characters
//! outside the instruction set decode to `Nop` and are kept so that
//! instruction indices always equal character positions.

use std::fmt;

use crate::register::RegisterId;

/// A decoded Quill instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `a`-`z`: make the register active.
    Select(RegisterId),
    /// `A`-`Z`: move the active register's front value onto the named register.
    Transfer(RegisterId),
    /// `0`-`9`: push an integer literal.
    Digit(u8),

    // Register shuffling
    /// `:`
    Dup,
    /// `;`
    Swap,
    /// `.`: move the back value to the front.
    RotateToFront,
    /// `,`: move the front value to the back.
    RotateToBack,
    /// ` `: pop and discard.
    Drop,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Comparison and logic
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,

    // Output
    /// `#`
    PrintInt,
    /// `^`
    PrintFloat,
    /// `@`
    PrintChar,

    // Input
    /// `` ` ``: read a whitespace-delimited number.
    ReadNumber,
    /// `'`: read one byte.
    ReadChar,
    /// `"`: read a delimited string.
    ReadString,

    // Control flow
    /// `?`
    LoopOpen,
    /// `\`
    LoopClose,
    /// `!`
    Break,

    /// Any other character.
    Nop(char),
}

impl Instruction {
    /// Decode a single source character.
    pub fn decode(c: char) -> Self {
        match c {
            'a'..='z' => Self::Select(RegisterId::from_letter(c).unwrap_or_default()),
            'A'..='Z' => Self::Transfer(RegisterId::from_letter(c).unwrap_or_default()),
            '0'..='9' => Self::Digit(c as u8 - b'0'),
            ':' => Self::Dup,
            ';' => Self::Swap,
            '.' => Self::RotateToFront,
            ',' => Self::RotateToBack,
            ' ' => Self::Drop,
            '+' => Self::Add,
            '-' => Self::Sub,
            '*' => Self::Mul,
            '/' => Self::Div,
            '%' => Self::Rem,
            '=' => Self::Eq,
            '>' => Self::Gt,
            '<' => Self::Lt,
            '&' => Self::And,
            '|' => Self::Or,
            '~' => Self::Not,
            '#' => Self::PrintInt,
            '^' => Self::PrintFloat,
            '@' => Self::PrintChar,
            '`' => Self::ReadNumber,
            '\'' => Self::ReadChar,
            '"' => Self::ReadString,
            '?' => Self::LoopOpen,
            '\\' => Self::LoopClose,
            '!' => Self::Break,
            other => Self::Nop(other),
        }
    }

    /// Source character for this instruction.
    pub fn symbol(self) -> char {
        match self {
            Self::Select(r) => r.letter(),
            Self::Transfer(r) => r.letter().to_ascii_uppercase(),
            Self::Digit(d) => (b'0' + d) as char,
            Self::Dup => ':',
            Self::Swap => ';',
            Self::RotateToFront => '.',
            Self::RotateToBack => ',',
            Self::Drop => ' ',
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Rem => '%',
            Self::Eq => '=',
            Self::Gt => '>',
            Self::Lt => '<',
            Self::And => '&',
            Self::Or => '|',
            Self::Not => '~',
            Self::PrintInt => '#',
            Self::PrintFloat => '^',
            Self::PrintChar => '@',
            Self::ReadNumber => '`',
            Self::ReadChar => '\'',
            Self::ReadString => '"',
            Self::LoopOpen => '?',
            Self::LoopClose => '\\',
            Self::Break => '!',
            Self::Nop(c) => c,
        }
    }

    /// Short lowercase name used in dumps and traces.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Select(_) => "sel",
            Self::Transfer(_) => "xfer",
            Self::Digit(_) => "push",
            Self::Dup => "dup",
            Self::Swap => "swap",
            Self::RotateToFront => "rotf",
            Self::RotateToBack => "rotb",
            Self::Drop => "drop",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Rem => "rem",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::PrintInt => "puti",
            Self::PrintFloat => "putf",
            Self::PrintChar => "putc",
            Self::ReadNumber => "getn",
            Self::ReadChar => "getc",
            Self::ReadString => "gets",
            Self::LoopOpen => "loop",
            Self::LoopClose => "end",
            Self::Break => "break",
            Self::Nop(_) => "nop",
        }
    }

    #[inline]
    pub fn is_nop(self) -> bool {
        matches!(self, Self::Nop(_))
    }

    /// Whether the instruction reads from the input collaborator.
    pub fn is_input(self) -> bool {
        matches!(self, Self::ReadNumber | Self::ReadChar | Self::ReadString)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(r) | Self::Transfer(r) => write!(f, "{} {}", self.mnemonic(), r),
            Self::Digit(d) => write!(f, "{} {}", self.mnemonic(), d),
            _ => f.write_str(self.mnemonic()),
        }
    }
}
