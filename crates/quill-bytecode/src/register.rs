//! Register addressing.

/// Index of one of the 26 registers, `a` through `z`.
///
/// Lowercase and uppercase letters address the same slot: `a` selects
/// register 0 and `A` transfers into register 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RegisterId(u8);

impl RegisterId {
    /// Number of addressable registers.
    pub const COUNT: usize = 26;

    /// Create from a raw slot index. Returns `None` when out of range.
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < Self::COUNT).then_some(Self(index))
    }

    /// Resolve a register letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Some(Self(c as u8 - b'a')),
            'A'..='Z' => Some(Self(c as u8 - b'A')),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Lowercase letter naming this register.
    pub fn letter(self) -> char {
        (b'a' + self.0) as char
    }

    /// All registers in slot order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl std::fmt::Display for RegisterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
