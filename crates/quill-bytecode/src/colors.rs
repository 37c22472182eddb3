//! Terminal palette shared by program dumps and execution traces.

/// ANSI escape codes, one per role in the output.
///
/// With colors off every field is empty, so format strings can splice the
/// fields in unconditionally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colors {
    /// Section headers such as `[code]`.
    pub header: &'static str,
    /// Register letters.
    pub register: &'static str,
    /// Jump targets of loop brackets.
    pub target: &'static str,
    /// Instruction indices and skipped steps.
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        header: "\x1b[1m",
        register: "\x1b[34m",
        target: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        header: "",
        register: "",
        target: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
