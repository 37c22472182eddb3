//! Numeric values stored in registers.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::Serialize;

/// A register value: either an integer or a float.
///
/// Binary operators use integer semantics only when both operands are
/// integers; otherwise both sides are widened to float.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
}

/// Operand pair after promotion.
enum Operands {
    Ints(i64, i64),
    Floats(f64, f64),
}

impl Value {
    /// Parse an input token.
    ///
    /// Tokens containing `.` are read as floats, everything else as
    /// integers. Only the longest numeric prefix counts, so `12abc` is `12`
    /// and `1e5` is `1`; a token with no numeric prefix (or an integer out
    /// of range) yields `-1`. Floats with no fractional part that fit in an
    /// `i64` are narrowed to integers.
    pub fn parse_token(token: &str) -> Self {
        let float = token.contains('.');
        let Some(prefix) = numeric_prefix(token, float) else {
            return Self::Integer(-1);
        };
        if float {
            prefix.parse::<f64>().map_or(Self::Integer(-1), Self::narrow)
        } else {
            prefix.parse::<i64>().map_or(Self::Integer(-1), Self::Integer)
        }
    }

    /// Store a float as an integer when no precision is lost.
    pub fn narrow(f: f64) -> Self {
        // 2^63 is exactly representable; anything at or above it overflows.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if f.is_finite() && f.trunc() == f && (-LIMIT..LIMIT).contains(&f) {
            Self::Integer(f as i64)
        } else {
            Self::Float(f)
        }
    }

    /// Integer view; floats truncate toward zero (saturating, NaN is 0).
    #[inline]
    pub fn as_int(self) -> i64 {
        match self {
            Self::Integer(n) => n,
            Self::Float(f) => f as i64,
        }
    }

    /// Float view; integers widen.
    #[inline]
    pub fn as_float(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(f) => f,
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Truthiness of the integer view.
    #[inline]
    pub fn is_truthy(self) -> bool {
        self.as_int() != 0
    }

    fn operands(self, rhs: Self) -> Operands {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => Operands::Ints(a, b),
            _ => Operands::Floats(self.as_float(), rhs.as_float()),
        }
    }

    /// Remainder; `None` for an integer division by zero.
    pub fn checked_rem(self, rhs: Self) -> Option<Self> {
        match self.operands(rhs) {
            Operands::Ints(_, 0) => None,
            Operands::Ints(a, b) => Some(Self::Integer(a.wrapping_rem(b))),
            Operands::Floats(a, b) => Some(Self::Float(a % b)),
        }
    }

    /// Division, always in float.
    pub fn divide(self, rhs: Self) -> Self {
        Self::Float(self.as_float() / rhs.as_float())
    }

    pub fn equals(self, rhs: Self) -> Self {
        Self::from_bool(match self.operands(rhs) {
            Operands::Ints(a, b) => a == b,
            Operands::Floats(a, b) => a == b,
        })
    }

    pub fn greater_than(self, rhs: Self) -> Self {
        Self::from_bool(match self.operands(rhs) {
            Operands::Ints(a, b) => a > b,
            Operands::Floats(a, b) => a > b,
        })
    }

    pub fn less_than(self, rhs: Self) -> Self {
        Self::from_bool(match self.operands(rhs) {
            Operands::Ints(a, b) => a < b,
            Operands::Floats(a, b) => a < b,
        })
    }

    pub fn logical_and(self, rhs: Self) -> Self {
        Self::from_bool(self.is_truthy() && rhs.is_truthy())
    }

    pub fn logical_or(self, rhs: Self) -> Self {
        Self::from_bool(self.is_truthy() || rhs.is_truthy())
    }

    pub fn logical_not(self) -> Self {
        Self::from_bool(!self.is_truthy())
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        Self::Integer(b as i64)
    }
}

/// Leading `[+-]digits`, or for floats `[+-]digits[.digits][e[+-]digits]`.
///
/// `None` when the prefix holds no mantissa digit.
fn numeric_prefix(token: &str, float: bool) -> Option<&str> {
    let bytes = token.as_bytes();
    let digits_at = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut mantissa = digits_at(end);
    end += mantissa;

    if float {
        if bytes.get(end) == Some(&b'.') {
            let fraction = digits_at(end + 1);
            if mantissa + fraction > 0 {
                end += 1 + fraction;
                mantissa += fraction;
            }
        }
        if mantissa > 0 && matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = digits_at(exp);
            if exp_digits > 0 {
                end = exp + exp_digits;
            }
        }
    }

    (mantissa > 0).then(|| &token[..end])
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Self) -> Self {
        match self.operands(rhs) {
            Operands::Ints(a, b) => Self::Integer(a.wrapping_add(b)),
            Operands::Floats(a, b) => Self::Float(a + b),
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Self) -> Self {
        match self.operands(rhs) {
            Operands::Ints(a, b) => Self::Integer(a.wrapping_sub(b)),
            Operands::Floats(a, b) => Self::Float(a - b),
        }
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Self) -> Self {
        match self.operands(rhs) {
            Operands::Ints(a, b) => Self::Integer(a.wrapping_mul(b)),
            Operands::Floats(a, b) => Self::Float(a * b),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}
