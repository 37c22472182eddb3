//! Input and output collaborators.
//!
//! The VM never touches stdin/stdout directly. It reads through [`Input`]
//! and writes through [`Output`]; I/O is byte-oriented in both directions.

use std::io::{self, BufRead, Write};

/// Source of program input. All operations may block.
pub trait Input {
    /// Next whitespace-delimited token, or `None` at end of input.
    ///
    /// Leading whitespace is consumed; the whitespace byte ending the token
    /// is left in the stream.
    fn read_token(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Next byte, or `None` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Bytes up to `delimiter`. The delimiter is consumed but not returned.
    /// At end of input, returns whatever was read.
    fn read_until(&mut self, delimiter: u8) -> io::Result<Vec<u8>>;
}

/// Sink for program output.
pub trait Output {
    fn write_int(&mut self, value: i64) -> io::Result<()>;
    fn write_float(&mut self, value: f64) -> io::Result<()>;
    fn write_char(&mut self, byte: u8) -> io::Result<()>;
}

impl<W: Write + ?Sized> Output for W {
    fn write_int(&mut self, value: i64) -> io::Result<()> {
        write!(self, "{value}")
    }

    fn write_float(&mut self, value: f64) -> io::Result<()> {
        self.write_all(format_float(value).as_bytes())
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }
}

/// [`Input`] over any buffered reader.
#[derive(Debug)]
pub struct StreamInput<R> {
    reader: R,
}

impl<R: BufRead> StreamInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn skip_whitespace(&mut self) -> io::Result<()> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            let len = buf.len();
            let skip = buf.iter().take_while(|b| is_space(**b)).count();
            self.reader.consume(skip);
            if skip < len {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> Input for StreamInput<R> {
    fn read_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.skip_whitespace()?;
        let mut token = Vec::new();
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let end = buf.iter().position(|b| is_space(*b)).unwrap_or(buf.len());
            let done = end < buf.len();
            token.extend_from_slice(&buf[..end]);
            self.reader.consume(end);
            if done {
                break;
            }
        }
        Ok((!token.is_empty()).then_some(token))
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let buf = self.reader.fill_buf()?;
        let Some(&byte) = buf.first() else {
            return Ok(None);
        };
        self.reader.consume(1);
        Ok(Some(byte))
    }

    fn read_until(&mut self, delimiter: u8) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader.read_until(delimiter, &mut bytes)?;
        if bytes.last() == Some(&delimiter) {
            bytes.pop();
        }
        Ok(bytes)
    }
}

/// Whitespace as understood by C `isspace` in the default locale.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Significant digits used when printing floats.
const FLOAT_PRECISION: i32 = 6;

/// Format a float in `%g` style with six significant digits.
///
/// Fixed notation is used for decimal exponents in `-4..6`, scientific
/// otherwise; trailing zeros are removed. `2.5`, `3`, `0.333333`, `1e+10`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to the target precision can bump the exponent (999999.5 -> 1e+06),
    // so take the exponent from the rounded scientific form.
    let sci = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (FLOAT_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
