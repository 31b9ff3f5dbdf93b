//! Setting value types with syntactic typing.
//!
//! The first byte of a value token determines its kind - `-` or a digit
//! starts a number, `"` a string, `t`/`f` a boolean. No value sniffing
//! beyond that: classification stays single-pass with zero lookahead
//! past the already-delimited token.

use std::fmt;

use crate::error::ErrorCode;

/// The kind tag distinguishing the four value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// 64-bit signed integer: `42`, `-17`
    Integer,
    /// Decimal number: `3.14`, `-0.5`
    Decimal,
    /// Double-quoted string: `"hello"`
    String,
    /// Boolean literal: `true` or `false` (lowercase only)
    Boolean,
}

impl Kind {
    /// Name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed setting value.
///
/// The tag and payload are one: a setting can never claim one kind and
/// hold another.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer: `42`, `-17`
    Integer(i64),
    /// Decimal: `3.14`, `-0.5`
    Decimal(f64),
    /// String contents between the delimiting quotes, copied verbatim
    /// (no escape processing; must be valid UTF-8)
    String(String),
    /// Boolean: `true` or `false`
    Boolean(bool),
}

impl Value {
    /// The kind tag for this value.
    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Integer(_) => Kind::Integer,
            Self::Decimal(_) => Kind::Decimal,
            Self::String(_) => Kind::String,
            Self::Boolean(_) => Kind::Boolean,
        }
    }

    /// Try to get as integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as decimal.
    #[inline]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get as string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Classify and convert a trimmed value token.
    ///
    /// Dispatches on the first byte:
    /// - `-` or digit: number; a single `.` anywhere makes it a Decimal,
    ///   otherwise Integer
    /// - `"`: string, requiring a closing quote; contents are copied
    ///   verbatim with no escape processing, and must be valid UTF-8 -
    ///   a payload that is not is rejected as `InvalidString`
    /// - `t`/`f`: the whole token must be exactly `true` or `false`
    /// - anything else (including an empty token): no kind can be inferred
    pub fn classify(token: &[u8]) -> Result<Value, ErrorCode> {
        match token.first() {
            Some(b'-' | b'0'..=b'9') => Self::classify_number(token),
            Some(b'"') => Self::classify_string(token),
            Some(b't' | b'f') => match token {
                b"true" => Ok(Value::Boolean(true)),
                b"false" => Ok(Value::Boolean(false)),
                _ => Err(ErrorCode::InvalidBoolean),
            },
            _ => Err(ErrorCode::InvalidValue),
        }
    }

    fn classify_number(token: &[u8]) -> Result<Value, ErrorCode> {
        // The dot decides both the target kind and which code a syntax
        // violation reports.
        let has_dot = memchr::memchr(b'.', token).is_some();

        if !is_number_syntax_valid(token) {
            return Err(if has_dot {
                ErrorCode::InvalidDecimal
            } else {
                ErrorCode::InvalidInteger
            });
        }

        if has_dot {
            parse_decimal(token).map(Value::Decimal)
        } else {
            parse_integer(token).map(Value::Integer)
        }
    }

    fn classify_string(token: &[u8]) -> Result<Value, ErrorCode> {
        if token.len() < 2 || token[0] != b'"' || token[token.len() - 1] != b'"' {
            return Err(ErrorCode::InvalidString);
        }

        let contents = &token[1..token.len() - 1];
        let s = std::str::from_utf8(contents).map_err(|_| ErrorCode::InvalidString)?;
        Ok(Value::String(s.to_owned()))
    }
}

impl fmt::Display for Value {
    /// Type-appropriate rendering as it appears in a dump: strings
    /// re-quoted, decimals fixed-point with six fractional digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Decimal(d) => write!(f, "{:.6}", d),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

/// Check that every byte is in the identifier whitelist `[A-Za-z0-9._-]`
/// and the token is non-empty.
pub(crate) fn is_identifier_valid(token: &[u8]) -> bool {
    !token.is_empty()
        && token
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-')
}

/// Check number syntax: digits, at most one `.`, `-` only as the very
/// first byte.
pub(crate) fn is_number_syntax_valid(token: &[u8]) -> bool {
    let mut dot_count = 0;

    for (i, &b) in token.iter().enumerate() {
        match b {
            b'0'..=b'9' => {}
            b'.' => {
                dot_count += 1;
                if dot_count > 1 {
                    return false;
                }
            }
            b'-' => {
                if i != 0 {
                    return false;
                }
            }
            _ => return false,
        }
    }

    true
}

/// Convert a syntax-validated integer token with overflow checking.
fn parse_integer(token: &[u8]) -> Result<i64, ErrorCode> {
    let (negative, digits) = if token.first() == Some(&b'-') {
        (true, &token[1..])
    } else {
        (false, token)
    };

    if digits.is_empty() {
        return Err(ErrorCode::InvalidInteger);
    }

    // Accumulate in the sign's direction so i64::MIN parses.
    let mut result: i64 = 0;
    for &b in digits {
        let digit = (b - b'0') as i64;
        result = result
            .checked_mul(10)
            .and_then(|r| {
                if negative {
                    r.checked_sub(digit)
                } else {
                    r.checked_add(digit)
                }
            })
            .ok_or(ErrorCode::OutOfRange)?;
    }

    Ok(result)
}

/// Convert a syntax-validated decimal token.
fn parse_decimal(token: &[u8]) -> Result<f64, ErrorCode> {
    if !token.iter().any(|b| b.is_ascii_digit()) {
        return Err(ErrorCode::InvalidDecimal);
    }

    // Syntax validation already restricted the token to ASCII.
    let s = std::str::from_utf8(token).map_err(|_| ErrorCode::InvalidDecimal)?;
    let value: f64 = s.parse().map_err(|_| ErrorCode::InvalidDecimal)?;

    if value.is_infinite() {
        return Err(ErrorCode::OutOfRange);
    }

    Ok(value)
}
