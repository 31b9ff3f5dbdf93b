//! Single-pass scanner for the line-oriented `key=value` format.
//!
//! The parser walks the buffer exactly once, left to right, tracking
//! byte offset, line, and column. Each meaningful line is segmented into
//! an identifier token (everything up to `=`) and a value token
//! (everything up to `#`, newline, or end of buffer), both trimmed of
//! trailing horizontal whitespace. The value token is classified by its
//! first byte and appended to the table; the first invalid token aborts
//! the whole parse.
//!
//! End-of-value scanning is not string-literal-aware: a `#` inside a
//! double-quoted value still truncates the token, which then fails
//! string validation.

use crate::error::{Error, ErrorCode, Result};
use crate::span::Location;
use crate::table::{Config, Setting};
use crate::value::{is_identifier_valid, Value};

/// Horizontal whitespace: insignificant outside quotes, does not end a line.
#[inline]
fn is_horizontal_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}

/// Trim trailing horizontal whitespace from a token span.
fn trim_trailing_ws(token: &[u8]) -> &[u8] {
    let mut end = token.len();
    while end > 0 && is_horizontal_ws(token[end - 1]) {
        end -= 1;
    }
    &token[..end]
}

/// Single-pass parser over a raw byte buffer.
///
/// The buffer need not be null-terminated or valid UTF-8; the parser
/// never reads past its length. One parser instance performs one parse.
#[derive(Debug)]
pub struct Parser<'a> {
    buf: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current cursor position, for diagnostics.
    #[inline]
    pub fn location(&self) -> Location {
        Location::new(self.line, self.col)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Advance one byte, keeping line/column in step.
    #[inline]
    fn bump(&mut self) {
        if self.buf[self.pos] == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
    }

    fn skip_horizontal_ws(&mut self) {
        while self.peek().is_some_and(is_horizontal_ws) {
            self.bump();
        }
    }

    /// Skip a `#` comment up to (not including) the newline that ends it.
    fn skip_comment(&mut self) {
        match memchr::memchr(b'\n', &self.buf[self.pos..]) {
            Some(i) => {
                self.pos += i;
                self.col += i as u32;
            }
            None => {
                self.col += (self.buf.len() - self.pos) as u32;
                self.pos = self.buf.len();
            }
        }
    }

    /// Parse the whole buffer, appending validated settings to `config`.
    ///
    /// Aborts at the first structural or type error. Settings appended
    /// before the failing line remain in the table.
    pub fn parse_into(&mut self, config: &mut Config) -> Result<()> {
        while let Some(b) = self.peek() {
            match b {
                // Forward the cursor until something meaningful.
                b' ' | b'\t' | b'\r' => self.bump(),
                b'\n' => self.bump(),
                b'#' => self.skip_comment(),
                _ => self.parse_setting(config)?,
            }
        }

        Ok(())
    }

    /// Parse one `identifier = value` pair starting at the cursor.
    fn parse_setting(&mut self, config: &mut Config) -> Result<()> {
        let id_location = self.location();
        let id_start = self.pos;

        // Scan to the assignment delimiter. A newline reached first ends
        // up inside the span and fails identifier validation below.
        while self.peek().is_some_and(|b| b != b'=') {
            self.bump();
        }

        let identifier = trim_trailing_ws(&self.buf[id_start..self.pos]);
        if !is_identifier_valid(identifier) {
            return Err(Error::at(
                ErrorCode::InvalidIdentifier,
                String::from_utf8_lossy(identifier),
                id_location,
            ));
        }

        // Past the `=`, then skip whitespace ahead of the value.
        if self.peek() == Some(b'=') {
            self.bump();
        }
        self.skip_horizontal_ws();

        let value_location = self.location();
        let value_start = self.pos;

        // The value runs to a comment marker, newline, or end of buffer.
        // No quote awareness here: `#` truncates even inside strings.
        while self.peek().is_some_and(|b| b != b'\n' && b != b'#') {
            self.bump();
        }

        let token = trim_trailing_ws(&self.buf[value_start..self.pos]);
        if token.is_empty() {
            // Identifier with no value at all, including a missing `=`
            // at end of buffer.
            return Err(Error::at(
                ErrorCode::InvalidValue,
                String::from_utf8_lossy(identifier),
                value_location,
            ));
        }

        match Value::classify(token) {
            Ok(value) => {
                let identifier = String::from_utf8_lossy(identifier).into_owned();
                config.insert(Setting::new(identifier, value));
                Ok(())
            }
            Err(code) => Err(Error::at(
                code,
                String::from_utf8_lossy(token),
                value_location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use pretty_assertions::assert_eq;

    fn parse(input: &[u8]) -> Result<Config> {
        let mut config = Config::new();
        Parser::new(input).parse_into(&mut config)?;
        Ok(config)
    }

    #[test]
    fn test_single_setting() {
        let config = parse(b"bpm = 120\n").unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("bpm"), Some(&Value::Integer(120)));
    }

    #[test]
    fn test_value_at_end_of_buffer() {
        // No trailing newline: the value is the last thing in the file.
        let config = parse(b"buffer.content=808").unwrap();
        assert_eq!(config.get("buffer.content"), Some(&Value::Integer(808)));
    }

    #[test]
    fn test_whitespace_tolerance() {
        let config = parse(b"  key\t =  \t\"v\" \r\n").unwrap();
        assert_eq!(config.get("key"), Some(&Value::String("v".to_owned())));
    }

    #[test]
    fn test_trailing_comment() {
        let config = parse(b"key = 5 # note\n").unwrap();
        assert_eq!(config.get("key"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_full_line_comment() {
        let config = parse(b"# just a comment\nkey = 1\n").unwrap();
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_comment_without_trailing_newline() {
        let config = parse(b"key = 1\n# trailing comment").unwrap();
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let config = parse(b"").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_blank_lines_only() {
        let config = parse(b"\n\n  \t\r\n\n").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_invalid_identifier() {
        let err = parse(b"bad key = 1\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
        assert_eq!(err.detail(), "bad key");
    }

    #[test]
    fn test_invalid_identifier_leaves_table_empty() {
        let mut config = Config::new();
        let err = Parser::new(b"bad key = 1\n")
            .parse_into(&mut config)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
        assert_eq!(config.len(), 0);
    }

    #[test]
    fn test_settings_before_failure_survive() {
        let mut config = Config::new();
        let err = Parser::new(b"a = 1\nb = 2\nc = nope\n")
            .parse_into(&mut config)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("b"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_error_location() {
        let err = parse(b"a = 1\nb = 1.2.3\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDecimal);
        let loc = err.location().unwrap();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 5);
        assert_eq!(err.detail(), "1.2.3");
    }

    #[test]
    fn test_empty_value_is_invalid() {
        let err = parse(b"key =\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);

        let err = parse(b"key =").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);

        // Value trimmed down to nothing.
        let err = parse(b"key =   \t\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }

    #[test]
    fn test_identifier_without_assignment() {
        // No `=` before end of buffer: the scan runs to EOF and the
        // empty-value policy reports it.
        let err = parse(b"justakey").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);

        // With a newline in between, the span picks up the newline and
        // fails identifier validation instead.
        let err = parse(b"justakey\nother = 1\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_non_utf8_input() {
        // The buffer may hold arbitrary bytes; they surface as validation
        // failures, never as panics or reads past the buffer.
        let err = parse(b"caf\xE9 = 1\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIdentifier);

        let err = parse(b"greeting = \"caf\xE9\"\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidString);
    }

    #[test]
    fn test_comment_truncates_quoted_value() {
        // End-of-value scanning is not quote-aware, so the `#` cuts the
        // token to `"a` which fails string validation.
        let err = parse(b"s = \"a#b\"\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidString);
        assert_eq!(err.detail(), "\"a");
    }

    #[test]
    fn test_duplicate_identifiers_kept_in_order() {
        let config = parse(b"k = 1\nk = 2\n").unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("k"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_ordering_preserved() {
        let config = parse(b"name = \"drummer\"\nbpm = 120\nactive = true\nratio = 0.5\n").unwrap();
        let kinds: Vec<Kind> = config.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![Kind::String, Kind::Integer, Kind::Boolean, Kind::Decimal]
        );
    }
}
