//! The settings table: an append-only, order-preserving collection of
//! typed key/value entries.
//!
//! Duplicates are permitted - no dedup or overwrite - and lookup returns
//! the first match in insertion order. The table owns its entries and
//! the source path when loaded from a file; everything is released
//! together when the table is dropped.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorCode, Result};
use crate::parser::Parser;
use crate::value::{Kind, Value};

/// One typed entry produced by parsing one source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    identifier: String,
    value: Value,
}

impl Setting {
    /// Create a setting.
    pub fn new(identifier: String, value: Value) -> Self {
        Self { identifier, value }
    }

    /// The key naming this setting.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The typed value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value's kind tag.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.identifier, self.value)
    }
}

/// The ordered collection of all settings produced by one parse or load.
///
/// Callers needing concurrent use must serialize access or use
/// independent instances; there is no internal locking.
#[derive(Debug, Default)]
pub struct Config {
    settings: Vec<Setting>,
    path: Option<PathBuf>,
}

impl Config {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            settings: Vec::new(),
            path: None,
        }
    }

    /// Parse a raw buffer into a new table.
    ///
    /// The buffer need not be null-terminated; parsing never reads past
    /// its length. The first invalid token fails the whole call.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut config = Self::new();
        Parser::new(input).parse_into(&mut config)?;
        Ok(config)
    }

    /// Append a setting, preserving insertion order. Duplicate
    /// identifiers are permitted.
    pub fn insert(&mut self, setting: Setting) {
        self.settings.push(setting);
    }

    /// Look up a value by identifier: linear scan, first exact match.
    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.find(identifier).map(Setting::value)
    }

    /// Look up a value and require a specific kind.
    ///
    /// Absence is `NotFound`; presence with a different kind trips the
    /// kind guard (`Unknown`).
    pub fn get_expected(&self, identifier: &str, kind: Kind) -> Result<&Value> {
        let setting = self
            .find(identifier)
            .ok_or_else(|| Error::new(ErrorCode::NotFound, identifier))?;

        if setting.kind() != kind {
            return Err(Error::new(
                ErrorCode::Unknown,
                format!("{} is {}, not {}", identifier, setting.kind(), kind),
            ));
        }

        Ok(setting.value())
    }

    /// Get an integer setting.
    pub fn get_integer(&self, identifier: &str) -> Result<i64> {
        match self.get_expected(identifier, Kind::Integer)? {
            Value::Integer(i) => Ok(*i),
            _ => Err(Error::new(ErrorCode::Unknown, identifier)),
        }
    }

    /// Get a decimal setting.
    pub fn get_decimal(&self, identifier: &str) -> Result<f64> {
        match self.get_expected(identifier, Kind::Decimal)? {
            Value::Decimal(d) => Ok(*d),
            _ => Err(Error::new(ErrorCode::Unknown, identifier)),
        }
    }

    /// Get a string setting.
    pub fn get_str(&self, identifier: &str) -> Result<&str> {
        match self.get_expected(identifier, Kind::String)? {
            Value::String(s) => Ok(s),
            _ => Err(Error::new(ErrorCode::Unknown, identifier)),
        }
    }

    /// Get a boolean setting.
    pub fn get_bool(&self, identifier: &str) -> Result<bool> {
        match self.get_expected(identifier, Kind::Boolean)? {
            Value::Boolean(b) => Ok(*b),
            _ => Err(Error::new(ErrorCode::Unknown, identifier)),
        }
    }

    /// Probe the kind of a setting without failing; `None` when absent.
    pub fn get_kind(&self, identifier: &str) -> Option<Kind> {
        self.find(identifier).map(Setting::kind)
    }

    fn find(&self, identifier: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.identifier() == identifier)
    }

    /// Number of settings in the table.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Check if the table holds no settings.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate over settings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    /// All settings as a slice, in insertion order.
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Source path, when the table was loaded from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Render every entry as `identifier=value`, one line each, in
    /// insertion order. Strings are re-quoted, decimals rendered
    /// fixed-point; the output re-parses to an equivalent table.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for setting in &self.settings {
            writeln!(f, "{}", setting)?;
        }
        Ok(())
    }
}
