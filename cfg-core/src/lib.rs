//! cfg Core Parser
//!
//! Single-pass parser and in-memory settings table for a line-oriented
//! `key=value` configuration format with four value kinds: integers,
//! decimals, double-quoted strings, and booleans.
//!
//! # Architecture
//!
//! - **parser.rs** - Cursor-tracking single-pass scanner
//! - **value.rs** - Kind/Value types, classifier, validators
//! - **table.rs** - Setting and the ordered settings table
//! - **error.rs** - Error codes and diagnostics
//! - **span.rs** - Location type
//! - **loader.rs** - File acquisition for `Config::load`
//!
//! # Example
//!
//! ```
//! use cfg_core::Config;
//!
//! let config = Config::parse(b"bpm = 120\nname = \"drummer\" # artist\n").unwrap();
//! assert_eq!(config.get_integer("bpm").unwrap(), 120);
//! assert_eq!(config.get_str("name").unwrap(), "drummer");
//! ```

pub mod error;
mod loader;
pub mod parser;
pub mod span;
pub mod table;
pub mod value;

pub use error::{Error, ErrorCode, Result};
pub use parser::Parser;
pub use span::Location;
pub use table::{Config, Setting};
pub use value::{Kind, Value};
