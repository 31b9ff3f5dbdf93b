//! File acquisition for [`Config::load`].
//!
//! The loader performs exactly one blocking read before the parser runs;
//! parsing itself never touches I/O. The parser only needs a stable,
//! length-bounded byte view, so a full buffered read suffices.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, ErrorCode, Result};
use crate::parser::Parser;
use crate::table::Config;

impl Config {
    /// Load and parse a configuration file.
    ///
    /// An empty file is an error (`SizeFailed`). Parse errors carry the
    /// path in their detail text.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| {
            Error::new(ErrorCode::OpenFailed, format!("{}: {}", path.display(), e))
        })?;

        let size = file
            .metadata()
            .map_err(|e| {
                Error::new(ErrorCode::SizeFailed, format!("{}: {}", path.display(), e))
            })?
            .len();
        if size == 0 {
            return Err(Error::new(
                ErrorCode::SizeFailed,
                path.display().to_string(),
            ));
        }

        let mut buf = Vec::with_capacity(size as usize);
        file.read_to_end(&mut buf).map_err(|e| {
            Error::new(ErrorCode::ReadFailed, format!("{}: {}", path.display(), e))
        })?;

        let mut config = Self::new();
        config.set_path(path.to_path_buf());
        Parser::new(&buf)
            .parse_into(&mut config)
            .map_err(|e| e.prefix_detail(&format!("{}: ", path.display())))?;

        Ok(config)
    }
}
