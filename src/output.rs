//! Output persistence
//!
//! The write happens once, after the entire buffer has been rendered — a
//! failed run never leaves a partial file behind.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Persists rendered text at `path`
pub fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))
}
