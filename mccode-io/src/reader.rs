//! Reading McCode data files from disk.
//!

use crate::{Error, Result};
use mccode_core::DatFile;
use std::fs;
use std::path::Path;

/// Reads and parses a McCode `.dat` file.
///
/// The whole file is read at once. The recorded source is the canonical
/// absolute path of the file.
///
/// # Errors
/// Returns an error if the path does not name an existing regular file, it
/// cannot be read, or its contents do not parse.
pub fn read_mccode_dat<P: AsRef<Path>>(path: P) -> Result<DatFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }

    let source = fs::canonicalize(path)?;
    let text = fs::read_to_string(&source)?;
    log::debug!("read {} bytes from {}", text.len(), source.display());
    Ok(DatFile::from_text(source, &text)?)
}
