use std::fs::File;
use std::io;
use std::path::Path;

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::Result;

/// Write a destination file all at once or not at all.
///
/// `write` fills a temporary file next to `destination`, which is renamed into place only after
/// `write` has succeeded. On any failure the temporary file is removed and `destination` is left
/// as it was. Without `overwrite` an existing destination is an `AlreadyExists` error.
pub(crate) fn write_atomically<F>(destination: &Path, overwrite: bool, write: F) -> Result<u64>
where
    F: FnOnce(&mut File) -> Result<u64>,
{
    if !overwrite && destination.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists, use --force to overwrite", destination.display()),
        )
        .into());
    }

    let dir = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    debug!("Writing through {}", temp.path().display());

    let written = write(temp.as_file_mut())?;

    if overwrite {
        if destination.exists() {
            warn!("Overwriting {}", destination.display());
        }
        temp.persist(destination).map_err(|e| e.error)?;
    } else {
        temp.persist_noclobber(destination).map_err(|e| e.error)?;
    }
    Ok(written)
}
