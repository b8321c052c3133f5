use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::algorithm::{Algorithm, Codec};
use super::output::write_atomically;
use crate::error::{CodecError, Result};
use crate::tools::cli::Opts;
use crate::tools::report::Report;

/// The artifact name for `source`: its full path with the codec's extension appended.
pub fn artifact_path(source: &Path, algorithm: &Algorithm) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".");
    name.push(algorithm.extension());
    PathBuf::from(name)
}

/// Compress a file with the codec chosen for its size. The artifact is written next to it and
/// replaces any earlier artifact of the same name. Returns the artifact path.
pub fn compress(source: &Path) -> Result<PathBuf> {
    compress_with(source, None)
}

/// As compress(), but with the codec family fixed when `requested` is set.
pub fn compress_with(source: &Path, requested: Option<Codec>) -> Result<PathBuf> {
    let len = source_len(source)?;
    let algorithm = Algorithm::select(len, requested);
    let destination = artifact_path(source, &algorithm);
    compress_to(source, &destination, algorithm, true)?;
    Ok(destination)
}

/// Compress `source` into `destination` with a specific codec. Returns the artifact length.
pub fn compress_to(
    source: &Path,
    destination: &Path,
    algorithm: Algorithm,
    overwrite: bool,
) -> Result<u64> {
    let fin = File::open(source)?;
    info!(
        "Compressing {} with {} into {}",
        source.display(),
        algorithm,
        destination.display()
    );
    let written = write_atomically(destination, overwrite, |fout| algorithm.encode(fin, fout))?;
    debug!("Wrote {} bytes to {}", written, destination.display());
    Ok(written)
}

/// Compress one file as the command line asked. An output path must carry the extension of the
/// codec that is used, since decompression has nothing else to go by.
pub fn compress_file(opts: &Opts, source: &Path) -> Result<Report> {
    let len = source_len(source)?;
    let algorithm = Algorithm::select(len, opts.algorithm);
    let destination = match &opts.output {
        Some(path) => {
            if path.extension().and_then(|ext| ext.to_str()) != Some(algorithm.extension()) {
                return Err(CodecError::InvalidFormat(format!(
                    "{} would hold {} data but does not end in .{}",
                    path.display(),
                    algorithm,
                    algorithm.extension()
                )));
            }
            path.clone()
        }
        None => artifact_path(source, &algorithm),
    };
    let written = compress_to(source, &destination, algorithm, opts.force_overwrite)?;
    Ok(Report::new(len, written))
}

fn source_len(source: &Path) -> Result<u64> {
    let metadata = fs::metadata(source)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", source.display()),
        )
        .into());
    }
    Ok(metadata.len())
}
