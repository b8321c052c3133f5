use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::algorithm::Algorithm;
use super::output::write_atomically;
use crate::error::{CodecError, Result};
use crate::tools::cli::Opts;
use crate::tools::report::Report;

/// Put in front of the file name of a restored file so it never lands on top of the source.
pub const RESTORED_PREFIX: &str = "decompressed-";

/// Where decompress() puts its output: the artifact's directory, the name with the codec
/// extension removed and RESTORED_PREFIX added. "dir/notes.txt.lz77" becomes
/// "dir/decompressed-notes.txt".
pub fn restored_path(artifact: &Path) -> Result<PathBuf> {
    Algorithm::from_extension(artifact)?;
    let stem = artifact.file_stem().ok_or_else(|| {
        CodecError::InvalidFormat(format!("{} has no file name", artifact.display()))
    })?;
    let mut name = OsString::from(RESTORED_PREFIX);
    name.push(stem);
    Ok(artifact.with_file_name(name))
}

/// Decompress an artifact with the codec its extension names. The output replaces any earlier
/// restored file of the same name. Returns the output path.
///
/// An unknown extension is rejected before anything is opened or created.
pub fn decompress(artifact: &Path) -> Result<PathBuf> {
    let destination = restored_path(artifact)?;
    decompress_to(artifact, &destination, true)?;
    Ok(destination)
}

/// Decompress `artifact` into `destination`. Returns the restored length.
pub fn decompress_to(artifact: &Path, destination: &Path, overwrite: bool) -> Result<u64> {
    let algorithm = Algorithm::from_extension(artifact)?;
    let fin = File::open(artifact)?;
    info!(
        "Decompressing {} with {} into {}",
        artifact.display(),
        algorithm,
        destination.display()
    );
    let written = write_atomically(destination, overwrite, |fout| algorithm.decode(fin, fout))?;
    debug!("Restored {} bytes to {}", written, destination.display());
    Ok(written)
}

/// Decode an artifact without writing anything, to check that it is intact. Returns the
/// restored length.
pub fn test_file(artifact: &Path) -> Result<u64> {
    let algorithm = Algorithm::from_extension(artifact)?;
    let fin = File::open(artifact)?;
    let len = algorithm.decode(fin, io::sink())?;
    info!("{} is a valid {} artifact of {} bytes", artifact.display(), algorithm, len);
    Ok(len)
}

/// Decompress one file as the command line asked.
pub fn decompress_file(opts: &Opts, artifact: &Path) -> Result<Report> {
    let destination = match &opts.output {
        Some(path) => {
            Algorithm::from_extension(artifact)?;
            path.clone()
        }
        None => restored_path(artifact)?,
    };
    let len = fs::metadata(artifact)?.len();
    let written = decompress_to(artifact, &destination, opts.force_overwrite)?;
    Ok(Report::new(len, written))
}

#[cfg(test)]
mod test {
    use super::{decompress, decompress_file, decompress_to, restored_path, test_file};
    use crate::error::CodecError;
    use crate::tools::cli::Opts;
    use std::fs;
    use std::path::Path;

    #[test]
    fn restored_path_test() {
        assert_eq!(
            restored_path(Path::new("dir/notes.txt.lz77")).unwrap(),
            Path::new("dir/decompressed-notes.txt")
        );
        assert_eq!(
            restored_path(Path::new("data.huffman")).unwrap(),
            Path::new("decompressed-data")
        );
        assert!(matches!(
            restored_path(Path::new("notes.txt")),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn unknown_extension_creates_nothing_test() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("archive.zip");
        fs::write(&src, b"\x01\x02\x03").unwrap();

        assert!(matches!(decompress(&src), Err(CodecError::InvalidFormat(_))));
        assert!(matches!(
            decompress_to(&src, &dir.path().join("out"), true),
            Err(CodecError::InvalidFormat(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unknown_extension_of_missing_file_test() {
        // The extension is judged before the file is looked at
        assert!(matches!(
            decompress(Path::new("no/such/file.gz")),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rle_artifact_test() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("runs.txt.rle");
        fs::write(&src, [3, b'x', 1, b'y', 2, b'z']).unwrap();

        let restored = decompress(&src).unwrap();
        assert_eq!(restored, dir.path().join("decompressed-runs.txt"));
        assert_eq!(fs::read(restored).unwrap(), b"xxxyzz");
    }

    #[test]
    fn corrupt_artifact_writes_nothing_test() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bad.txt.lz77");
        // Literal 'a', then a match reaching back 9 characters into nothing
        fs::write(&src, [0, b'a', 1, 0, 9, 0, 3]).unwrap();

        assert!(matches!(decompress(&src), Err(CodecError::CorruptStream(_))));
        assert!(!dir.path().join("decompressed-bad.txt").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.huffman");
        fs::write(&good, [1, 0, b'q', 0, 7]).unwrap();
        assert_eq!(test_file(&good).unwrap(), 7);

        let bad = dir.path().join("bad.huffman");
        fs::write(&bad, [9, 9, 9]).unwrap();
        assert!(matches!(test_file(&bad), Err(CodecError::CorruptStream(_))));

        // Testing never leaves output behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn missing_artifact_test() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            decompress(&dir.path().join("gone.rle")),
            Err(CodecError::IoFailure(_))
        ));
    }

    #[test]
    fn decompress_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("runs.rle");
        fs::write(&src, [5, b'k']).unwrap();
        fs::write(dir.path().join("decompressed-runs"), b"stale").unwrap();

        let mut opts = Opts::new();
        assert!(matches!(
            decompress_file(&opts, &src),
            Err(CodecError::IoFailure(_))
        ));

        opts.force_overwrite = true;
        let report = decompress_file(&opts, &src).unwrap();
        assert_eq!(report.source_len, 2);
        assert_eq!(report.artifact_len, 5);
        assert_eq!(fs::read(dir.path().join("decompressed-runs")).unwrap(), b"kkkkk");

        opts.output = Some(dir.path().join("elsewhere.txt"));
        decompress_file(&opts, &src).unwrap();
        assert_eq!(fs::read(dir.path().join("elsewhere.txt")).unwrap(), b"kkkkk");
    }
}
