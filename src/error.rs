//! Error types shared by every codec and by the file-level selector.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while compressing or decompressing a file.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The artifact's extension does not name a known codec. Raised before any file is opened.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Underlying read or write failure, including truncated input.
    #[error("IO failure: {0}")]
    IoFailure(#[from] io::Error),

    /// The compressed data is structurally impossible for its codec.
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),
}

impl CodecError {
    pub(crate) fn corrupt<S: Into<String>>(msg: S) -> Self {
        CodecError::CorruptStream(msg.into())
    }
}

/// Result type alias for txzip operations
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod test {
    use super::CodecError;
    use std::io;

    #[test]
    fn display_test() {
        let err = CodecError::InvalidFormat("notes.zip".to_string());
        assert_eq!(err.to_string(), "Invalid format: notes.zip");
        let err = CodecError::corrupt("offset 0");
        assert_eq!(err.to_string(), "Corrupt stream: offset 0");
    }

    #[test]
    fn io_conversion_test() {
        fn fails() -> super::Result<()> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short read"))?;
            Ok(())
        }
        match fails() {
            Err(CodecError::IoFailure(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected IoFailure, got {:?}", other),
        }
    }
}
