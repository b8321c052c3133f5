use std::fmt::{Display, Formatter};

/// Size statistics for one processed file, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Length of the file that was read
    pub source_len: u64,
    /// Length of the file that was written
    pub artifact_len: u64,
}

impl Report {
    pub fn new(source_len: u64, artifact_len: u64) -> Self {
        Self {
            source_len,
            artifact_len,
        }
    }

    /// Space saved as a percentage of the source. Negative when the artifact grew.
    /// An empty source saves nothing.
    pub fn ratio(&self) -> f64 {
        if self.source_len == 0 {
            return 0.0;
        }
        (1.0 - self.artifact_len as f64 / self.source_len as f64) * 100.0
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Original size: {} bytes, Result size: {} bytes, Compression: {:.1}%",
            self.source_len,
            self.artifact_len,
            self.ratio()
        )
    }
}
