use std::path::PathBuf;

/// Errors surfaced by graph ingestion, persistence and configuration.
///
/// An absent entity is never an error: lookups return `Option` and
/// descriptions carry a textual not-found message instead.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no snapshot at {}", .0.display())]
    SnapshotMissing(PathBuf),

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the "nothing saved yet" outcome of a load.
    pub fn is_missing_snapshot(&self) -> bool {
        matches!(self, Self::SnapshotMissing(_))
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
