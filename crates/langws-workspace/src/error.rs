use std::io;

use thiserror::Error;

/// Failure of a workspace operation.
///
/// Errors are never downgraded or retried: the first one aborts the operation
/// and is surfaced as-is.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Listing a directory or reading a file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The build step rejected the document set.
    #[error(transparent)]
    Build(#[from] anyhow::Error),
}
