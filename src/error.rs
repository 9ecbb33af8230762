//! Crate error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the ingestion layer.
///
/// Per-line parse failures are not errors: bad lines are skipped with a
/// diagnostic and ingestion continues. Only whole-file problems reach
/// this type, and the session boundary softens even those into an empty
/// store rather than letting them escape a reload.
#[derive(Debug, Error)]
pub enum Error {
    /// The log file could not be read (missing, unreadable, or not
    /// valid UTF-8).
    #[error("cannot read log file {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
