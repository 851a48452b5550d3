//! Error types for script export.

use jute_dag::DagError;

/// Errors that can occur while rendering or writing a script.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The vote graph or order could not be computed.
    #[error("dag error: {0}")]
    Dag(#[from] DagError),

    /// Writing the script to its destination failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for export results.
pub type ExportResult<T> = Result<T, ExportError>;
