use client::ClientError;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Local-only rejection of an edit. Never reaches the transport client;
    /// the caller surfaces it as inline feedback on the offending row.
    #[error("invalid value: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// A save loop aborted mid-iteration. Rows before `failed_key` were
    /// already applied upstream and are not rolled back; the buffer still
    /// holds `failed_key` and everything after it.
    #[error("save aborted after {applied} of {total} rows at '{failed_key}': {source}")]
    PartialBatch {
        applied: usize,
        total: usize,
        failed_key: String,
        #[source]
        source: ClientError,
    },

    #[error("nothing to save")]
    NothingToSave,

    #[error("no save is awaiting confirmation")]
    NoPendingConfirmation,

    #[error("a save is already awaiting confirmation")]
    ConfirmationPending,
}
