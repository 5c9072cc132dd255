use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TriggerError>;

/// Unified error type for the acquisition-to-decision pipeline.
///
/// A window that has not yet filled is not an error and is reported as
/// `CycleOutcome::NotReady` by the driver instead.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Configuration rejected at startup, before any loop iteration runs.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The acquisition source failed to deliver samples. The driver retries
    /// on the next scheduled iteration and gives up once the failure
    /// persists past its configured limit.
    #[error("signal source unavailable: {0}")]
    SourceUnavailable(String),

    /// The key sink rejected a press-and-release request.
    #[error("key sink failure: {0}")]
    Sink(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
