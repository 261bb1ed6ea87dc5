use thiserror::Error;

/// Schedule-file loading failures. Always recovered locally: callers fall
/// back to [`crate::schedule::ScheduleConfig::default`] and log the cause.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse schedule file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid send_time {0:?}, expected HH:MM")]
    InvalidSendTime(String),
}

/// Data-provider failures. Abort the current pass only; the scheduler does
/// not retry until the next natural trigger.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("data source unreachable: {0}")]
    Connection(String),

    #[error("candidate query failed: {0}")]
    Query(String),

    #[error("row decode failed: {0}")]
    Decode(String),
}

/// Per-recipient delivery failures. Recovered locally inside a pass; one
/// recipient's failure never aborts the remaining recipients.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("message render failed: {0}")]
    Render(String),

    #[error("message build failed: {0}")]
    Build(String),

    #[error("transport failed: {0}")]
    Transport(String),
}
