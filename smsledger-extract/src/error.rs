use thiserror::Error;

/// Terminal outcomes of one extraction attempt. All of them mean
/// "fall back to manual entry"; none are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no message text to parse")]
    EmptyInput,

    #[error("could not detect the message format offline; enter the details manually")]
    OfflineNoMatch,

    #[error("remote extraction failed: {0}")]
    RemoteExtractionFailed(String),
}

impl ExtractionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::EmptyInput => "empty_input",
            ExtractionError::OfflineNoMatch => "offline_no_match",
            ExtractionError::RemoteExtractionFailed(_) => "remote_extraction_failed",
        }
    }
}
