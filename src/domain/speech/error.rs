use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech provider credentials are not configured")]
    Misconfigured,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("provider rejected request with status {status}")]
    Upstream { status: u16, detail: String },
    #[error("provider transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Transport(err.to_string())
    }
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Misconfigured => AppError::ServerMisconfigured,
            SpeechError::Invalid(msg) => AppError::InvalidInput(msg),
            SpeechError::Upstream { status, detail } => AppError::Upstream { status, detail },
            SpeechError::Transport(msg) => AppError::Internal(msg),
        }
    }
}
