use crate::domain::speech::{Credentials, SpeechError, SynthesisJob};
use async_trait::async_trait;
use axum::body::Bytes;
use futures::stream::BoxStream;

/// Audio body as it arrives from the provider
pub type AudioStream = BoxStream<'static, Result<Bytes, SpeechError>>;

/// Repository for streaming speech synthesis.
/// Abstracts the underlying TTS provider (ElevenLabs, or a fake in tests).
///
/// Implementations make exactly one provider call per invocation and never retry.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Start synthesis and return once the provider has answered.
    ///
    /// On success the returned stream yields MP3 chunks as the provider sends them.
    ///
    /// # Errors
    /// `SpeechError::Upstream` when the provider answers with a non-success status,
    /// `SpeechError::Transport` when it cannot be reached.
    async fn stream_speech(
        &self,
        credentials: &Credentials,
        job: &SynthesisJob,
    ) -> Result<AudioStream, SpeechError>;
}
