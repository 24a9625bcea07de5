use super::dto::{Credentials, SynthesisJob, SynthesisRequest, VoiceSettings, DEFAULT_MODEL};
use super::error::SpeechError;
use crate::infrastructure::repositories::{AudioStream, SpeechRepository};
use async_trait::async_trait;
use std::sync::Arc;

pub struct SpeechService {
    speech_repo: Arc<dyn SpeechRepository>,
    credentials: Option<Credentials>,
}

impl SpeechService {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, credentials: Option<Credentials>) -> Self {
        if credentials.is_none() {
            tracing::warn!(
                "Speech provider credentials are missing; synthesis requests will be refused"
            );
        }

        Self {
            speech_repo,
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Synthesize text to speech
    ///
    /// This operation:
    /// - Refuses the request when provider credentials are missing
    /// - Rejects blank text
    /// - Fills in the default model and voice settings
    /// - Makes a single provider call (no retries)
    ///
    /// Returns the provider's audio body as a stream
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioStream, SpeechError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioStream, SpeechError> {
        // 1. Credentials come first: a misconfigured server is never the caller's fault
        let credentials = self.credentials.as_ref().ok_or(SpeechError::Misconfigured)?;

        // 2. Validate input and apply defaults
        let job = build_job(request)?;

        tracing::info!(
            model = %job.model,
            text_length = job.text.len(),
            stability = job.voice_settings.stability,
            similarity_boost = job.voice_settings.similarity_boost,
            style = job.voice_settings.style,
            "TTS synthesis request"
        );

        // 3. One provider call
        self.speech_repo.stream_speech(credentials, &job).await
    }
}

fn build_job(request: SynthesisRequest) -> Result<SynthesisJob, SpeechError> {
    let text = request
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| SpeechError::Invalid("text is required".to_string()))?;

    Ok(SynthesisJob {
        text,
        model: request.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        voice_settings: VoiceSettings::merged(request.voice_settings),
    })
}
