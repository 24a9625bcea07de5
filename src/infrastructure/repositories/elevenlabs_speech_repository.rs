use super::speech_repository::{AudioStream, SpeechRepository};
use crate::domain::speech::{Credentials, SpeechError, SynthesisJob, VoiceSettings};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;
use serde::Serialize;
use std::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// 44.1 kHz, 128 kbps MP3
const OUTPUT_FORMAT: &str = "mp3_44100_128";
const OPTIMIZE_STREAMING_LATENCY: &str = "2";

#[derive(Debug, Serialize)]
struct ElevenLabsSynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs implementation of the speech repository
pub struct ElevenLabsSpeechRepository {
    http_client: reqwest::Client,
    base_url: String,
}

impl ElevenLabsSpeechRepository {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn synthesis_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(voice_id)
        )
    }
}

#[async_trait]
impl SpeechRepository for ElevenLabsSpeechRepository {
    async fn stream_speech(
        &self,
        credentials: &Credentials,
        job: &SynthesisJob,
    ) -> Result<AudioStream, SpeechError> {
        let start_time = Instant::now();

        tracing::info!(
            provider = "elevenlabs",
            model = %job.model,
            voice_id = %credentials.voice_id,
            text_length = job.text.len(),
            "Calling speech provider"
        );

        let body = ElevenLabsSynthesisBody {
            text: &job.text,
            model_id: &job.model,
            voice_settings: job.voice_settings,
        };

        let response = self
            .http_client
            .post(self.synthesis_url(&credentials.voice_id))
            .query(&[
                ("optimize_streaming_latency", OPTIMIZE_STREAMING_LATENCY),
                ("output_format", OUTPUT_FORMAT),
            ])
            .header("xi-api-key", &credentials.api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The detail is best-effort; a failed read must not hide the upstream status.
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(
                provider = "elevenlabs",
                status = status.as_u16(),
                latency_ms = start_time.elapsed().as_millis(),
                detail = %detail,
                "Speech provider returned an error"
            );
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::info!(
            provider = "elevenlabs",
            status = status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Speech provider accepted request, streaming audio"
        );

        Ok(response.bytes_stream().map_err(SpeechError::from).boxed())
    }
}
