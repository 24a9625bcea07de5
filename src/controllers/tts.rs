use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use futures::{stream, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;

use crate::{
    domain::speech::{SpeechService, SpeechServiceApi, SynthesisRequest},
    error::AppResult,
    infrastructure::repositories::AudioStream,
};

pub struct TtsController {
    speech_service: Arc<SpeechService>,
}

impl TtsController {
    pub fn new(speech_service: Arc<SpeechService>) -> Self {
        Self { speech_service }
    }

    /// POST /api/tts - Proxy text to the speech provider and stream the MP3 back
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        body: Bytes,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let request = SynthesisRequest::from_json_slice(&body);

        let audio = controller.speech_service.synthesize(request).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

        Ok((StatusCode::OK, headers, Body::from_stream(relay_audio(audio))))
    }
}

/// Forward provider chunks as they arrive.
///
/// An upstream failure ends the body instead of erroring it, so the client sees a
/// truncated but well-formed response. Dropping the returned stream (client gone)
/// drops the upstream response and releases its connection.
pub fn relay_audio(
    upstream: AudioStream,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream::unfold((upstream, 0usize), |(mut upstream, relayed)| async move {
        match upstream.next().await {
            Some(Ok(chunk)) => {
                let relayed = relayed + chunk.len();
                Some((Ok::<_, Infallible>(chunk), (upstream, relayed)))
            }
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    bytes_relayed = relayed,
                    "Upstream audio stream failed, ending response"
                );
                None
            }
            None => {
                tracing::info!(bytes_relayed = relayed, "Audio relay completed");
                None
            }
        }
    })
}
