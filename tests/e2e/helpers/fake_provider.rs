use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use futures::stream;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// How the fake ElevenLabs endpoint answers
#[derive(Debug, Clone)]
pub enum ProviderBehavior {
    /// 200 with the body sent in these chunks
    Audio(Vec<Vec<u8>>),
    /// Non-success status with a text body
    Error(u16, String),
    /// 200, one chunk, then the connection breaks
    FailMidStream(Vec<u8>),
}

/// One request as seen by the fake provider
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub voice_id: String,
    pub query: String,
    pub api_key: Option<String>,
    pub accept: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeProvider {
    pub base_url: String,
    state: Arc<FakeProviderState>,
}

struct FakeProviderState {
    behavior: Mutex<ProviderBehavior>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeProvider {
    pub async fn start() -> Self {
        let state = Arc::new(FakeProviderState {
            behavior: Mutex::new(ProviderBehavior::Audio(vec![b"ID3".to_vec()])),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/text-to-speech/:voice_id", post(text_to_speech))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake provider");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn respond_with(&self, behavior: ProviderBehavior) {
        *self.state.behavior.lock() = behavior;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }
}

async fn text_to_speech(
    State(state): State<Arc<FakeProviderState>>,
    Path(voice_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().push(RecordedRequest {
        voice_id,
        query: query.unwrap_or_default(),
        api_key: header("xi-api-key"),
        accept: header("accept"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let behavior = state.behavior.lock().clone();
    match behavior {
        ProviderBehavior::Audio(chunks) => {
            let chunks = chunks
                .into_iter()
                .map(|chunk| Ok::<_, std::io::Error>(Bytes::from(chunk)));
            (
                StatusCode::OK,
                [("content-type", "audio/mpeg")],
                Body::from_stream(stream::iter(chunks)),
            )
                .into_response()
        }
        ProviderBehavior::Error(status, detail) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            detail,
        )
            .into_response(),
        ProviderBehavior::FailMidStream(first_chunk) => {
            // Pause after the first chunk so it is flushed before the connection breaks.
            let body = stream::unfold((0u8, first_chunk), |(step, chunk)| async move {
                match step {
                    0 => Some((Ok(Bytes::from(chunk.clone())), (1, chunk))),
                    1 => {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        let err = std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            "provider went away",
                        );
                        Some((Err(err), (2, chunk)))
                    }
                    _ => None,
                }
            });
            (
                StatusCode::OK,
                [("content-type", "audio/mpeg")],
                Body::from_stream(body),
            )
                .into_response()
        }
    }
}
