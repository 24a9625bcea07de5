use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
pub const DEFAULT_STABILITY: f64 = 0.55;
pub const DEFAULT_SIMILARITY_BOOST: f64 = 0.85;
pub const DEFAULT_STYLE: f64 = 0.2;

/// Body of POST /api/tts, as sent by the client.
///
/// Parsing is lenient: fields with the wrong JSON type are treated as absent so that
/// the handler, not the extractor, decides which error the caller sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisRequest {
    pub text: Option<String>,
    pub model: Option<String>,
    pub voice_settings: VoiceSettingsOverrides,
}

/// Caller-supplied voice settings; every field is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<f64>,
}

/// Voice settings as sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
}

/// A validated request, ready for the provider
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisJob {
    pub text: String,
    pub model: String,
    pub voice_settings: VoiceSettings,
}

/// Provider credentials. Only constructed when both values are present and non-blank.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    pub voice_id: String,
}

impl SynthesisRequest {
    /// Parse a raw request body. Anything that is not a JSON object yields an empty request.
    pub fn from_json_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let text = object.get("text").and_then(Value::as_str).map(str::to_string);
        let model = object.get("model").and_then(Value::as_str).map(str::to_string);
        let voice_settings = object
            .get("voice_settings")
            .map(VoiceSettingsOverrides::from_value)
            .unwrap_or_default();

        Self {
            text,
            model,
            voice_settings,
        }
    }
}

impl VoiceSettingsOverrides {
    fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_f64);
        Self {
            stability: field("stability"),
            similarity_boost: field("similarity_boost"),
            style: field("style"),
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            style: DEFAULT_STYLE,
            use_speaker_boost: true,
        }
    }
}

impl VoiceSettings {
    /// Caller values win per field; speaker boost is always on.
    pub fn merged(overrides: VoiceSettingsOverrides) -> Self {
        let defaults = Self::default();
        Self {
            stability: overrides.stability.unwrap_or(defaults.stability),
            similarity_boost: overrides
                .similarity_boost
                .unwrap_or(defaults.similarity_boost),
            style: overrides.style.unwrap_or(defaults.style),
            use_speaker_boost: true,
        }
    }
}

impl Credentials {
    pub fn from_parts(api_key: Option<String>, voice_id: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|v| !v.trim().is_empty())?;
        let voice_id = voice_id.filter(|v| !v.trim().is_empty())?;
        Some(Self { api_key, voice_id })
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("voice_id", &self.voice_id)
            .finish()
    }
}
