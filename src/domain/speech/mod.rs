pub mod dto;
pub mod error;
pub mod service;

pub use dto::{
    Credentials, SynthesisJob, SynthesisRequest, VoiceSettings, VoiceSettingsOverrides,
    DEFAULT_MODEL,
};
pub use error::SpeechError;
pub use service::{SpeechService, SpeechServiceApi};
