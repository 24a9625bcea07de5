pub mod elevenlabs_speech_repository;
pub mod speech_repository;

pub use elevenlabs_speech_repository::ElevenLabsSpeechRepository;
pub use speech_repository::{AudioStream, SpeechRepository};
