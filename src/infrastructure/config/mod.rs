use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::speech::Credentials;
use crate::infrastructure::rate_limit::RateLimitPolicy;
use crate::infrastructure::repositories::elevenlabs_speech_repository::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    // ElevenLabs
    pub eleven_api_key: Option<String>,
    pub eleven_voice_id: Option<String>,
    pub eleven_api_base_url: String,
    // Static client
    pub static_dir: PathBuf,
    // Rate limiting
    pub rate_limit_points: u32,
    pub rate_limit_duration_secs: u64,
    pub rate_limit_max_keys: u64,
    pub trust_proxy: bool,
    pub body_limit_bytes: usize,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5173)?,
            eleven_api_key: lookup("ELEVEN_API_KEY"),
            eleven_voice_id: lookup("ELEVEN_VOICE_ID"),
            eleven_api_base_url: lookup("ELEVEN_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            rate_limit_points: parse_or(&lookup, "RATE_LIMIT_POINTS", 60)?,
            rate_limit_duration_secs: parse_or(&lookup, "RATE_LIMIT_DURATION_SECS", 60)?,
            rate_limit_max_keys: parse_or(&lookup, "RATE_LIMIT_MAX_KEYS", 100_000)?,
            trust_proxy: lookup("TRUST_PROXY")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", 2 * 1024 * 1024)?,
            log_format: lookup("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        if config.rate_limit_duration_secs == 0 {
            bail!("RATE_LIMIT_DURATION_SECS must be greater than zero");
        }

        Ok(config)
    }

    /// Provider credentials, if both are set
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.eleven_api_key.clone(), self.eleven_voice_id.clone())
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            points: self.rate_limit_points,
            duration: Duration::from_secs(self.rate_limit_duration_secs),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", name, raw)),
        None => Ok(default),
    }
}
