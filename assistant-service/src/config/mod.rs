use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

use crate::services::providers::gemini::GEMINI_API_BASE;
use crate::services::weather::openweather::OPEN_WEATHER_BASE_URL;

const DEFAULT_UPLOAD_MAX_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub weather: WeatherConfig,
    pub uploads: UploadConfig,
    pub extractor: ExtractorConfig,
    /// Request timeout applied to both upstream HTTP clients.
    pub upstream_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model for text generation (e.g., gemini-2.5-flash)
    pub text_model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    pub pdftotext_bin: String,
    pub timeout_secs: u64,
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        common_config.port = port_override("PORT", common_config.port)?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AssistantConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
                api_base: get_env("GENAI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-2.5-flash"), is_prod)?,
                temperature: parse_env("GENAI_TEMPERATURE", "0.2", is_prod)?,
            },
            weather: WeatherConfig {
                api_key: get_env("OPEN_WEATHER_API_KEY", None, is_prod)?,
                base_url: get_env("OPEN_WEATHER_BASE_URL", Some(OPEN_WEATHER_BASE_URL), is_prod)?,
            },
            uploads: UploadConfig {
                dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?,
                max_bytes: parse_env(
                    "UPLOAD_MAX_BYTES",
                    &DEFAULT_UPLOAD_MAX_BYTES.to_string(),
                    is_prod,
                )?,
            },
            extractor: ExtractorConfig {
                pdftotext_bin: get_env("PDFTOTEXT_BIN", Some("pdftotext"), is_prod)?,
                timeout_secs: parse_env("EXTRACTOR_TIMEOUT_SECS", "30", is_prod)?,
            },
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", "60", is_prod)?,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn extractor_timeout(&self) -> Duration {
        Duration::from_secs(self.extractor.timeout_secs)
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}

/// A set `PORT` wins over `APP__PORT` and the configuration file.
fn port_override(key: &str, configured: u16) -> Result<u16, AppError> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e))),
        Err(_) => Ok(configured),
    }
}
