use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub openai: OpenAiSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub api_base: String,
    pub transcription_model: String,
    pub completion_model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub service_role_key: String,
}

impl Settings {
    /// Layered load: optional config files, then `TALKER`-prefixed
    /// environment variables (e.g. `TALKER__OPENAI__API_KEY`).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("TALKER"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default("openai.api_key", "")?
            .set_default("openai.api_base", "https://api.openai.com/v1")?
            .set_default("openai.transcription_model", "gpt-4o-transcribe")?
            .set_default("openai.completion_model", "gpt-4o-mini")?
            .set_default("database.url", "")?
            .set_default("database.service_role_key", "")?
            .build()?;

        config.try_deserialize()
    }

    /// The provider secrets have no usable defaults; the process must not
    /// come up without them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai.api_key.is_empty() {
            return Err(ConfigError::Message(
                "openai.api_key is not set".to_string(),
            ));
        }
        if self.database.url.is_empty() || self.database.service_role_key.is_empty() {
            return Err(ConfigError::Message(
                "database.url or database.service_role_key is not set".to_string(),
            ));
        }
        Ok(())
    }
}
