//! # Configuration Module
//!
//! Runtime settings read from the environment (and `.env` via `dotenv`).

use std::fmt;

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::localization::DEFAULT_LANGUAGE;
use crate::translation::DEFAULT_TRANSLATE_URL;

/// Languages the bot's own texts are available in
pub const SUPPORTED_BOT_LANGUAGES: &[&str] = &["ru", "en"];

/// Default language retrieved recipe text is translated into
pub const DEFAULT_TARGET_LANGUAGE: &str = "ru";

/// Errors that can occur when loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set to a value we cannot use.
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} must be set", name),
            Self::Invalid { name, value } => write!(f, "invalid value for {}: '{}'", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub bot_token: String,
    pub catalog_url: String,
    pub translate_url: String,
    /// Language recipe names, instructions and ingredients are translated into
    pub target_language: String,
    /// Language of the bot's own messages
    pub bot_language: String,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let catalog_url = get("THEMEALDB_API_URL")
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let translate_url =
            get("TRANSLATE_API_URL").unwrap_or_else(|| DEFAULT_TRANSLATE_URL.to_string());

        let target_language =
            get("TRANSLATE_TARGET_LANG").unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

        let bot_language = get("BOT_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        if !SUPPORTED_BOT_LANGUAGES.contains(&bot_language.as_str()) {
            return Err(ConfigError::Invalid {
                name: "BOT_LANGUAGE",
                value: bot_language,
            });
        }

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bot_token,
            catalog_url,
            translate_url,
            target_language,
            bot_language,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.translate_url, DEFAULT_TRANSLATE_URL);
        assert_eq!(config.target_language, "ru");
        assert_eq!(config.bot_language, "ru");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN")));
        assert_eq!(
            load(&[("TELEGRAM_BOT_TOKEN", "  ")]),
            Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("THEMEALDB_API_URL", "http://localhost:8080/api/"),
            ("TRANSLATE_TARGET_LANG", "de"),
            ("BOT_LANGUAGE", "en"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.catalog_url, "http://localhost:8080/api");
        assert_eq!(config.target_language, "de");
        assert_eq!(config.bot_language, "en");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("BOT_LANGUAGE", "fr")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for BOT_LANGUAGE: 'fr'");

        let err = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LOG_FORMAT", .. }));
    }
}
