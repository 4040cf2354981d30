use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::pipeline::summarize::{SummarizeConfig, DEFAULT_CHUNK_CHARS, DEFAULT_GEMINI_BASE_URL};

/// Application-level constants
pub const APP_NAME: &str = "TenderDigest";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_PACING_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,tenderdigest_lib=info,reqwest=warn"
}

/// Get the application data directory (~/TenderDigest/)
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database location
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("tenders.db")
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Which record store backs the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite { path: PathBuf },
    Redis { url: String, prefix: String },
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model_name: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
    pub store: StoreBackend,
    pub max_chunk_chars: usize,
    pub pacing: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GOOGLE_API_KEY")
            .ok_or_else(|| ConfigError::MissingVar("GOOGLE_API_KEY".into()))?;

        let store = match get("TENDER_STORE").as_deref().unwrap_or("sqlite") {
            "sqlite" => StoreBackend::Sqlite {
                path: get("TENDER_DB_PATH").map(PathBuf::from).unwrap_or_else(default_db_path),
            },
            "redis" => StoreBackend::Redis {
                url: get("REDIS_URL").ok_or_else(|| ConfigError::MissingVar("REDIS_URL".into()))?,
                prefix: get("REDIS_KEY_PREFIX").unwrap_or_default(),
            },
            other => {
                return Err(ConfigError::InvalidValue {
                    var: "TENDER_STORE".into(),
                    value: other.to_string(),
                })
            }
        };

        let max_chunk_chars = parse_number(&get, "TENDER_CHUNK_CHARS", DEFAULT_CHUNK_CHARS as u64)?;
        if max_chunk_chars == 0 {
            return Err(ConfigError::InvalidValue {
                var: "TENDER_CHUNK_CHARS".into(),
                value: "0".into(),
            });
        }

        Ok(Self {
            api_key,
            model_name: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout_secs: parse_number(&get, "GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            store,
            max_chunk_chars: max_chunk_chars as usize,
            pacing: Duration::from_secs(parse_number(&get, "TENDER_PACING_SECS", DEFAULT_PACING_SECS)?),
        })
    }

    pub fn summarize_config(&self) -> SummarizeConfig {
        SummarizeConfig {
            model_name: self.model_name.clone(),
            max_chunk_chars: self.max_chunk_chars,
            pacing: self.pacing,
        }
    }
}

fn parse_number<G>(get: &G, var: &str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = config_from(&[("GOOGLE_API_KEY", "secret")]).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.max_chunk_chars, 50_000);
        assert_eq!(config.pacing, Duration::from_secs(30));
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.store, StoreBackend::Sqlite { path: default_db_path() });
    }

    #[test]
    fn missing_api_key_is_error() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::MissingVar("GOOGLE_API_KEY".into())
        );
        assert!(config_from(&[("GOOGLE_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("TENDER_DB_PATH", "/tmp/t.db"),
            ("TENDER_CHUNK_CHARS", "1000"),
            ("TENDER_PACING_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.model_name, "gemini-1.5-flash");
        assert_eq!(config.store, StoreBackend::Sqlite { path: PathBuf::from("/tmp/t.db") });

        let summarize = config.summarize_config();
        assert_eq!(summarize.max_chunk_chars, 1000);
        assert_eq!(summarize.pacing, Duration::ZERO);
        assert_eq!(summarize.model_name, "gemini-1.5-flash");
    }

    #[test]
    fn redis_backend_requires_url() {
        let err = config_from(&[("GOOGLE_API_KEY", "k"), ("TENDER_STORE", "redis")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("REDIS_URL".into()));

        let config = config_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("TENDER_STORE", "redis"),
            ("REDIS_URL", "redis://127.0.0.1/"),
        ])
        .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Redis { url: "redis://127.0.0.1/".into(), prefix: String::new() }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("GOOGLE_API_KEY", "k"), ("TENDER_PACING_SECS", "soon")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config_from(&[("GOOGLE_API_KEY", "k"), ("TENDER_CHUNK_CHARS", "0")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config_from(&[("GOOGLE_API_KEY", "k"), ("TENDER_STORE", "mysql")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with(APP_NAME));
        assert!(default_db_path().starts_with(app_data_dir()));
    }
}
