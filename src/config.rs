//! Configuration management for Bill Page Bot

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::LoadMode;
use crate::telegram::DEFAULT_API_URL;

/// Where the bill PDF is downloaded from when no local copy exists
pub const DEFAULT_DOCUMENT_URL: &str = "https://limewire.com/d/zpbkv#3z348wSYbx";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOKEN is not set; export the Telegram bot token as TOKEN")]
    MissingToken,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub mapping: MappingConfig,
    pub document: DocumentConfig,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MappingConfig {
    pub path: PathBuf,
    pub mode: LoadMode,
}

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub path: PathBuf,
    /// `None` disables the startup download
    pub url: Option<String>,
    pub fetch_timeout_secs: u64,
    pub open_timeout_secs: u64,
    pub extract_timeout_secs: u64,
    /// Requests allowed to hold the parsed document at once
    pub max_concurrent: usize,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key -> value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let number = |key: &str, default: u64| -> u64 {
            match lookup(key) {
                None => default,
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    tracing::warn!("Invalid {}={:?}, using {}", key, raw, default);
                    default
                }),
            }
        };

        let mode = match lookup("MAPPING_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("lenient") => LoadMode::Lenient,
            Some("strict") => LoadMode::Strict,
            Some(other) => {
                tracing::warn!("Unknown MAPPING_MODE={:?}, using lenient", other);
                LoadMode::Lenient
            }
        };

        let url = match lookup("DOCUMENT_URL") {
            None => Some(DEFAULT_DOCUMENT_URL.to_string()),
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url.trim().to_string()),
        };

        Ok(Config {
            telegram: TelegramConfig {
                token,
                api_url: lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                poll_timeout_secs: number("POLL_TIMEOUT_SECS", 30),
            },
            mapping: MappingConfig {
                path: lookup("MAPPING_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("consumers.csv")),
                mode,
            },
            document: DocumentConfig {
                path: lookup("DOCUMENT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("bills.pdf")),
                url,
                fetch_timeout_secs: number("FETCH_TIMEOUT_SECS", 120),
                open_timeout_secs: number("OPEN_TIMEOUT_SECS", 30),
                extract_timeout_secs: number("EXTRACT_TIMEOUT_SECS", 30),
                max_concurrent: number("MAX_CONCURRENT_REQUESTS", 4).max(1) as usize,
            },
        })
    }
}
