//! Telegram transport errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure; the request URL is stripped since it embeds the token
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Bot API answered `ok: false`
    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    /// Bot API answered `ok: true` without a result
    #[error("Telegram API response missing result")]
    MissingResult,
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}
