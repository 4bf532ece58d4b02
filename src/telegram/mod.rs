//! Telegram chat transport
//!
//! Long-polls the Bot API, routes `/start` and `/help` to the usage text,
//! and passes every other text message to the [`RequestHandler`](crate::handler::RequestHandler).

mod client;
mod command;
mod dispatcher;
mod error;
mod types;

pub use client::{BotClient, DEFAULT_API_URL};
pub use command::Incoming;
pub use dispatcher::{reply_for, Dispatcher};
pub use error::TelegramError;
pub use types::{Chat, Message, Update, User};
