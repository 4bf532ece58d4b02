//! Long-polling update loop
//!
//! Pulls updates from the Bot API and hands every text message to the
//! request handler on its own task, so a slow extraction in one chat never
//! holds up another. The handler caps how many of those tasks touch the
//! document at once. Replies are threaded under the inbound message. A
//! failed reply is logged and dropped; the user can resend the number.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::client::BotClient;
use super::command::Incoming;
use super::types::Update;
use crate::handler::{Reply, RequestHandler, Stage};

/// Pause after a failed `getUpdates` before polling again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Dispatcher {
    bot: BotClient,
    handler: Arc<RequestHandler>,
    poll_timeout_secs: u64,
}

impl Dispatcher {
    pub fn new(bot: BotClient, handler: Arc<RequestHandler>, poll_timeout_secs: u64) -> Self {
        Self {
            bot,
            handler,
            poll_timeout_secs,
        }
    }

    /// Poll until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = 0;

        tracing::info!("Bot started, polling for updates");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Stopping update loop");
                    break;
                }
                result = self.bot.get_updates(offset, self.poll_timeout_secs) => match result {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            self.dispatch(update);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "getUpdates failed, retrying in {:?}",
                            POLL_RETRY_DELAY
                        );
                        tokio::select! {
                            _ = &mut shutdown => {
                                tracing::info!("Stopping update loop");
                                break;
                            }
                            _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }
    }

    fn dispatch(&self, update: Update) {
        let Some(inbound) = Inbound::from_update(update) else {
            return;
        };
        tracing::debug!(
            chat_id = inbound.chat_id,
            message_id = inbound.message_id,
            user_id = inbound.user_id,
            username = inbound.username.as_deref(),
            "Incoming message"
        );

        let bot = self.bot.clone();
        let handler = self.handler.clone();

        tokio::spawn(async move {
            let Some(reply) = reply_for(&handler, &inbound.text).await else {
                return;
            };
            deliver(&bot, inbound.chat_id, inbound.message_id, reply).await;
        });
    }
}

/// The parts of a text message the bot acts on
#[derive(Debug, Clone, PartialEq, Eq)]
struct Inbound {
    chat_id: i64,
    message_id: i64,
    user_id: Option<i64>,
    username: Option<String>,
    text: String,
}

impl Inbound {
    /// `None` for updates without a text message
    fn from_update(update: Update) -> Option<Self> {
        let message = update.message?;
        let text = message.text?;

        Some(Self {
            chat_id: message.chat.id,
            message_id: message.message_id,
            user_id: message.from.as_ref().map(|user| user.id),
            username: message.from.and_then(|user| user.username),
            text,
        })
    }
}

/// Reply for one inbound text, `None` for ignored commands
pub async fn reply_for(handler: &RequestHandler, text: &str) -> Option<Reply> {
    match Incoming::classify(text) {
        Incoming::Usage => Some(Reply::usage()),
        Incoming::UnknownCommand(name) => {
            tracing::debug!(command = name, "Ignoring unknown command");
            None
        }
        Incoming::Lookup(identifier) => Some(handler.respond(identifier).await),
    }
}

async fn deliver(bot: &BotClient, chat_id: i64, message_id: i64, reply: Reply) {
    match reply {
        Reply::Text(text) => {
            if let Err(e) = bot.send_message(chat_id, Some(message_id), &text).await {
                tracing::warn!(chat_id, error = %e, "Failed to send text reply");
            }
        }
        Reply::Document(attachment) => match bot
            .send_document(chat_id, Some(message_id), &attachment)
            .await
        {
            Ok(()) => tracing::info!(
                chat_id,
                identifier = %attachment.identifier,
                stage = %Stage::Sent,
                "Bill delivered"
            ),
            Err(e) => tracing::error!(
                chat_id,
                identifier = %attachment.identifier,
                error = %e,
                "Failed to send bill document"
            ),
        },
    }
}
