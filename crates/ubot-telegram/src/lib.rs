//! Telegram adapter (teloxide).
//!
//! This crate implements the `ubot-core` MessagingPort over the Telegram Bot API
//! and runs the long-polling loop.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

use tokio::time::sleep;

pub mod error_handler;
pub mod handlers;
pub mod router;

use ubot_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::ReplyKeyboard},
    Result,
};

use crate::error_handler::fault_from_request;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Transport(fault_from_request(&e))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::warn!("flood control hit, retrying in {d:?}");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// One button per row, in the keyboard's order.
pub fn keyboard_markup(keyboard: &ReplyKeyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = keyboard
        .buttons
        .iter()
        .map(|label| vec![KeyboardButton::new(label.clone())])
        .collect();
    let markup = KeyboardMarkup::new(rows);
    if keyboard.resize {
        markup.resize_keyboard(true)
    } else {
        markup
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_reply_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: ReplyKeyboard,
    ) -> Result<MessageRef> {
        let markup = keyboard_markup(&keyboard);

        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), text.to_string())
                    .reply_markup(markup.clone())
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}
