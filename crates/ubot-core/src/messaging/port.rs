use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{OutboundReply, ReplyKeyboard},
    Result,
};

/// Outbound messenger port.
///
/// Telegram is the only implementation; handlers and tests talk to this trait.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_reply_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: ReplyKeyboard,
    ) -> Result<MessageRef>;
}

/// Send one reply through the port, picking the keyboard variant when needed.
pub async fn deliver(port: &dyn MessagingPort, reply: OutboundReply) -> Result<MessageRef> {
    match reply.keyboard {
        Some(keyboard) => {
            port.send_reply_keyboard(reply.chat_id, &reply.body, keyboard)
                .await
        }
        None => port.send_text(reply.chat_id, &reply.body).await,
    }
}
