use crate::domain::{ChatId, UserId};

/// What an inbound update carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Text,
    /// Photos, stickers, documents, service messages and the like.
    Other,
}

/// A single inbound chat update, as seen by the dispatcher.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub sender: Option<UserId>,
    pub kind: EventKind,
    pub text: String,
}

impl InboundEvent {
    pub fn text(chat_id: ChatId, sender: Option<UserId>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender,
            kind: EventKind::Text,
            text: text.into(),
        }
    }

    pub fn other(chat_id: ChatId, sender: Option<UserId>) -> Self {
        Self {
            chat_id,
            sender,
            kind: EventKind::Other,
            text: String::new(),
        }
    }

    /// Where replies go: the sender's private chat, or the originating chat when
    /// the update has no sender (channel posts).
    pub fn reply_target(&self) -> ChatId {
        self.sender
            .map(|user| ChatId(user.0))
            .unwrap_or(self.chat_id)
    }
}

/// Reply keyboard shown under the input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    /// Button labels, rendered one per row in this order.
    pub buttons: Vec<String>,
    pub resize: bool,
}

impl ReplyKeyboard {
    /// Convenience for "one button per row" layouts, shrunk to fit the buttons.
    pub fn one_per_row<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buttons: labels.into_iter().map(Into::into).collect(),
            resize: true,
        }
    }
}

/// A reply addressed to the chat the triggering event came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: ChatId,
    pub body: String,
    pub keyboard: Option<ReplyKeyboard>,
}

impl OutboundReply {
    pub fn text(chat_id: ChatId, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            body: body.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: ReplyKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
