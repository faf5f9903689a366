//! Telegram update handlers.
//!
//! Each message is converted into a messenger-neutral `InboundEvent`, routed by
//! the core dispatcher and answered through the messaging port. Send failures are
//! returned to teloxide, which hands them to the error callback.

use std::sync::Arc;

use teloxide::types::Message;

use ubot_core::{
    domain::{ChatId, UserId},
    messaging::{port::deliver, types::InboundEvent},
    Error,
};

use crate::router::AppState;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> Result<(), Error> {
    let event = inbound_event(&msg);

    let Some(reply) = state.dispatcher.handle(&event) else {
        tracing::debug!(chat_id = event.chat_id.0, kind = ?event.kind, "no reply");
        return Ok(());
    };

    deliver(state.messenger.as_ref(), reply).await?;
    Ok(())
}

fn inbound_event(msg: &Message) -> InboundEvent {
    let chat_id = ChatId(msg.chat.id.0);
    let sender = msg.from().map(|u| UserId(u.id.0 as i64));

    match msg.text() {
        Some(text) => InboundEvent::text(chat_id, sender, text),
        None => InboundEvent::other(chat_id, sender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubot_core::messaging::types::EventKind;

    fn message(json: &str) -> Message {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_becomes_text_event() {
        let msg = message(
            r#"{
                "message_id": 10,
                "date": 1700000000,
                "chat": {"id": -100500, "type": "group", "title": "utils"},
                "from": {"id": 77, "is_bot": false, "first_name": "Ann"},
                "text": "3 4.5 -2"
            }"#,
        );

        let event = inbound_event(&msg);
        assert_eq!(event.kind, EventKind::Text);
        assert_eq!(event.text, "3 4.5 -2");
        assert_eq!(event.chat_id, ChatId(-100500));
        assert_eq!(event.sender, Some(UserId(77)));
        assert_eq!(event.reply_target(), ChatId(77));
    }

    #[test]
    fn captioned_photo_becomes_other_event() {
        let msg = message(
            r#"{
                "message_id": 11,
                "date": 1700000000,
                "chat": {"id": 77, "type": "private", "first_name": "Ann"},
                "from": {"id": 77, "is_bot": false, "first_name": "Ann"},
                "photo": [
                    {"file_id": "AgAD", "file_unique_id": "AQAD", "width": 90, "height": 90, "file_size": 1024}
                ],
                "caption": "1 2 3"
            }"#,
        );

        let event = inbound_event(&msg);
        assert_eq!(event.kind, EventKind::Other);
        assert!(event.text.is_empty());
        assert!(ubot_core::dispatch::Dispatcher::default()
            .handle(&event)
            .is_none());
    }
}
