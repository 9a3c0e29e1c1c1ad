//! Update decoding: Bot API update JSON → reactor [`Event`]

use serde::Deserialize;
use serde_json::Value;

use crate::reactor::Event;

/// Offset Telegram applies to broadcast channel ids in the Bot API.
const CHANNEL_ID_OFFSET: i64 = -1_000_000_000_000;

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<Message>,
    edited_message: Option<Message>,
    channel_post: Option<Message>,
    edited_channel_post: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
}

impl Message {
    fn body(self) -> Option<String> {
        self.text.or(self.caption).filter(|t| !t.is_empty())
    }
}

pub fn update_id(update: &Value) -> Option<i64> {
    update.get("update_id").and_then(Value::as_i64)
}

/// Broadcast channels sometimes surface with their bare positive id.
pub fn normalize_chat_id(id: i64, kind: &str) -> i64 {
    if kind == "channel" && id > 0 {
        CHANNEL_ID_OFFSET - id
    } else {
        id
    }
}

/// Decode one update. Updates without text (service messages, media
/// without caption, unknown kinds) yield `None`.
pub fn parse_update(update: &Value) -> Option<Event> {
    let update: Update = serde_json::from_value(update.clone()).ok()?;

    if let Some(message) = update.channel_post.or(update.message) {
        let chat_id = normalize_chat_id(message.chat.id, &message.chat.kind);
        let is_private = message.chat.kind == "private";
        let sender_id = message.from.as_ref().map(|u| u.id);
        let text = message.body()?;
        if is_private && text.starts_with('/') {
            return Some(Event::Command { chat_id, sender_id, text });
        }
        return Some(Event::NewMessage { chat_id, text });
    }

    let message = update.edited_channel_post.or(update.edited_message)?;
    let chat_id = normalize_chat_id(message.chat.id, &message.chat.kind);
    let text = message.body()?;
    Some(Event::EditedMessage { chat_id, text })
}
