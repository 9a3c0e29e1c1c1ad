/// Inbound events, one variant per handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A message posted in a chat the bot can read.
    NewMessage { chat_id: i64, text: String },
    /// A later edit of a posted message.
    EditedMessage { chat_id: i64, text: String },
    /// A slash command sent to the bot in a private chat.
    Command { chat_id: i64, sender_id: Option<i64>, text: String },
}

impl Event {
    pub fn chat_id(&self) -> i64 {
        match self {
            Event::NewMessage { chat_id, .. }
            | Event::EditedMessage { chat_id, .. }
            | Event::Command { chat_id, .. } => *chat_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::NewMessage { .. } => "new_message",
            Event::EditedMessage { .. } => "edited_message",
            Event::Command { .. } => "command",
        }
    }
}
