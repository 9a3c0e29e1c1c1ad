//! Telegram Bot API client - reqwest JSON calls
//!
//! Minimal surface: the calls the bot makes and nothing else.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::error::TelegramApiError;
use crate::notifier::{Messenger, ParseMode};
use crate::store::MessageRef;

pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Server-side long-poll wait for `getUpdates`.
pub const POLL_TIMEOUT_SECS: u64 = 25;

fn build_http_client() -> reqwest::Client {
    match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!(%error, "HTTP client with timeouts unavailable; using defaults");
            reqwest::Client::new()
        }
    }
}

/// Bot identity from `getMe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self { http: build_http_client(), base: base.into(), token: token.into() }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base.trim_end_matches('/'), self.token, method)
    }

    /// POST `method` and return the envelope's `result`.
    pub async fn call(&self, method: &str, body: &Value) -> Result<Value, TelegramApiError> {
        self.call_with_timeout(method, body, None).await
    }

    async fn call_with_timeout(
        &self,
        method: &str,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<Value, TelegramApiError> {
        let mut request = self.http.post(self.api_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(TelegramApiError::from_reqwest)?;
        let status = response.status();
        let body_text = response.text().await.map_err(TelegramApiError::from_reqwest)?;
        read_envelope(method, status, &body_text)
    }

    pub async fn get_me(&self) -> Result<BotIdentity, TelegramApiError> {
        let result = self.call("getMe", &json!({})).await?;
        Ok(BotIdentity {
            id: result.get("id").and_then(Value::as_i64).unwrap_or_default(),
            username: result.get("username").and_then(Value::as_str).map(String::from),
        })
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Value>, TelegramApiError> {
        let body = json!({
            "offset": offset,
            "timeout": POLL_TIMEOUT_SECS,
            "allowed_updates": ["message", "edited_message", "channel_post", "edited_channel_post"],
        });
        let timeout = Duration::from_secs(POLL_TIMEOUT_SECS + HTTP_CONNECT_TIMEOUT_SECS);
        let result = self.call_with_timeout("getUpdates", &body, Some(timeout)).await?;
        Ok(result.as_array().cloned().unwrap_or_default())
    }

    async fn send(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<MessageRef, TelegramApiError> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if mode == ParseMode::Markdown {
            body["parse_mode"] = json!("Markdown");
        }
        let result = self.call("sendMessage", &body).await?;
        result
            .get("message_id")
            .and_then(Value::as_i64)
            .map(MessageRef)
            .ok_or_else(|| TelegramApiError::Malformed {
                method: "sendMessage".into(),
                body: result.to_string(),
            })
    }
}

fn read_envelope(method: &str, status: reqwest::StatusCode, body_text: &str) -> Result<Value, TelegramApiError> {
    let parsed = serde_json::from_str::<Value>(body_text).ok();

    if !status.is_success() {
        let data = parsed.unwrap_or(Value::Null);
        return Err(TelegramApiError::from_envelope(method, Some(status), &data, body_text));
    }

    let Some(mut data) = parsed else {
        return Err(TelegramApiError::Malformed { method: method.into(), body: body_text.into() });
    };

    let ok = data.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if !ok {
        return Err(TelegramApiError::from_envelope(method, Some(status), &data, body_text));
    }
    Ok(data.get_mut("result").map(Value::take).unwrap_or(Value::Null))
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> anyhow::Result<MessageRef> {
        match self.send(chat_id, text, mode).await {
            Ok(message) => Ok(message),
            Err(e) if mode == ParseMode::Markdown && e.is_parse_error() => {
                tracing::warn!(error = %e, "Markdown rejected; resending as plain text");
                Ok(self.send(chat_id, text, ParseMode::Plain).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn edit_message(&self, chat_id: i64, message: MessageRef, text: &str) -> anyhow::Result<()> {
        let body = json!({ "chat_id": chat_id, "message_id": message.0, "text": text });
        self.call("editMessageText", &body).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message: MessageRef) -> anyhow::Result<()> {
        self.call("deleteMessage", &json!({ "chat_id": chat_id, "message_id": message.0 })).await?;
        Ok(())
    }

    async fn chat_title(&self, chat_id: i64) -> anyhow::Result<String> {
        let chat = self.call("getChat", &json!({ "chat_id": chat_id })).await?;
        Ok(chat
            .get("title")
            .or_else(|| chat.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn api_url_embeds_token() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:abc");
        assert_eq!(client.api_url("getMe"), "https://api.telegram.org/bot123:abc/getMe");
    }

    #[test]
    fn envelope_result_is_unwrapped() {
        let result = read_envelope("sendMessage", StatusCode::OK, r#"{"ok":true,"result":{"message_id":77}}"#).unwrap();
        assert_eq!(result["message_id"], 77);
    }

    #[test]
    fn envelope_errors() {
        let err = read_envelope(
            "editMessageText",
            StatusCode::BAD_REQUEST,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: message to edit not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), Some(400));
        assert!(err.to_string().contains("message to edit not found"));

        let err = read_envelope("getMe", StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, TelegramApiError::Malformed { .. }));

        let err = read_envelope("getMe", StatusCode::UNAUTHORIZED, "Unauthorized").unwrap_err();
        assert!(err.is_unauthorized());
    }
}
