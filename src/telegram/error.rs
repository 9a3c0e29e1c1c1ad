//! Bot API error: HTTP status, Telegram `error_code` and description

use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TelegramApiError {
    /// Request never produced a response (DNS, connect, timeout, ...).
    #[error("transport: {0}")]
    Transport(String),
    /// Telegram answered with `ok: false` or a non-2xx status.
    #[error("{method} rejected (status={status:?}, error_code={error_code:?}): {description}")]
    Rejected {
        method: String,
        status: Option<StatusCode>,
        error_code: Option<i64>,
        retry_after_secs: Option<u64>,
        description: String,
    },
    /// 2xx with a body that is not a Bot API envelope.
    #[error("{method}: unreadable response: {body}")]
    Malformed { method: String, body: String },
}

impl TelegramApiError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("timed out: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }

    pub fn from_envelope(method: &str, status: Option<StatusCode>, data: &Value, fallback: &str) -> Self {
        Self::Rejected {
            method: method.to_string(),
            status,
            error_code: error_code(data),
            retry_after_secs: retry_after_secs(data),
            description: description(data, fallback).to_string(),
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::Rejected { error_code, status, .. } => {
                error_code.or_else(|| status.map(|s| i64::from(s.as_u16())))
            }
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Rejected { retry_after_secs, .. } => *retry_after_secs,
            _ => None,
        }
    }

    /// 401/403: the token is wrong or the bot was removed. Polling stops.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.error_code(), Some(401) | Some(403))
    }

    /// 409: another process is polling with the same token.
    pub fn is_conflict(&self) -> bool {
        self.error_code() == Some(409)
    }

    /// Markdown entity errors, answered by resending without parse_mode.
    pub fn is_parse_error(&self) -> bool {
        let Self::Rejected { description, .. } = self else { return false };
        if self.error_code() != Some(400) {
            return false;
        }
        let normalized = description.to_ascii_lowercase();
        normalized.contains("can't parse")
            || normalized.contains("can't find end")
            || normalized.contains("wrong entity")
    }
}

pub(crate) fn retry_after_secs(data: &Value) -> Option<u64> {
    data.get("parameters")
        .and_then(|v| v.get("retry_after"))
        .and_then(Value::as_u64)
}

pub(crate) fn error_code(data: &Value) -> Option<i64> {
    data.get("error_code").and_then(Value::as_i64)
}

pub(crate) fn description<'a>(data: &'a Value, fallback: &'a str) -> &'a str {
    data.get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}
