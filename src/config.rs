//! Bot configuration - read once at process start

use std::path::Path;

use crate::core::paths::offset;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid { name: &'static str, expected: &'static str, value: String },
    #[error("prediction offset must be between {min} and {max}, got {0}", min = offset::MIN, max = offset::MAX)]
    OffsetOutOfRange(u32),
}

/// Accept only offsets in `offset::MIN..=offset::MAX`.
pub fn validate_offset(value: u32) -> Result<u32, ConfigError> {
    if (offset::MIN..=offset::MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OffsetOutOfRange(value))
    }
}

/// Bot configuration. `from_env` for the binary, builders for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub bot_token: String,
    pub source_channel: i64,
    pub prediction_channel: i64,
    pub admin_id: Option<i64>,
    pub prediction_offset: u32,
    pub port: u16,
    pub api_base: String,
}

impl BotConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            source_channel: 0,
            prediction_channel: 0,
            admin_id: None,
            prediction_offset: offset::DEFAULT,
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.into(),
        }
    }
    pub fn with_source_channel(mut self, id: i64) -> Self { self.source_channel = id; self }
    pub fn with_prediction_channel(mut self, id: i64) -> Self { self.prediction_channel = id; self }
    pub fn with_admin(mut self, id: i64) -> Self { self.admin_id = Some(id); self }
    pub fn with_offset(mut self, value: u32) -> Self { self.prediction_offset = value; self }
    pub fn with_port(mut self, port: u16) -> Self { self.port = port; self }
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self { self.api_base = url.into(); self }

    /// Build from process environment. Missing credentials are fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let source_channel = get("SOURCE_CHANNEL_ID")
            .ok_or(ConfigError::Missing("SOURCE_CHANNEL_ID"))
            .and_then(|v| parse("SOURCE_CHANNEL_ID", "chat id", v))?;
        let prediction_channel = get("PREDICTION_CHANNEL_ID")
            .ok_or(ConfigError::Missing("PREDICTION_CHANNEL_ID"))
            .and_then(|v| parse("PREDICTION_CHANNEL_ID", "chat id", v))?;
        let admin_id = get("ADMIN_ID").map(|v| parse("ADMIN_ID", "user id", v)).transpose()?;
        let prediction_offset = match get("PREDICTION_OFFSET") {
            Some(v) => validate_offset(parse("PREDICTION_OFFSET", "integer", v)?)?,
            None => offset::DEFAULT,
        };
        let port = match get("PORT") {
            Some(v) => parse("PORT", "port", v)?,
            None => DEFAULT_PORT,
        };
        let api_base = get("TELEGRAM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());

        Ok(Self {
            bot_token,
            source_channel,
            prediction_channel,
            admin_id,
            prediction_offset,
            port,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, expected: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { name, expected, value })
}

/// Load `KEY=value` lines from a dotenv file. Variables already present in
/// the environment win. Returns the number of variables set.
pub fn load_dotenv(path: impl AsRef<Path>) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else { return 0 };
    let mut loaded = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"');
            if !key.is_empty() && !value.is_empty() && std::env::var(key).is_err() {
                std::env::set_var(key, value);
                loaded += 1;
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("BOT_TOKEN", "123:abc"),
        ("SOURCE_CHANNEL_ID", "-1002682552255"),
        ("PREDICTION_CHANNEL_ID", "-1003853896752"),
    ];

    #[test]
    fn defaults_apply() {
        let config = BotConfig::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.source_channel, -1002682552255);
        assert_eq!(config.prediction_offset, 2);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.admin_id, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&BASE[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOT_TOKEN"));
    }

    #[test]
    fn offset_is_bounded() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PREDICTION_OFFSET", "11"));
        assert_eq!(BotConfig::from_lookup(lookup(&pairs)).unwrap_err(), ConfigError::OffsetOutOfRange(11));

        let mut pairs = BASE.to_vec();
        pairs.push(("PREDICTION_OFFSET", "three"));
        assert!(matches!(
            BotConfig::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid { name: "PREDICTION_OFFSET", .. }
        ));
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = BASE.to_vec();
        pairs.extend([("ADMIN_ID", "1190237801"), ("PORT", "8080"), ("TELEGRAM_API_BASE", "http://localhost:9/")]);
        let config = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.admin_id, Some(1190237801));
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, "http://localhost:9");
    }
}
