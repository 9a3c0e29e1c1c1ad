//! Config Tests: dotenv loading and environment-driven configuration

use baccarat_oracle::config::{load_dotenv, BotConfig, ConfigError, DEFAULT_PORT};
use once_cell::sync::Lazy;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner())
}

const KEYS: &[&str] = &[
    "BOT_TOKEN",
    "SOURCE_CHANNEL_ID",
    "PREDICTION_CHANNEL_ID",
    "ADMIN_ID",
    "PREDICTION_OFFSET",
    "PORT",
    "TELEGRAM_API_BASE",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

fn dotenv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

/// Test: a dotenv file fills the environment and feeds from_env
#[test]
fn dotenv_feeds_config() {
    let _guard = lock_env();
    clear_env();

    let file = dotenv(
        "# bot\n\
         BOT_TOKEN=\"123:abc\"\n\
         SOURCE_CHANNEL_ID=-1002682552255\n\
         export PREDICTION_CHANNEL_ID=-1002543915361\n\
         \n\
         ADMIN_ID=1190237801\n\
         PREDICTION_OFFSET=3\n",
    );
    assert_eq!(load_dotenv(file.path()), 5);

    let config = BotConfig::from_env().expect("config");
    assert_eq!(config.bot_token, "123:abc");
    assert_eq!(config.source_channel, -1002682552255);
    assert_eq!(config.prediction_channel, -1002543915361);
    assert_eq!(config.admin_id, Some(1190237801));
    assert_eq!(config.prediction_offset, 3);
    assert_eq!(config.port, DEFAULT_PORT);
    clear_env();
}

/// Test: variables already set win over the dotenv file
#[test]
fn existing_env_wins() {
    let _guard = lock_env();
    clear_env();
    std::env::set_var("PORT", "8080");

    let file = dotenv("PORT=9000\nADMIN_ID=7\n");
    assert_eq!(load_dotenv(file.path()), 1);
    assert_eq!(std::env::var("PORT").unwrap(), "8080");
    assert_eq!(std::env::var("ADMIN_ID").unwrap(), "7");
    clear_env();
}

/// Test: a missing file loads nothing
#[test]
fn missing_dotenv_is_ignored() {
    let _guard = lock_env();
    let dir = tempfile::TempDir::new().expect("tempdir");
    assert_eq!(load_dotenv(dir.path().join("absent.env")), 0);
}

/// Test: missing credentials and bad offsets are fatal
#[test]
fn invalid_environment_is_rejected() {
    let _guard = lock_env();
    clear_env();

    assert!(matches!(BotConfig::from_env(), Err(ConfigError::Missing("BOT_TOKEN"))));

    std::env::set_var("BOT_TOKEN", "123:abc");
    std::env::set_var("SOURCE_CHANNEL_ID", "-100");
    std::env::set_var("PREDICTION_CHANNEL_ID", "-200");
    std::env::set_var("PREDICTION_OFFSET", "0");
    assert!(matches!(BotConfig::from_env(), Err(ConfigError::OffsetOutOfRange(0))));

    std::env::set_var("PREDICTION_OFFSET", "2");
    std::env::set_var("SOURCE_CHANNEL_ID", "source");
    assert!(matches!(BotConfig::from_env(), Err(ConfigError::Invalid { name: "SOURCE_CHANNEL_ID", .. })));
    clear_env();
}
