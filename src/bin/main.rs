//! Baccarat Oracle CLI
//!
//!   baccarat-oracle serve [--port N] [--offset N]   → run the bot (default)
//!   baccarat-oracle parse <text>                    → extracted game, groups, duplicate suit as JSON
//!
//! Configuration comes from the environment (a `.env` file in the working
//! directory is loaded first):
//!   BOT_TOKEN, SOURCE_CHANNEL_ID, PREDICTION_CHANNEL_ID   (required)
//!   ADMIN_ID, PREDICTION_OFFSET, PORT, TELEGRAM_API_BASE   (optional)
//!   RUST_LOG, ORACLE_LOG_JSON                             (logging)
//!
//! Output format:
//!   --pretty   Pretty-print JSON (default for tty)

use baccarat_oracle::config::{load_dotenv, validate_offset, BotConfig};
use baccarat_oracle::core::{extract_game_number, extract_parenthesized_groups, is_finalized, paths};
use baccarat_oracle::logging::init_logging;
use baccarat_oracle::{
    create_router, find_duplicate_suit, install_signal_handlers, poll_updates, Reactor, TelegramClient,
    STARTUP_PROBE_TEXT,
};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Capacity of the update → reactor channel.
const EVENT_QUEUE: usize = 256;

fn main() {
    load_dotenv(".env");
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("{} {}", paths::SERVICE_NAME, paths::VERSION);
        return;
    }

    let result = match opts.command.as_deref() {
        Some("serve") | None => cmd_serve(&opts),
        Some("parse") => cmd_parse(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
    };

    let pretty = opts.pretty || std::io::stdout().is_terminal();
    let render = |value: &Value| {
        let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
        rendered.unwrap_or_else(|_| value.to_string())
    };

    match result {
        Ok(output) => println!("{}", render(&output)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e})));
            std::process::exit(1);
        }
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    text: Option<String>,
    port: Option<u16>,
    offset: Option<u32>,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        opts.port = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--offset" | "-o" => {
                    if i + 1 < args.len() {
                        opts.offset = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        // First positional is command, the rest is the message text
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        if !positional.is_empty() {
            opts.text = Some(positional.join(" "));
        }

        opts
    }
}

fn print_usage() {
    println!(
        r#"{name} {version}

USAGE:
    {name} [serve] [--port N] [--offset N]
    {name} parse <text>

COMMANDS:
    serve     Run the bot and the status server (default)
    parse     Show what a source message yields, as JSON

OPTIONS:
    -p, --port <N>      HTTP port (overrides PORT)
    -o, --offset <N>    Prediction offset 1..=10 (overrides PREDICTION_OFFSET)
        --pretty        Pretty-print JSON
    -h, --help          Show this help
    -V, --version       Show version"#,
        name = paths::SERVICE_NAME,
        version = paths::VERSION,
    );
}

fn cmd_parse(opts: &ParsedArgs) -> Result<Value, String> {
    let text = opts.text.as_deref().ok_or("Usage: parse <text>")?;
    let groups = extract_parenthesized_groups(text);
    let duplicate = groups.get(1).and_then(|second| find_duplicate_suit(second));
    Ok(json!({
        "game": extract_game_number(text),
        "groups": groups,
        "duplicate_suit": duplicate,
        "finalized": is_finalized(text),
    }))
}

fn load_config(opts: &ParsedArgs) -> Result<BotConfig, String> {
    let mut config = BotConfig::from_env().map_err(|e| format!("Configuration: {}", e))?;
    if let Some(port) = opts.port {
        config = config.with_port(port);
    }
    if let Some(offset) = opts.offset {
        let offset = validate_offset(offset).map_err(|e| format!("Configuration: {}", e))?;
        config = config.with_offset(offset);
    }
    Ok(config)
}

fn cmd_serve(opts: &ParsedArgs) -> Result<Value, String> {
    let config = load_config(opts)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create runtime: {}", e))?;

    rt.block_on(async {
        let shutdown = install_signal_handlers();
        let mut shutdown_rx = shutdown.subscribe();

        let client = TelegramClient::new(&config.api_base, &config.bot_token);
        let me = client.get_me().await.map_err(|e| format!("Telegram login failed: {}", e))?;
        info!(bot = me.username.as_deref().unwrap_or("-"), id = me.id, "connected to Telegram");

        let mut reactor = Reactor::new(&config, Arc::new(client.clone()));
        let report = reactor.probe_channels(STARTUP_PROBE_TEXT).await;
        if !report.prediction.is_ok() {
            warn!("prediction channel not writable; predictions will be tracked but not published");
        }
        info!(offset = config.prediction_offset, "rule: two cards of one suit in group 2 → prediction N+offset");

        let router = create_router(reactor.subscribe());
        let (tx, rx) = tokio::sync::mpsc::channel(EVENT_QUEUE);

        let reactor_task = tokio::spawn(reactor.run(rx, shutdown.clone()));
        let poller = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                if let Err(e) = poll_updates(client, tx, shutdown.clone()).await {
                    tracing::error!(error = %e, "update listener stopped");
                    shutdown.trigger().await;
                }
            })
        };

        let addr = format!("0.0.0.0:{}", config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await
            .map_err(|e| format!("Failed to bind: {}", e))?;

        info!("Status server listening on http://{}", addr);
        debug!("  GET  /        - Status page");
        debug!("  GET  /health  - Health check");
        debug!("  GET  /status  - JSON status");

        // Run server with graceful shutdown
        tokio::select! {
            result = axum::serve(listener, router) => {
                result.map_err(|e| format!("Server error: {}", e))?;
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received, stopping server...");
            }
        }
        shutdown.trigger().await;

        let _ = poller.await;
        let _ = reactor_task.await;
        info!("Bot stopped");

        Ok::<(), String>(())
    })?;

    Ok(json!({"status": "stopped"}))
}
