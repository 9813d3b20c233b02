//! Mediavault application binary - composition root.
//!
//! Ties together all mediavault crates into a single executable:
//! 1. Parse CLI arguments and load TOML configuration
//! 2. Open the SQLite database and run migrations
//! 3. Build the command router over the media repository
//! 4. Drive the router from a stdin line transport
//!
//! The transport speaks two line shapes:
//! - `upload <kind> <file_id> [file_name] [mime_type]` records a media
//!   reference (use `-` to skip file_name while giving a mime type)
//! - anything else is parsed as a command (latest, search, list_files,
//!   stats, clear_old, delete_by_date, help)

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use mediavault_bot::{Command, CommandRouter};
use mediavault_core::config::VaultConfig;
use mediavault_core::types::IncomingUpload;
use mediavault_storage::{Database, MediaRepository};

use cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

/// Parse an `upload ...` transport line into an upload event.
///
/// Returns `None` when the line is not an upload line at all; a
/// malformed upload line (missing file_id) also yields `None` and falls
/// through to command parsing, which reports it as unknown.
fn parse_upload_line(line: &str) -> Option<IncomingUpload> {
    let mut tokens = line.split_whitespace();
    if !tokens.next()?.eq_ignore_ascii_case("upload") {
        return None;
    }
    let content_kind = tokens.next()?.to_string();
    let file_id = tokens.next()?.to_string();
    let file_name = tokens.next().filter(|t| *t != "-").map(str::to_string);
    let mime_type = tokens.next().filter(|t| *t != "-").map(str::to_string);
    Some(IncomingUpload {
        content_kind,
        file_id,
        file_name,
        mime_type,
        user_id: None,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = VaultConfig::load_or_default(&config_file);
    if let Some(data_dir) = args.resolve_data_dir() {
        config.general.data_dir = data_dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting mediavault v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join(&config.storage.db_file);
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let repo = Arc::new(MediaRepository::new(db));
    let router = CommandRouter::new(repo, &config.bot);

    // Transport: one request per stdin line, one reply per line group.
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    tracing::info!("Ready — reading commands from stdin (quit to exit)");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = if let Some(upload) = parse_upload_line(line) {
            match router.handle_upload(&upload) {
                Some(reply) => reply,
                // Unsupported content kinds are ignored without a reply.
                None => continue,
            }
        } else {
            router.handle_command(&Command::parse(line))
        };

        println!("{}", reply);
    }

    tracing::info!("Shutting down");
    Ok(())
}
