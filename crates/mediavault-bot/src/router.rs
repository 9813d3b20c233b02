//! Command router: maps commands and upload events onto storage calls.
//!
//! Stateless between invocations. The repository handle is injected at
//! construction; handlers validate arguments, make exactly one repository
//! call, and convert every storage failure into a generic user-facing
//! message at this boundary — no failure escapes as an error value.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use mediavault_core::config::BotConfig;
use mediavault_core::error::VaultError;
use mediavault_core::types::IncomingUpload;
use mediavault_storage::MediaRepository;

use crate::command::Command;
use crate::reply::{format_size, MediaItem, Reply};
use crate::upload::media_from_upload;

const NO_FILES_MSG: &str = "No files stored yet. Send me any media and I will keep it for you.";
const GENERIC_FAILURE_MSG: &str =
    "Something went wrong while handling your request. Please try again later.";

const HELP_TEXT: &str = "\
Send me a photo, video, document, audio file, or animation and I will store it.

Commands:
  latest (or play)          resend the most recently stored file
  search <keyword>          find stored files by name or type
  list_files                show the most recent files
  stats                     how many files are stored
  clear_old <days>          delete files older than <days> days
  delete_by_date <date>     delete files stored before YYYY-MM-DD
  help                      this text";

/// Stateless command router over an injected repository handle.
pub struct CommandRouter {
    repo: Arc<MediaRepository>,
    page_size: usize,
    search_limit: usize,
}

impl CommandRouter {
    pub fn new(repo: Arc<MediaRepository>, config: &BotConfig) -> Self {
        Self {
            repo,
            page_size: config.page_size,
            search_limit: config.search_limit,
        }
    }

    /// Handle one parsed command.
    pub fn handle_command(&self, command: &Command) -> Reply {
        info!(command = command.name(), "Incoming command");

        match command {
            Command::Latest => self.latest(),
            Command::Search(query) => self.search(query),
            Command::ListFiles => self.list_files(),
            Command::Stats => self.stats(),
            Command::ClearOld(arg) => self.clear_old(arg),
            Command::DeleteByDate(arg) => self.delete_by_date(arg),
            Command::Help => Reply::Text(HELP_TEXT.to_string()),
            Command::Unknown(token) => Reply::Usage(format!(
                "Unknown command '{}'. Send 'help' for the list of commands.",
                token
            )),
        }
    }

    /// Handle one upload event. Unsupported content kinds are silently
    /// ignored: no record is created and no reply is produced.
    pub fn handle_upload(&self, upload: &IncomingUpload) -> Option<Reply> {
        info!(
            kind = %upload.content_kind,
            user_id = ?upload.user_id,
            "Incoming upload"
        );

        let Some(media) = media_from_upload(upload) else {
            debug!(kind = %upload.content_kind, "Unsupported content kind ignored");
            return None;
        };

        match self.repo.save(&media) {
            Ok(id) => {
                debug!(id, "Upload stored");
                Some(Reply::Text("File saved.".to_string()))
            }
            Err(e) => Some(failure("Failed to store upload", &e)),
        }
    }

    // -- Handlers --

    fn latest(&self) -> Reply {
        match self.repo.latest() {
            Ok(Some(record)) => Reply::Media {
                file_id: record.file_id,
                kind: record.kind,
                caption: "Here is the most recent file.".to_string(),
            },
            Ok(None) => Reply::Empty(NO_FILES_MSG.to_string()),
            Err(e) => failure("Failed to fetch latest record", &e),
        }
    }

    fn search(&self, query: &str) -> Reply {
        let query = query.trim();
        if query.is_empty() {
            return Reply::Usage(
                "Give me a keyword to search for, e.g.: search report".to_string(),
            );
        }

        match self.repo.search(query, self.search_limit) {
            Ok(records) if records.is_empty() => {
                Reply::Empty(format!("No stored files matched '{}'.", query))
            }
            Ok(records) => Reply::MediaList(records.iter().map(MediaItem::from_record).collect()),
            Err(e) => failure("Search failed", &e),
        }
    }

    fn list_files(&self) -> Reply {
        match self.repo.list_recent(self.page_size) {
            Ok(records) if records.is_empty() => Reply::Empty(NO_FILES_MSG.to_string()),
            Ok(records) => Reply::MediaList(records.iter().map(MediaItem::from_record).collect()),
            Err(e) => failure("Listing failed", &e),
        }
    }

    fn stats(&self) -> Reply {
        match self.repo.stats() {
            Ok(stats) => Reply::Text(format!(
                "{} file(s) stored, {} of metadata.",
                stats.record_count,
                format_size(stats.metadata_bytes)
            )),
            Err(e) => failure("Stats query failed", &e),
        }
    }

    fn clear_old(&self, arg: &str) -> Reply {
        // Digits-only, like the original's isdigit() gate: '0' is accepted,
        // a leading '-' makes the argument non-numeric.
        let arg = arg.trim();
        if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_digit()) {
            return Reply::Usage("Usage: clear_old <days>".to_string());
        }
        let Ok(days) = arg.parse::<u32>() else {
            return Reply::Usage("Usage: clear_old <days>".to_string());
        };

        match self.repo.delete_older_than(days) {
            Ok(0) => Reply::Text(format!("No files were older than {} day(s).", days)),
            Ok(deleted) => Reply::Text(format!(
                "Deleted {} file(s) older than {} day(s).",
                deleted, days
            )),
            Err(e) => failure("Age-based delete failed", &e),
        }
    }

    fn delete_by_date(&self, arg: &str) -> Reply {
        let Ok(date) = NaiveDate::parse_from_str(arg.trim(), "%Y-%m-%d") else {
            return Reply::Usage("Usage: delete_by_date YYYY-MM-DD".to_string());
        };

        match self.repo.delete_before_date(date) {
            Ok(0) => Reply::Text(format!("No files were stored before {}.", date)),
            Ok(deleted) => Reply::Text(format!("Deleted {} file(s) stored before {}.", deleted, date)),
            Err(e) => failure("Date-based delete failed", &e),
        }
    }
}

/// Log the full cause and return the generic user-facing failure.
fn failure(context: &str, err: &VaultError) -> Reply {
    error!(error = %err, "{}", context);
    Reply::Failure(GENERIC_FAILURE_MSG.to_string())
}
