//! Command parsing.
//!
//! Maps transport-delivered command text to a [`Command`]. Arguments are
//! carried as raw text; validation happens in the router so that usage
//! hints stay next to the handlers that emit them.

/// A parsed user command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `latest` / `play` — most recent stored record.
    Latest,
    /// `search <keyword>` — substring search; argument may be blank.
    Search(String),
    /// `list_files` — page of most recent records.
    ListFiles,
    /// `stats` — record count and aggregate metadata size.
    Stats,
    /// `clear_old <days>` — age-based deletion; argument unvalidated.
    ClearOld(String),
    /// `delete_by_date <YYYY-MM-DD>` — date-based deletion; argument unvalidated.
    DeleteByDate(String),
    /// `help` / `start` — static usage text.
    Help,
    /// Anything unrecognized, carrying the offending token.
    Unknown(String),
}

impl Command {
    /// Parse one line of command text. A leading `/` is accepted but not
    /// required; the command name is case-insensitive.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let stripped = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let (name, rest) = match stripped.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (stripped, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "latest" | "play" => Command::Latest,
            "search" => Command::Search(rest.to_string()),
            "list_files" | "list" => Command::ListFiles,
            "stats" => Command::Stats,
            "clear_old" => Command::ClearOld(rest.to_string()),
            "delete_by_date" => Command::DeleteByDate(rest.to_string()),
            "help" | "start" => Command::Help,
            _ => Command::Unknown(name.to_string()),
        }
    }

    /// The command name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Command::Latest => "latest",
            Command::Search(_) => "search",
            Command::ListFiles => "list_files",
            Command::Stats => "stats",
            Command::ClearOld(_) => "clear_old",
            Command::DeleteByDate(_) => "delete_by_date",
            Command::Help => "help",
            Command::Unknown(_) => "unknown",
        }
    }
}
