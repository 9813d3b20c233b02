//! Reply types and result formatting.
//!
//! A [`Reply`] is what the router hands back to the transport layer. The
//! three outcome classes of every handler — success, successful-but-empty,
//! and failure — map onto distinct variants so callers can never confuse
//! them.

use chrono::{DateTime, Utc};

use mediavault_core::types::{MediaKind, MediaRecord};

/// One entry of a `list_files` page, selectable individually.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaItem {
    pub id: i64,
    pub file_id: String,
    pub kind: MediaKind,
    /// Display label: the stored file name when present, otherwise the
    /// MIME type, otherwise the kind tag.
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl MediaItem {
    pub fn from_record(record: &MediaRecord) -> Self {
        let label = record
            .metadata
            .as_ref()
            .and_then(|m| m.file_name.clone().or_else(|| m.mime_type.clone()))
            .unwrap_or_else(|| record.kind.as_str().to_string());

        Self {
            id: record.id,
            file_id: record.file_id.clone(),
            kind: record.kind,
            label,
            created_at: record.created_at,
        }
    }
}

/// Router outcome handed to the transport layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// A stored reference for the transport to re-deliver as media.
    Media {
        file_id: String,
        kind: MediaKind,
        caption: String,
    },
    /// A page of records for the transport to render as a pick list.
    MediaList(Vec<MediaItem>),
    /// Plain success or informational text.
    Text(String),
    /// Successful-but-empty outcome; distinct from a failure.
    Empty(String),
    /// Argument validation failed; carries a usage hint.
    Usage(String),
    /// A storage failure converted to a generic user-facing message.
    /// The cause has already been logged at the handler boundary.
    Failure(String),
}

impl Reply {
    /// True for the empty-result outcome class.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Reply::Empty(_))
    }

    /// True for validation and storage failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Usage(_) | Reply::Failure(_))
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Media {
                file_id,
                kind,
                caption,
            } => write!(f, "[{}] {}\n{}", kind, file_id, caption),
            Reply::MediaList(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{}. [{}] {} ({})",
                        i + 1,
                        item.kind,
                        item.label,
                        item.created_at.format("%Y-%m-%d %H:%M")
                    )?;
                }
                Ok(())
            }
            Reply::Text(s) | Reply::Empty(s) | Reply::Usage(s) | Reply::Failure(s) => {
                f.write_str(s)
            }
        }
    }
}

/// Human-readable byte size: B/KB/MB/GB with two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut idx = 0;
    while size >= 1024.0 && idx < UNITS.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }
    format!("{:.2}{}", size, UNITS[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediavault_core::types::MediaMetadata;

    fn record(file_name: Option<&str>, mime: Option<&str>) -> MediaRecord {
        MediaRecord {
            id: 7,
            file_id: "fid".to_string(),
            kind: MediaKind::Document,
            user_id: None,
            metadata: Some(MediaMetadata {
                file_name: file_name.map(str::to_string),
                mime_type: mime.map(str::to_string),
                extra: serde_json::Map::new(),
            }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0.00B");
        assert_eq!(format_size(512), "512.00B");
        assert_eq!(format_size(1024), "1.00KB");
        assert_eq!(format_size(1536), "1.50KB");
        assert_eq!(format_size(1024 * 1024), "1.00MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00GB");
    }

    #[test]
    fn test_format_size_caps_at_gb() {
        let huge = 5 * 1024_u64.pow(4); // 5 TB
        assert!(format_size(huge).ends_with("GB"));
    }

    #[test]
    fn test_item_label_prefers_file_name() {
        let item = MediaItem::from_record(&record(Some("a.pdf"), Some("application/pdf")));
        assert_eq!(item.label, "a.pdf");
    }

    #[test]
    fn test_item_label_falls_back_to_mime_then_kind() {
        let item = MediaItem::from_record(&record(None, Some("application/pdf")));
        assert_eq!(item.label, "application/pdf");

        let mut bare = record(None, None);
        bare.metadata = None;
        let item = MediaItem::from_record(&bare);
        assert_eq!(item.label, "document");
    }

    #[test]
    fn test_outcome_classes_are_distinguishable() {
        assert!(Reply::Empty("none".into()).is_empty_result());
        assert!(!Reply::Text("ok".into()).is_empty_result());
        assert!(Reply::Usage("hint".into()).is_failure());
        assert!(Reply::Failure("oops".into()).is_failure());
        assert!(!Reply::Empty("none".into()).is_failure());
    }

    #[test]
    fn test_display_media() {
        let reply = Reply::Media {
            file_id: "fid9".to_string(),
            kind: MediaKind::Photo,
            caption: "Here is the most recent file.".to_string(),
        };
        let text = reply.to_string();
        assert!(text.starts_with("[photo] fid9"));
        assert!(text.contains("most recent"));
    }

    #[test]
    fn test_display_media_list_is_numbered() {
        let items = vec![
            MediaItem::from_record(&record(Some("a.pdf"), None)),
            MediaItem::from_record(&record(Some("b.pdf"), None)),
        ];
        let text = Reply::MediaList(items).to_string();
        assert!(text.starts_with("1. [document] a.pdf"));
        assert!(text.contains("\n2. [document] b.pdf"));
    }
}
