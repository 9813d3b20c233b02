use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Content kind of a stored media file, mirroring the transport's tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
    Animation,
}

impl MediaKind {
    /// The persisted (and transport-facing) tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Animation => "animation",
        }
    }

    /// Parse a transport content-kind tag. Unknown tags yield `None`;
    /// the router treats those uploads as unsupported and ignores them.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "photo" => Some(MediaKind::Photo),
            "video" => Some(MediaKind::Video),
            "document" => Some(MediaKind::Document),
            "audio" => Some(MediaKind::Audio),
            "animation" => Some(MediaKind::Animation),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Structured per-upload metadata, persisted as a JSON object.
///
/// `file_name` and `mime_type` are the fields the upload handler fills in;
/// anything else the transport supplies survives the round trip through
/// the flattened `extra` map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MediaMetadata {
    /// True when no field carries data; such metadata is stored as absent.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.mime_type.is_none() && self.extra.is_empty()
    }
}

// =============================================================================
// Records
// =============================================================================

/// A persisted media row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Auto-assigned primary key, strictly increasing in insert order.
    pub id: i64,
    /// Opaque transport reference to the binary content. Never dereferenced.
    pub file_id: String,
    pub kind: MediaKind,
    /// Uploader identity, informational only.
    pub user_id: Option<i64>,
    pub metadata: Option<MediaMetadata>,
    /// Server-assigned at insert; sole ordering and retention key.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new media row.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMedia {
    pub file_id: String,
    pub kind: MediaKind,
    pub user_id: Option<i64>,
    pub metadata: Option<MediaMetadata>,
}

/// Aggregate store statistics.
///
/// `metadata_bytes` is the summed length of the serialized metadata text,
/// a reporting approximation rather than the actual binary payload size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub record_count: u64,
    pub metadata_bytes: u64,
}

// =============================================================================
// Transport events
// =============================================================================

/// An upload event as delivered by the external transport.
///
/// `content_kind` is the transport's raw tag; unsupported tags are ignored
/// by the router without creating a record.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingUpload {
    pub content_kind: String,
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- MediaKind ----

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            MediaKind::Photo,
            MediaKind::Video,
            MediaKind::Document,
            MediaKind::Audio,
            MediaKind::Animation,
        ] {
            assert_eq!(MediaKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_case_and_whitespace() {
        assert_eq!(MediaKind::parse("PHOTO"), Some(MediaKind::Photo));
        assert_eq!(MediaKind::parse("  video "), Some(MediaKind::Video));
    }

    #[test]
    fn test_kind_parse_unknown() {
        assert_eq!(MediaKind::parse("sticker"), None);
        assert_eq!(MediaKind::parse(""), None);
        assert_eq!(MediaKind::parse("voice_note"), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MediaKind::Document.to_string(), "document");
    }

    // ---- MediaMetadata ----

    #[test]
    fn test_metadata_json_round_trip() {
        let meta = MediaMetadata {
            file_name: Some("a.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            extra: serde_json::Map::new(),
        };
        let text = serde_json::to_string(&meta).unwrap();
        let back: MediaMetadata = serde_json::from_str(&text).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_metadata_extra_keys_survive() {
        let text = r#"{"file_name":"a.pdf","mime_type":"application/pdf","source":"forward"}"#;
        let meta: MediaMetadata = serde_json::from_str(text).unwrap();
        assert_eq!(meta.file_name.as_deref(), Some("a.pdf"));
        assert_eq!(
            meta.extra.get("source"),
            Some(&serde_json::Value::String("forward".to_string()))
        );

        let back = serde_json::to_string(&meta).unwrap();
        let reparsed: MediaMetadata = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed, meta);
    }

    #[test]
    fn test_metadata_absent_fields_not_serialized() {
        let meta = MediaMetadata {
            mime_type: Some("image/jpeg".to_string()),
            ..MediaMetadata::default()
        };
        let text = serde_json::to_string(&meta).unwrap();
        assert!(!text.contains("file_name"));
        assert!(text.contains("image/jpeg"));
    }

    #[test]
    fn test_metadata_is_empty() {
        assert!(MediaMetadata::default().is_empty());

        let meta = MediaMetadata {
            file_name: Some("x".to_string()),
            ..MediaMetadata::default()
        };
        assert!(!meta.is_empty());
    }

    // ---- MediaKind serde tags match persisted form ----

    #[test]
    fn test_kind_serde_tag() {
        let json = serde_json::to_string(&MediaKind::Animation).unwrap();
        assert_eq!(json, "\"animation\"");
        let back: MediaKind = serde_json::from_str("\"photo\"").unwrap();
        assert_eq!(back, MediaKind::Photo);
    }
}
