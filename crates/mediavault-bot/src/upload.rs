//! Upload dispatch.
//!
//! Turns a transport upload event into an insert payload. Variant dispatch
//! over the content kind: every supported kind records the MIME type, and
//! documents additionally record the original file name. Unsupported kinds
//! yield `None` — no record, no error.

use mediavault_core::types::{IncomingUpload, MediaKind, MediaMetadata, NewMedia};

/// Build the insert payload for an upload, or `None` when the content kind
/// is unsupported.
pub fn media_from_upload(upload: &IncomingUpload) -> Option<NewMedia> {
    let kind = MediaKind::parse(&upload.content_kind)?;

    let metadata = MediaMetadata {
        file_name: match kind {
            MediaKind::Document => upload.file_name.clone(),
            _ => None,
        },
        mime_type: upload.mime_type.clone(),
        extra: serde_json::Map::new(),
    };

    Some(NewMedia {
        file_id: upload.file_id.clone(),
        kind,
        user_id: upload.user_id,
        metadata: if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(kind: &str) -> IncomingUpload {
        IncomingUpload {
            content_kind: kind.to_string(),
            file_id: "fid1".to_string(),
            file_name: Some("report.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            user_id: Some(9),
        }
    }

    #[test]
    fn test_document_keeps_file_name_and_mime() {
        let media = media_from_upload(&upload("document")).unwrap();
        assert_eq!(media.kind, MediaKind::Document);
        let meta = media.metadata.unwrap();
        assert_eq!(meta.file_name.as_deref(), Some("report.pdf"));
        assert_eq!(meta.mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_non_document_drops_file_name() {
        let mut event = upload("photo");
        event.mime_type = Some("image/jpeg".to_string());
        let media = media_from_upload(&event).unwrap();
        assert_eq!(media.kind, MediaKind::Photo);
        let meta = media.metadata.unwrap();
        assert!(meta.file_name.is_none());
        assert_eq!(meta.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_all_supported_kinds_accepted() {
        for kind in ["photo", "video", "document", "audio", "animation"] {
            assert!(media_from_upload(&upload(kind)).is_some(), "kind {}", kind);
        }
    }

    #[test]
    fn test_unsupported_kind_ignored() {
        assert!(media_from_upload(&upload("sticker")).is_none());
        assert!(media_from_upload(&upload("")).is_none());
    }

    #[test]
    fn test_no_metadata_stored_as_absent() {
        let event = IncomingUpload {
            content_kind: "video".to_string(),
            file_id: "fid2".to_string(),
            file_name: None,
            mime_type: None,
            user_id: None,
        };
        let media = media_from_upload(&event).unwrap();
        assert!(media.metadata.is_none());
    }

    #[test]
    fn test_user_id_carried_through() {
        let media = media_from_upload(&upload("audio")).unwrap();
        assert_eq!(media.user_id, Some(9));
    }
}
