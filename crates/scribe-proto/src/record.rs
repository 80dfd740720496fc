//! Wire types for the transcription service.

use serde::{Deserialize, Serialize};

/// One transcription result as stored by the backend.  The client never
/// mutates these; the displayed set is replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionRecord {
    /// Unique id, assigned by the backend.  Stable across list and search
    /// responses.
    pub id: i64,
    /// Original uploaded file name.
    pub file_name: String,
    /// Full transcription text.  May be long — truncation for display is a
    /// view concern, never applied here.
    pub transcription: String,
    /// ISO-8601 timestamp string as the backend produced it.  Kept verbatim;
    /// see [`format_timestamp`] for the display rendering.
    pub created_at: String,
}

/// Response payload of a successful `POST /api/transcribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReply {
    pub message: String,
    pub file_name: String,
    pub transcription: String,
}

impl TranscriptionRecord {
    /// Display rendering of `created_at` (local time).
    pub fn created_at_display(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

/// Placeholder rendered when `created_at` cannot be parsed.
pub const INVALID_DATE: &str = "Invalid date";

/// Parse an ISO-8601 timestamp and format it for display in local time.
///
/// The backend emits naive timestamps (`2024-03-19T12:00:00`), but RFC 3339
/// strings with an offset are accepted too.  Anything unparseable renders as
/// the literal "Invalid date" — never an error.
pub fn format_timestamp(iso: &str) -> String {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();
    }

    // Naive ISO-8601 (no offset) — interpreted as local time, matching how
    // the backend writes it.
    if let Ok(naive) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return match Local.from_local_datetime(&naive).earliest() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => INVALID_DATE.to_string(),
        };
    }

    INVALID_DATE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_iso_timestamp_formats() {
        let out = format_timestamp("2024-03-19T12:00:00");
        assert_ne!(out, INVALID_DATE);
        assert!(out.starts_with("2024-03-19"), "got {out}");
    }

    #[test]
    fn rfc3339_timestamp_formats() {
        let out = format_timestamp("2024-03-19T12:00:00+00:00");
        assert_ne!(out, INVALID_DATE);
        assert!(out.starts_with("2024-03-"), "got {out}");
    }

    #[test]
    fn fractional_seconds_accepted() {
        assert_ne!(format_timestamp("2024-03-19T12:00:00.123456"), INVALID_DATE);
    }

    #[test]
    fn garbage_renders_invalid_date() {
        assert_eq!(format_timestamp("not-a-date"), INVALID_DATE);
        assert_eq!(format_timestamp(""), INVALID_DATE);
    }

    #[test]
    fn record_deserializes_from_backend_json() {
        let json = r#"{
            "id": 1,
            "file_name": "test.wav",
            "transcription": "Test transcription",
            "created_at": "2024-03-19T12:00:00"
        }"#;
        let rec: TranscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, 1);
        assert_eq!(rec.file_name, "test.wav");
        assert_eq!(rec.transcription, "Test transcription");
        assert_ne!(rec.created_at_display(), INVALID_DATE);
    }
}
