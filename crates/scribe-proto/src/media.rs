//! Audio-type validation for intake files.
//!
//! Validation happens entirely client-side, before any network call: a file
//! that fails here is never forwarded to the upload operation.

use std::path::Path;

/// Accepted audio file extensions (lowercase).
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];

/// True when `path` has one of the accepted audio extensions
/// (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// MIME type to declare for an upload part, guessed from the extension.
/// Unknown extensions fall back to a generic byte stream — the backend
/// decides for itself what it can transcribe.
pub fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn accepted_extensions_pass() {
        for name in ["a.mp3", "b.wav", "c.m4a", "d.ogg", "SHOUTY.MP3", "x.Ogg"] {
            assert!(is_audio_file(&PathBuf::from(name)), "{name} should pass");
        }
    }

    #[test]
    fn everything_else_is_rejected() {
        for name in ["notes.txt", "deck.pdf", "song.flac", "noext", ".mp3.bak"] {
            assert!(!is_audio_file(&PathBuf::from(name)), "{name} should fail");
        }
    }

    #[test]
    fn mime_guess_matches_extension() {
        assert_eq!(mime_for(&PathBuf::from("a.mp3")), "audio/mpeg");
        assert_eq!(mime_for(&PathBuf::from("a.WAV")), "audio/wav");
        assert_eq!(mime_for(&PathBuf::from("a.bin")), "application/octet-stream");
    }
}
