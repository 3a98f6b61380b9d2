//!
//! src/audio.rs
//!
//! Rewrites previewUrl values that still point at the legacy streaming
//! host to local /assets/audio paths, and verifies the referenced files
//! actually exist on disk.
//!
//!

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::SiteError;
use crate::track::TrackMap;

pub const LOCAL_AUDIO_PREFIX: &str = "/assets/audio";

fn filename_of(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Returns the local replacement for a legacy preview URL, or None if
/// the value is already fine as-is.
pub fn rewrite_preview_url(url: &str, legacy_host: &str) -> Option<String> {
    let stream_prefix = format!("{legacy_host}/stream/");
    if url.contains(&stream_prefix) {
        let name = filename_of(url)?;
        return Some(format!("{LOCAL_AUDIO_PREFIX}/{name}"));
    }
    // plain-http mp3 links cause mixed-content blocks on the https site
    if url.starts_with("http://") && url.contains(".mp3") {
        let name = filename_of(url)?;
        return Some(format!("{LOCAL_AUDIO_PREFIX}/{name}"));
    }
    None
}

/// Rewrites every legacy previewUrl in place. Returns how many records
/// changed.
pub fn update_audio_paths(tracks: &mut TrackMap, legacy_host: &str) -> usize {
    let mut updated = 0;
    for (track_id, track) in tracks.iter_mut() {
        let Some(old_url) = track.preview_url.as_deref() else {
            continue;
        };
        if let Some(new_url) = rewrite_preview_url(old_url, legacy_host) {
            info!(track = %track_id, old = %old_url, new = %new_url, "rewrote previewUrl");
            track.preview_url = Some(new_url);
            updated += 1;
        }
    }
    updated
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAudio {
    pub track_id: String,
    pub title: String,
    pub filename: String,
}

/// Every record whose local previewUrl has no file under audio_dir
pub fn verify_audio_files(tracks: &TrackMap, audio_dir: &Path) -> Vec<MissingAudio> {
    let mut missing = Vec::new();
    for (track_id, track) in tracks {
        let Some(url) = track.preview_url.as_deref() else {
            continue;
        };
        if !url.starts_with(&format!("{LOCAL_AUDIO_PREFIX}/")) {
            continue;
        }
        let Some(name) = filename_of(url) else {
            continue;
        };
        if !audio_dir.join(name).is_file() {
            missing.push(MissingAudio {
                track_id: track_id.clone(),
                title: track.display_title().to_string(),
                filename: name.to_string(),
            });
        }
    }
    missing
}

/// Sorted list of the .mp3 files present under audio_dir. A missing
/// directory is reported but not fatal.
pub fn list_audio_files(audio_dir: &Path) -> Result<Vec<String>, SiteError> {
    let listing = match fs::read_dir(audio_dir) {
        Ok(listing) => listing,
        Err(e) => {
            warn!(dir = %audio_dir.display(), error = %e, "audio dir not readable");
            return Ok(Vec::new());
        }
    };

    let mut names = Vec::new();
    for entry in listing {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "mp3") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LEGACY_HOST;
    use crate::track::Track;

    fn track_with_preview(url: &str) -> Track {
        Track {
            title: Some("T".to_string()),
            preview_url: Some(url.to_string()),
            ..Track::default()
        }
    }

    #[test]
    fn legacy_stream_url_becomes_local() {
        let rewritten = rewrite_preview_url(
            "http://208.92.234.17:8000/stream/crazy.mp3",
            DEFAULT_LEGACY_HOST,
        );
        assert_eq!(rewritten.as_deref(), Some("/assets/audio/crazy.mp3"));
    }

    #[test]
    fn plain_http_mp3_becomes_local() {
        let rewritten = rewrite_preview_url(
            "http://cdn.example.com/previews/song.mp3?token=abc",
            DEFAULT_LEGACY_HOST,
        );
        assert_eq!(rewritten.as_deref(), Some("/assets/audio/song.mp3?token=abc"));
    }

    #[test]
    fn https_and_local_urls_are_left_alone() {
        assert_eq!(
            rewrite_preview_url("https://cdn.example.com/song.mp3", DEFAULT_LEGACY_HOST),
            None
        );
        assert_eq!(
            rewrite_preview_url("/assets/audio/song.mp3", DEFAULT_LEGACY_HOST),
            None
        );
    }

    #[test]
    fn rewrite_pass_is_idempotent() {
        let mut tracks = TrackMap::new();
        tracks.insert(
            "crazy".to_string(),
            track_with_preview("http://208.92.234.17:8000/stream/crazy.mp3"),
        );
        assert_eq!(update_audio_paths(&mut tracks, DEFAULT_LEGACY_HOST), 1);
        let snapshot = tracks.clone();
        assert_eq!(update_audio_paths(&mut tracks, DEFAULT_LEGACY_HOST), 0);
        assert_eq!(tracks, snapshot);
    }

    #[test]
    fn verify_reports_only_missing_local_files() -> Result<(), SiteError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("present.mp3"), b"mp3")?;

        let mut tracks = TrackMap::new();
        tracks.insert(
            "present".to_string(),
            track_with_preview("/assets/audio/present.mp3"),
        );
        tracks.insert(
            "absent".to_string(),
            track_with_preview("/assets/audio/absent.mp3"),
        );
        tracks.insert(
            "remote".to_string(),
            track_with_preview("https://cdn.example.com/far.mp3"),
        );

        let missing = verify_audio_files(&tracks, dir.path());
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].track_id, "absent");
        assert_eq!(missing[0].filename, "absent.mp3");
        Ok(())
    }

    #[test]
    fn list_is_sorted_and_tolerates_missing_dir() -> Result<(), SiteError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.mp3"), b"")?;
        fs::write(dir.path().join("a.mp3"), b"")?;
        fs::write(dir.path().join("cover.png"), b"")?;

        assert_eq!(list_audio_files(dir.path())?, ["a.mp3", "b.mp3"]);
        assert!(list_audio_files(Path::new("no/such/dir"))?.is_empty());
        Ok(())
    }
}
