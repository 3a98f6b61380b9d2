//!
//! src/charters.rs
//!
//! Merges charter attribution out of the per-song metadata files in
//! songs/*.json into the track database. Matching is by lowercase
//! "title|artist" key with a substring fallback on the title.
//!
//!

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::SiteError;
use crate::track::TrackMap;

pub const UNKNOWN_CHARTER: &str = "Unknown";

/// The slice of a songs/*.json file the merge cares about
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMeta {
    #[serde(default)]
    pub cache_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub charter: String,
    #[serde(default)]
    pub charters: Vec<String>,
}

impl SongMeta {
    /// Prefer the scalar field, fall back to the charters array
    pub fn charter(&self) -> String {
        if !self.charter.trim().is_empty() {
            return self.charter.clone();
        }
        if !self.charters.is_empty() {
            return self.charters.join(", ");
        }
        UNKNOWN_CHARTER.to_string()
    }
}

#[derive(Debug, Default)]
pub struct CharterIndex {
    by_key: HashMap<String, String>,
    // (lowercase title, charter) in file order, for the substring fallback
    entries: Vec<(String, String)>,
}

impl CharterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: &str, artist: &str, charter: String) {
        let title = title.to_lowercase();
        let artist = artist.to_lowercase();
        self.by_key.insert(format!("{title}|{artist}"), charter.clone());
        self.entries.push((title, charter));
    }

    /// Scans dir for *.json song files. Unreadable files are logged
    /// and skipped so one broken export cannot stall the merge.
    pub fn from_songs_dir(dir: &Path) -> Result<Self, SiteError> {
        let mut paths = Vec::new();
        let listing = fs::read_dir(dir).map_err(|e|
            SiteError::NotFound(format!("songs dir {}: {e}", dir.display())))?;
        for entry in listing {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut index = Self::new();
        for path in paths {
            let song: SongMeta = match fs::read_to_string(&path)
                .map_err(SiteError::from)
                .and_then(|raw| Ok(serde_json::from_str(&raw)?))
            {
                Ok(song) => song,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping song file");
                    continue;
                }
            };
            let charter = song.charter();
            debug!(
                title = %song.title,
                artist = %song.artist,
                charter = %charter,
                "indexed song"
            );
            index.insert(&song.title, &song.artist, charter);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact "title|artist" match wins; otherwise the first song whose
    /// title contains, or is contained by, the track title.
    pub fn lookup(&self, title: &str, artist: &str) -> Option<&str> {
        let title = title.to_lowercase();
        let key = format!("{title}|{}", artist.to_lowercase());
        if let Some(charter) = self.by_key.get(&key) {
            return Some(charter);
        }
        if title.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(song_title, _)| {
                !song_title.is_empty()
                    && (title.contains(song_title.as_str())
                        || song_title.contains(title.as_str()))
            })
            .map(|(_, charter)| charter.as_str())
    }
}

/// Sets a charter on every record; tracks with no match get "Unknown".
/// Returns the number of records a song file matched.
pub fn merge_charters(tracks: &mut TrackMap, index: &CharterIndex) -> usize {
    let mut updated = 0;
    for (track_id, track) in tracks.iter_mut() {
        let title = track.title.as_deref().unwrap_or_default();
        let artist = track.artist.as_deref().unwrap_or_default();
        match index.lookup(title, artist) {
            Some(charter) => {
                track.charter = Some(charter.to_string());
                updated += 1;
                debug!(track = %track_id, charter, "charter matched");
            }
            None => {
                track.charter = Some(UNKNOWN_CHARTER.to_string());
                debug!(track = %track_id, "no charter found, set to Unknown");
            }
        }
    }
    updated
}
