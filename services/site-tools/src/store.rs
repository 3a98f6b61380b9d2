//!
//! src/store.rs
//!
//! Load and rewrite of the tracks.json database. Writes go through a
//! temp file in the destination directory and are persisted over the
//! original so a crash never leaves a half-written database.
//!
//!

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::errors::SiteError;
use crate::track::TrackMap;

pub fn load_tracks(path: &Path) -> Result<TrackMap, SiteError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| SiteError::Store(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| SiteError::Parse(format!("decode {}: {e}", path.display())))
}

pub fn save_tracks(path: &Path, tracks: &TrackMap) -> Result<(), SiteError> {
    write_json_atomic(path, tracks)
}

/// 2-space pretty print plus trailing newline, matching the on-disk format
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) ->
    Result<(), SiteError> {

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e|
        SiteError::Store(
            format!("create dir {}: {e}", parent.display())
    ))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| SiteError::Store(
            format!("tempfile in {}: {e}", parent.display())
        ))?;

    {
        let file = temp.as_file_mut();
        serde_json::to_writer_pretty(&mut *file, value)
            .map_err(|e| SiteError::Store(
                format!("serialize json: {e}")
            ))?;
        file.write_all(b"\n").map_err(|e| SiteError::Store(
            format!("write json: {e}")
        ))?;
        file.flush().map_err(|e| SiteError::Store(
            format!("flush json: {e}")
        ))?;
    }

    temp.persist(path).map_err(|e|
        SiteError::Store(format!("persist {}: {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "zebra": {
    "title": "Zebra Song",
    "artist": "Stripes",
    "playCount": 12
  },
  "apple": {
    "title": "Apple Song",
    "artist": "Orchard"
  }
}
"#;

    #[test]
    fn round_trip_preserves_key_order_and_extras() -> Result<(), SiteError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tracks.json");
        fs::write(&path, SAMPLE)?;

        let tracks = load_tracks(&path)?;
        let keys: Vec<&String> = tracks.keys().collect();
        assert_eq!(keys, ["zebra", "apple"]);
        assert_eq!(tracks["zebra"].extra["playCount"], 12);

        save_tracks(&path, &tracks)?;
        let written = fs::read_to_string(&path)?;
        assert_eq!(written, SAMPLE);
        Ok(())
    }

    #[test]
    fn save_is_idempotent() -> Result<(), SiteError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tracks.json");
        fs::write(&path, SAMPLE)?;

        let tracks = load_tracks(&path)?;
        save_tracks(&path, &tracks)?;
        let first = fs::read_to_string(&path)?;

        let tracks = load_tracks(&path)?;
        save_tracks(&path, &tracks)?;
        let second = fs::read_to_string(&path)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn load_missing_file_is_a_store_error() {
        let err = load_tracks(Path::new("no/such/tracks.json")).unwrap_err();
        assert!(matches!(err, SiteError::Store(_)));
    }
}
