//!
//! src/urlid.rs
//!
//! Adds or strips the urlId field that mirrors each record's own key.
//!
//!

use tracing::debug;

use crate::track::TrackMap;

/// Sets urlId = key on every record missing one. Returns how many
/// records changed.
pub fn add_url_ids(tracks: &mut TrackMap) -> usize {
    let mut added = 0;
    for (key, track) in tracks.iter_mut() {
        if track.url_id.is_none() {
            track.url_id = Some(key.clone());
            added += 1;
            debug!(track = %key, title = %track.display_title(), "added urlId");
        }
    }
    added
}

/// Deletes urlId wherever present. Returns how many records changed.
pub fn remove_url_ids(tracks: &mut TrackMap) -> usize {
    let mut removed = 0;
    for (key, track) in tracks.iter_mut() {
        if track.url_id.take().is_some() {
            removed += 1;
            debug!(track = %key, title = %track.display_title(), "removed urlId");
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    fn sample() -> TrackMap {
        let mut tracks = TrackMap::new();
        tracks.insert("crazy".to_string(), Track {
            title: Some("Crazy".to_string()),
            ..Track::default()
        });
        tracks.insert("oneofyourgirls".to_string(), Track {
            title: Some("One of Your Girls".to_string()),
            url_id: Some("oneofyourgirls".to_string()),
            ..Track::default()
        });
        tracks
    }

    #[test]
    fn add_mirrors_the_key_and_is_idempotent() {
        let mut tracks = sample();
        assert_eq!(add_url_ids(&mut tracks), 1);
        assert_eq!(tracks["crazy"].url_id.as_deref(), Some("crazy"));

        let snapshot = tracks.clone();
        assert_eq!(add_url_ids(&mut tracks), 0);
        assert_eq!(tracks, snapshot);
    }

    #[test]
    fn remove_strips_all_and_is_idempotent() {
        let mut tracks = sample();
        add_url_ids(&mut tracks);
        assert_eq!(remove_url_ids(&mut tracks), 2);
        assert!(tracks.values().all(|t| t.url_id.is_none()));

        let snapshot = tracks.clone();
        assert_eq!(remove_url_ids(&mut tracks), 0);
        assert_eq!(tracks, snapshot);
    }
}
