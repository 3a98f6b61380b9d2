//!
//! src/dates.rs
//!
//! Bulk stamping of createdAt/lastFeatured across the whole database.
//!
//!

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::track::TrackMap;

/// February 14th, 2025, the site relaunch date
pub fn default_stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 0, 0, 0).unwrap()
}

/// Millisecond-precision UTC format used throughout tracks.json
pub fn format_stamp(stamp: &DateTime<Utc>) -> String {
    stamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Overwrites both timestamp fields on every record. Returns the
/// number of records touched (always the full map).
pub fn stamp_dates(tracks: &mut TrackMap, stamp: &DateTime<Utc>) -> usize {
    let formatted = format_stamp(stamp);
    for (track_id, track) in tracks.iter_mut() {
        debug!(
            track = %track_id,
            old_created = track.created_at.as_deref().unwrap_or("N/A"),
            old_featured = track.last_featured.as_deref().unwrap_or("N/A"),
            new = %formatted,
            "stamped dates"
        );
        track.created_at = Some(formatted.clone());
        track.last_featured = Some(formatted.clone());
    }
    tracks.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn default_stamp_formats_like_the_site() {
        assert_eq!(format_stamp(&default_stamp()), "2025-02-14T00:00:00.000Z");
    }

    #[test]
    fn stamping_overwrites_both_fields_and_is_idempotent() {
        let mut tracks = TrackMap::new();
        tracks.insert("crazy".to_string(), Track {
            created_at: Some("2023-01-01T00:00:00.000Z".to_string()),
            ..Track::default()
        });
        tracks.insert("fresh".to_string(), Track::default());

        let stamp = default_stamp();
        assert_eq!(stamp_dates(&mut tracks, &stamp), 2);
        for track in tracks.values() {
            assert_eq!(track.created_at.as_deref(), Some("2025-02-14T00:00:00.000Z"));
            assert_eq!(track.last_featured.as_deref(), Some("2025-02-14T00:00:00.000Z"));
        }

        let snapshot = tracks.clone();
        stamp_dates(&mut tracks, &stamp);
        assert_eq!(tracks, snapshot);
    }
}
