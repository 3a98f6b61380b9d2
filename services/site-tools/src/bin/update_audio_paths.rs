//!
//! src/bin/update_audio_paths.rs
//!
//! Rewrites previewUrl values off the legacy streaming host onto local
//! /assets/audio paths, then verifies the referenced files exist
//!
//!

use site_tools::{audio, config, logging, store, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "update-audio-paths",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let available = audio::list_audio_files(&cfgs.paths.audio_dir)?;
    tracing::info!(
        count = available.len(),
        dir = %cfgs.paths.audio_dir.display(),
        "available audio files"
    );
    for name in &available {
        tracing::debug!(file = %name, "available");
    }

    let mut tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let updated = audio::update_audio_paths(&mut tracks, &cfgs.audio.legacy_host);

    if updated > 0 {
        store::save_tracks(&cfgs.paths.tracks_file, &tracks)?;
        tracing::info!(updated, "audio paths rewritten to local files");
    } else {
        tracing::info!("no updates needed, all tracks already use local audio paths");
    }

    let missing = audio::verify_audio_files(&tracks, &cfgs.paths.audio_dir);
    if missing.is_empty() {
        tracing::info!("all tracks have corresponding audio files");
    } else {
        for item in &missing {
            tracing::warn!(
                track = %item.track_id,
                title = %item.title,
                file = %item.filename,
                "audio file missing"
            );
        }
        tracing::warn!(count = missing.len(), "tracks with missing audio files");
    }
    Ok(())
}
