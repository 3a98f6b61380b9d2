//!
//! src/bin/add_charters.rs
//!
//! Merges charter attribution from songs/*.json into tracks.json
//!
//!

use site_tools::{charters, config, logging, store, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "add-charters",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let index = charters::CharterIndex::from_songs_dir(&cfgs.paths.songs_dir)?;
    tracing::info!(songs = index.len(), "charter index built");

    let mut tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let updated = charters::merge_charters(&mut tracks, &index);
    store::save_tracks(&cfgs.paths.tracks_file, &tracks)?;

    tracing::info!(
        updated,
        total = tracks.len(),
        file = %cfgs.paths.tracks_file.display(),
        "charters merged"
    );
    Ok(())
}
