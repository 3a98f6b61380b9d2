//!
//! src/bin/update_release_dates.rs
//!
//! Overwrites createdAt and lastFeatured on every track with one fixed
//! stamp (RELEASE_STAMP env var overrides the default)
//!
//!

use site_tools::{config, dates, logging, store, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "update-release-dates",
        version = %env!("CARGO_PKG_VERSION"),
        stamp = %dates::format_stamp(&cfgs.stamp.stamp),
        "starting"
    );

    let mut tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let updated = dates::stamp_dates(&mut tracks, &cfgs.stamp.stamp);
    store::save_tracks(&cfgs.paths.tracks_file, &tracks)?;

    tracing::info!(
        updated,
        file = %cfgs.paths.tracks_file.display(),
        "dates stamped"
    );
    Ok(())
}
