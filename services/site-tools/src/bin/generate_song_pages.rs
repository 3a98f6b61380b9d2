//!
//! src/bin/generate_song_pages.rs
//!
//! Generates one redirect HTML page per track for social-media embeds.
//! Run whenever tracks.json changes.
//!
//!

use site_tools::{config, logging, pages, store, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "generate-song-pages",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let count = pages::generate_pages(
        &tracks,
        &cfgs.site.base_url,
        &cfgs.paths.pages_dir,
    )?;

    tracing::info!(
        count,
        dir = %cfgs.paths.pages_dir.display(),
        base = %cfgs.site.base_url,
        "song pages generated"
    );
    Ok(())
}
