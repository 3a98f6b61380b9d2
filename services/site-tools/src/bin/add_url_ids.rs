//!
//! src/bin/add_url_ids.rs
//!
//! Adds a urlId field mirroring the record key to every track
//!
//!

use site_tools::{config, logging, store, urlid, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "add-url-ids",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let mut tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let added = urlid::add_url_ids(&mut tracks);

    if added > 0 {
        store::save_tracks(&cfgs.paths.tracks_file, &tracks)?;
        tracing::info!(
            added,
            file = %cfgs.paths.tracks_file.display(),
            "urlId fields added"
        );
    } else {
        tracing::info!("all tracks already have urlId fields");
    }
    Ok(())
}
