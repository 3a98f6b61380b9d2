//!
//! src/bin/remove_url_ids.rs
//!
//! Strips the urlId field from every track; identifiers come straight
//! from the JSON keys afterwards (key "crazy" serves /crazy)
//!
//!

use site_tools::{config, logging, store, urlid, SiteError};

fn main() -> Result<(), SiteError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "remove-url-ids",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let mut tracks = store::load_tracks(&cfgs.paths.tracks_file)?;
    let removed = urlid::remove_url_ids(&mut tracks);

    if removed > 0 {
        store::save_tracks(&cfgs.paths.tracks_file, &tracks)?;
        tracing::info!(
            removed,
            file = %cfgs.paths.tracks_file.display(),
            "urlId fields removed"
        );
    } else {
        tracing::info!("no urlId fields found in tracks");
    }
    Ok(())
}
