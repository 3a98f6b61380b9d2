//!
//! src/main.rs
//!
//! Interactive Spotify preview finder. Brings up a terminal form,
//! looks tracks up by name or link, and saves the 30 second preview
//! clip next to the site's audio assets.
//!
//!

mod config;
mod creds;
mod errors;
mod logging;
mod spotify;
mod ui;

use errors::PreviewError;

fn main() -> Result<(), PreviewError> {
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "preview-finder",
        version = %env!("CARGO_PKG_VERSION"),
        log_file = %cfgs.logging.log_file.display(),
        "starting"
    );

    ui::run_tui(cfgs)?;

    tracing::info!(service = "preview-finder", "exiting");
    Ok(())
}
