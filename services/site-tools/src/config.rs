//!
//! src/config.rs
//!
//! Environment-backed configuration shared by every maintenance
//! binary. Each tool reads the same paths so they can be run in
//! any order from the site root.
//!
//!

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use url::Url;

use crate::SiteError;

pub const DEFAULT_TRACKS_FILE: &str = "data/tracks.json";
pub const DEFAULT_SONGS_DIR: &str = "songs";
pub const DEFAULT_PAGES_DIR: &str = "songs";
pub const DEFAULT_AUDIO_DIR: &str = "assets/audio";
pub const DEFAULT_SITE_BASE: &str = "https://hiteriavillage.github.io/";
pub const DEFAULT_LEGACY_HOST: &str = "208.92.234.17:8000";

/// Wrapper over env::var that falls back to a default for unset/blank vars
fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

///
/// Locations of the files every tool reads and rewrites
///
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub tracks_file: PathBuf, // primary database
    pub songs_dir: PathBuf,   // per-song source metadata (*.json)
    pub pages_dir: PathBuf,   // generated redirect pages land here
    pub audio_dir: PathBuf,   // local preview clips
}

fn build_paths() -> PathsConfig {
    PathsConfig {
        tracks_file: PathBuf::from(env_or("TRACKS_FILE", DEFAULT_TRACKS_FILE)),
        songs_dir: PathBuf::from(env_or("SONGS_DIR", DEFAULT_SONGS_DIR)),
        pages_dir: PathBuf::from(env_or("PAGES_DIR", DEFAULT_PAGES_DIR)),
        audio_dir: PathBuf::from(env_or("AUDIO_DIR", DEFAULT_AUDIO_DIR)),
    }
}

///
/// Public base URL of the deployed site, used for absolute links in
/// the generated embed pages
///
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
}

fn build_site() -> Result<SiteConfig, SiteError> {
    let base = env_or("SITE_BASE_URL", DEFAULT_SITE_BASE);

    let mut base_url = Url::parse(&base)
        .map_err(|e| SiteError::Config(
            format!("SITE_BASE_URL invalid {e}")
        ))?;

    ensure_https(&base_url)
        .map_err(SiteError::Config)?;

    // ensure trailing slash so Url::join keeps the full path
    if !base_url.path().ends_with('/') {
        let mut path = base_url.path().to_string();
        path.push('/');
        base_url.set_path(&path);
    }

    Ok( SiteConfig { base_url } )
}

///
/// Legacy streaming host whose URLs get rewritten to local paths
///
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub legacy_host: String, // host:port, no scheme
}

fn build_audio() -> AudioConfig {
    AudioConfig {
        legacy_host: env_or("LEGACY_STREAM_HOST", DEFAULT_LEGACY_HOST),
    }
}

///
/// The single timestamp the date-stamp tool writes into every record
///
#[derive(Debug, Clone)]
pub struct StampConfig {
    pub stamp: DateTime<Utc>,
}

fn build_stamp() -> Result<StampConfig, SiteError> {
    let stamp = match std::env::var("RELEASE_STAMP") {
        Ok(s) if !s.trim().is_empty() => {
            DateTime::parse_from_rfc3339(s.trim())
                .map_err(|e| SiteError::Config(
                    format!("RELEASE_STAMP invalid {e}")
                ))?
                .with_timezone(&Utc)
        }
        _ => crate::dates::default_stamp(),
    };
    Ok( StampConfig { stamp } )
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,site_tools=debug".to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_file_line: false,
            include_target: false,
        }
    }
}

fn build_logging() -> LoggingConfig {
    let mut cfg = LoggingConfig::default();
    if env_or("LOG_FORMAT", "pretty").eq_ignore_ascii_case("json") {
        cfg.format = LogFormat::Json;
        cfg.include_file_line = true;
        cfg.include_target = true;
    }
    cfg
}

///
/// AppConfig which holds everything the maintenance binaries need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub site: SiteConfig,
    pub audio: AudioConfig,
    pub stamp: StampConfig,
    pub logging: LoggingConfig,
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, SiteError> {
    dotenvy::dotenv().ok();

    let paths   = build_paths();
    let site    = build_site()?;
    let audio   = build_audio();
    let stamp   = build_stamp()?;
    let logging = build_logging();

    Ok( AppConfig { paths, site, audio, stamp, logging } )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_base_requires_https() {
        let url = Url::parse("http://example.com/").unwrap();
        assert!(ensure_https(&url).is_err());
        let url = Url::parse("https://example.com/").unwrap();
        assert!(ensure_https(&url).is_ok());
    }

    #[test]
    fn defaults_load_without_env() {
        let cfgs = load_config().expect("defaults should load");
        assert_eq!(cfgs.audio.legacy_host, DEFAULT_LEGACY_HOST);
        assert!(cfgs.site.base_url.path().ends_with('/'));
    }
}
