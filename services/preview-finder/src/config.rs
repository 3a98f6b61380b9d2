//!
//! src/config.rs
//!
//! Environment-backed configuration for the preview finder: Spotify
//! endpoints, HTTP client tuning, credential cache location, logging.
//!
//!

use std::path::PathBuf;
use std::time;

use url::Url;

use crate::errors::PreviewError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 4;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

/// Endpoints the lookup hits; credentials live in the form, not here
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub token_url: Url,
    pub api_base: Url,
}

fn build_spotify() -> Result<SpotifyConfig, PreviewError> {
    let token_url = std::env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string());

    let api_base = std::env::var("SPOTIFY_API_BASE")
        .unwrap_or_else(|_| "https://api.spotify.com/v1/".to_string());

    let token_url = Url::parse(&token_url)
        .map_err(|_| PreviewError::Config(
            "SPOTIFY_TOKEN_URL invalid".to_string()
        ))?;

    let mut api_base = Url::parse(&api_base)
        .map_err(|_| PreviewError::Config(
            "SPOTIFY_API_BASE invalid".to_string()
        ))?;

    // ensure valid https and hostname for both urls
    ensure_https(&token_url).map_err(PreviewError::Config)?;
    ensure_https(&api_base).map_err(PreviewError::Config)?;
    ensure_host(&token_url, "accounts.spotify.com")
        .map_err(PreviewError::Config)?;
    ensure_host(&api_base, "api.spotify.com")
        .map_err(PreviewError::Config)?;

    if !api_base.path().ends_with('/') {
        let mut path = api_base.path().to_string();
        path.push('/');
        api_base.set_path(&path);
    }

    Ok( SpotifyConfig { token_url, api_base } )
}

///
/// Configuration for Http timeouts, pooling, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Configuration for Logger. The terminal belongs to the form, so logs
/// go to a file.
///
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,preview_finder=debug,reqwest=warn".to_string(),
            log_file: PathBuf::from("preview-finder.log"),
        }
    }
}

fn build_logging() -> LoggingConfig {
    let mut cfg = LoggingConfig::default();
    if let Ok(path) = std::env::var("PREVIEW_LOG_FILE") {
        if !path.trim().is_empty() {
            cfg.log_file = PathBuf::from(path);
        }
    }
    cfg
}

///
/// AppConfig which holds everything the form needs at startup
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub http: HttpConfig,
    pub creds_path: PathBuf,
    pub logging: LoggingConfig,
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, PreviewError> {
    dotenvy::dotenv().ok();

    let spotify = build_spotify()?;
    let http    = HttpConfig::default();
    let creds_path = std::env::var("PREVIEW_CONFIG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let logging = build_logging();

    Ok( AppConfig { spotify, http, creds_path, logging } )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_endpoints_default_to_the_real_hosts() {
        let cfg = build_spotify().expect("defaults should parse");
        assert_eq!(cfg.token_url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(cfg.api_base.host_str(), Some("api.spotify.com"));
        assert!(cfg.api_base.path().ends_with('/'));
    }
}
