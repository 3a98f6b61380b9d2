//!
//! src/spotify.rs
//!
//! Blocking Spotify Web API client: client-credentials token flow,
//! track lookup/search, preview clip download. Calls block the form's
//! event loop; the tool is single-threaded end to end.
//!
//!

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::{header, redirect};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::{HttpConfig, SpotifyConfig};
use crate::creds::Credentials;
use crate::errors::PreviewError;

/// Refresh the cached token this long before Spotify expires it
const TOKEN_SLACK: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackHit {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub duration_ms: Option<u64>,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
    pub album_art: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    bearer: String,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct SpotifyClient {
    http: Client,
    cfg: SpotifyConfig,
    token: Option<CachedToken>,
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, PreviewError> {

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json")
        );

        let http = Client::builder()
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(http_config.pool_idle_timeout))
            .redirect(redirect::Policy::limited(http_config.max_redirects as usize))
            .default_headers(headers)
            .build()
            .map_err(|e| PreviewError::Http(format!("build client: {e}")))?;

        Ok( Self { http, cfg: cfg.clone(), token: None } )
    }

    /// POST /api/token with grant_type=client_credentials, cached until
    /// shortly before expiry
    fn bearer(&mut self, creds: &Credentials) -> Result<String, PreviewError> {
        if let Some(token) = &self.token {
            if token.expires_at > Instant::now() {
                return Ok(token.bearer.clone());
            }
        }

        let response = self.http
            .post(self.cfg.token_url.clone())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .send()?;

        if !response.status().is_success() {
            return Err(PreviewError::Http(
                format!("token request failed: {}", response.status())
            ));
        }

        let token: Value = response.json()?;
        let bearer = token["access_token"].as_str()
            .ok_or_else(|| PreviewError::Parse(
                "token response missing access_token".to_string()
            ))?
            .to_string();
        let expires_in = token["expires_in"].as_u64().unwrap_or(3600);

        debug!(expires_in, "token refreshed");
        self.token = Some(CachedToken {
            bearer: bearer.clone(),
            expires_at: Instant::now()
                + Duration::from_secs(expires_in.saturating_sub(TOKEN_SLACK)),
        });
        Ok(bearer)
    }

    /// GET /v1/tracks/{id}
    pub fn track(&mut self, creds: &Credentials, track_id: &str) ->
        Result<TrackHit, PreviewError> {

        let bearer = self.bearer(creds)?;
        let url = self.cfg.api_base.join(&format!("tracks/{track_id}"))
            .map_err(|e| PreviewError::Config(
                format!("bad track url for '{track_id}': {e}")
            ))?;
        let response = self.http.get(url).bearer_auth(&bearer).send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PreviewError::NotFound(format!("track {track_id}")));
        }
        if !response.status().is_success() {
            return Err(PreviewError::Http(
                format!("track lookup failed: {}", response.status())
            ));
        }

        let track: Value = response.json()?;
        parse_track(&track)
    }

    /// GET /v1/search?type=track&q=...&limit=1, first hit wins
    pub fn search(&mut self, creds: &Credentials, title: &str, artist: &str) ->
        Result<TrackHit, PreviewError> {

        let bearer = self.bearer(creds)?;
        let query = if artist.trim().is_empty() {
            title.trim().to_string()
        } else {
            format!("track:{} artist:{}", title.trim(), artist.trim())
        };

        let url = self.cfg.api_base.join("search")
            .map_err(|e| PreviewError::Config(format!("bad search url: {e}")))?;
        let response = self.http.get(url).bearer_auth(&bearer).query(&[
            ("type", "track"),
            ("q", query.as_str()),
            ("limit", "1"),
            ("offset", "0"),
        ]).send()?;

        if !response.status().is_success() {
            return Err(PreviewError::Http(
                format!("search failed: {}", response.status())
            ));
        }

        let body: Value = response.json()?;
        let item = body.pointer("/tracks/items/0")
            .ok_or_else(|| PreviewError::NotFound(
                format!("no results for '{query}'")
            ))?;
        parse_track(item)
    }

    /// Streams the 30s preview clip to dest via a temp file next to it
    pub fn download_preview(&self, hit: &TrackHit, dest: &Path) ->
        Result<u64, PreviewError> {

        let preview_url = hit.preview_url.as_deref()
            .ok_or_else(|| PreviewError::NotFound(
                format!("'{}' has no preview clip", hit.name)
            ))?;

        let mut response = self.http.get(preview_url).send()?;
        if !response.status().is_success() {
            return Err(PreviewError::Http(
                format!("preview download failed: {}", response.status())
            ));
        }

        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e|
            PreviewError::Io(e))?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .map_err(PreviewError::Io)?;
        let bytes = io::copy(&mut response, temp.as_file_mut())
            .map_err(PreviewError::Io)?;
        temp.persist(dest).map_err(|e| PreviewError::Io(e.error))?;

        info!(track = %hit.id, bytes, file = %dest.display(), "preview downloaded");
        Ok(bytes)
    }
}

/// Field extraction from one track object, shared by lookup and search
pub fn parse_track(track: &Value) -> Result<TrackHit, PreviewError> {
    let id = track["id"].as_str()
        .ok_or_else(|| PreviewError::Parse("track missing id".to_string()))?
        .to_string();
    let name = track["name"].as_str().unwrap_or_default().to_string();
    let artists = track["artists"].as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|a| a["name"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(TrackHit {
        id,
        name,
        artists,
        album: track.pointer("/album/name")
            .and_then(Value::as_str)
            .map(str::to_string),
        release_date: track.pointer("/album/release_date")
            .and_then(Value::as_str)
            .map(str::to_string),
        duration_ms: track["duration_ms"].as_u64(),
        preview_url: track["preview_url"].as_str().map(str::to_string),
        external_url: track.pointer("/external_urls/spotify")
            .and_then(Value::as_str)
            .map(str::to_string),
        album_art: track.pointer("/album/images/0/url")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Pulls the id out of an open.spotify.com track link; tolerates query
/// strings and locale prefixes like /intl-fr/track/...
pub fn track_id_from_link(link: &str) -> Result<String, PreviewError> {
    let url = Url::parse(link.trim())
        .map_err(|e| PreviewError::Parse(format!("invalid track link: {e}")))?;

    let host_ok = url.host_str()
        .is_some_and(|h| h == "open.spotify.com" || h.ends_with(".spotify.com"));
    if !host_ok {
        return Err(PreviewError::Parse(
            format!("not a spotify link: {link}")
        ));
    }

    let mut segments = url.path_segments()
        .ok_or_else(|| PreviewError::Parse(
            format!("no path in link: {link}")
        ))?;

    let id = segments
        .by_ref()
        .skip_while(|segment| *segment != "track")
        .nth(1)
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()));

    match id {
        Some(id) => Ok(id.to_string()),
        None => Err(PreviewError::Parse(
            format!("no track id in link: {link}")
        )),
    }
}

pub fn format_duration_ms(ms: u64) -> String {
    format!("{}:{:02}", ms / 60_000, (ms % 60_000) / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn live() -> bool {
        std::env::var("LIVE_HTTP").ok().as_deref() == Some("1")
    }

    fn sample_track() -> Value {
        serde_json::json!({
            "id": "6GtOsEzNUhJghrIf6UTbRV",
            "name": "Breathe Deeper",
            "artists": [
                { "name": "Tame Impala" },
                { "name": "Lil Yachty" }
            ],
            "album": {
                "name": "The Slow Rush",
                "release_date": "2020-02-14",
                "images": [
                    { "url": "https://i.scdn.co/image/large" },
                    { "url": "https://i.scdn.co/image/small" }
                ]
            },
            "duration_ms": 373_316,
            "preview_url": "https://p.scdn.co/mp3-preview/abc",
            "external_urls": { "spotify": "https://open.spotify.com/track/6GtOsEzNUhJghrIf6UTbRV" }
        })
    }

    #[test]
    fn parses_the_fields_the_form_shows() {
        let hit = parse_track(&sample_track()).unwrap();
        assert_eq!(hit.id, "6GtOsEzNUhJghrIf6UTbRV");
        assert_eq!(hit.name, "Breathe Deeper");
        assert_eq!(hit.artists, ["Tame Impala", "Lil Yachty"]);
        assert_eq!(hit.album.as_deref(), Some("The Slow Rush"));
        assert_eq!(hit.release_date.as_deref(), Some("2020-02-14"));
        assert_eq!(hit.duration_ms, Some(373_316));
        assert_eq!(hit.album_art.as_deref(), Some("https://i.scdn.co/image/large"));
        assert!(hit.preview_url.is_some());
    }

    #[test]
    fn parse_requires_an_id() {
        let err = parse_track(&serde_json::json!({ "name": "no id" })).unwrap_err();
        assert!(matches!(err, PreviewError::Parse(_)));
    }

    #[test]
    fn link_parsing_handles_the_common_shapes() {
        let id = "6GtOsEzNUhJghrIf6UTbRV";
        for link in [
            "https://open.spotify.com/track/6GtOsEzNUhJghrIf6UTbRV",
            "https://open.spotify.com/track/6GtOsEzNUhJghrIf6UTbRV?si=xyz123",
            "https://open.spotify.com/intl-fr/track/6GtOsEzNUhJghrIf6UTbRV",
            "  https://open.spotify.com/track/6GtOsEzNUhJghrIf6UTbRV  ",
        ] {
            assert_eq!(track_id_from_link(link).unwrap(), id, "link: {link}");
        }
    }

    #[test]
    fn link_parsing_rejects_junk() {
        for link in [
            "not a url",
            "https://example.com/track/abc123",
            "https://open.spotify.com/album/3mH6qwIy9crq0I9YQbOuDf",
            "https://open.spotify.com/track/",
        ] {
            assert!(track_id_from_link(link).is_err(), "link: {link}");
        }
    }

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration_ms(373_316), "6:13");
        assert_eq!(format_duration_ms(59_999), "0:59");
        assert_eq!(format_duration_ms(60_000), "1:00");
    }

    #[test]
    fn spotify_client_testbench() -> Result<(), PreviewError> {
        dotenvy::dotenv().ok();

        if !live() {
            eprintln!("Set LIVE_HTTP=1 to run");
            return Ok(())
        }

        let cfgs = config::load_config()?;
        let creds = Credentials {
            client_id: std::env::var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
        };
        assert!(creds.is_complete(), "set SPOTIFY_CLIENT_ID/SECRET");

        let mut spotify = SpotifyClient::new(&cfgs.http, &cfgs.spotify)?;

        // Breathe Deeper - Tame Impala, Lil Yachty
        let hit = spotify.track(&creds, "6GtOsEzNUhJghrIf6UTbRV")?;
        println!("track: {hit:#?}");
        assert_eq!(hit.name, "Breathe Deeper");

        let found = spotify.search(&creds, "Breathe Deeper", "Tame Impala")?;
        println!("search: {found:#?}");
        assert_eq!(found.id, hit.id);

        Ok(())
    }
}
