//!
//! src/pages.rs
//!
//! Generates one static redirect page per track so links shared on
//! Discord and Twitter get a proper embed card before bouncing the
//! visitor to /tracks.html#{id}.
//!
//!

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::SiteError;
use crate::track::{Track, TrackMap};

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no">
    <meta name="theme-color" content="#000000">
    <meta name="description" content="{description}">
    <meta property="og:title" content="{title} - {artist}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="music.song">
    <meta property="og:image" content="{image_url}">
    <meta property="og:url" content="{page_url}">
    <meta property="og:site_name" content="Hiteria Village">
    <meta property="music:musician" content="{artist}">
    <meta property="music:release_date" content="{release_year}">
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{title} - {artist}">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{image_url}">
    <title>{title} - {artist} | Hiteria Village</title>
    <script>
        // Redirect to tracks page with hash
        window.location.href = "/tracks.html#{identifier}";
    </script>
</head>
<body>
    <p>Redirecting to <a href="/tracks.html#{identifier}">{title} - {artist}</a>...</p>
</body>
</html>"##;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// duration/releaseYear can be strings or numbers in the data
fn value_text(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

pub fn render_page(base: &Url, track_id: &str, track: &Track) ->
    Result<String, SiteError> {

    let title = track.title.as_deref().unwrap_or("Unknown");
    let artist = track.artist.as_deref().unwrap_or("Unknown");
    let genre = track.genre.as_deref().unwrap_or("Music");
    let duration = value_text(track.duration.as_ref(), "N/A");
    let release_year = value_text(track.release_year.as_ref(), "N/A");
    let description = format!("{genre} \u{2022} {duration} \u{2022} {release_year}");

    let image_url = match track.cover.as_deref() {
        Some(cover) if !cover.is_empty() => base
            .join(&format!("assets/covers/{cover}"))
            .map_err(|e| SiteError::Config(format!("cover url for {track_id}: {e}")))?,
        _ => base
            .join("assets/images/logo.png")
            .map_err(|e| SiteError::Config(format!("logo url: {e}")))?,
    };
    let page_url = base
        .join(&format!("songs/{track_id}.html"))
        .map_err(|e| SiteError::Config(format!("page url for {track_id}: {e}")))?;

    Ok(PAGE_TEMPLATE
        .replace("{identifier}", &escape_html(track_id))
        .replace("{title}", &escape_html(title))
        .replace("{artist}", &escape_html(artist))
        .replace("{description}", &escape_html(&description))
        .replace("{release_year}", &escape_html(&release_year))
        .replace("{image_url}", &escape_html(image_url.as_str()))
        .replace("{page_url}", &escape_html(page_url.as_str())))
}

/// Writes {id}.html under out_dir for every record. Returns the page
/// count.
pub fn generate_pages(tracks: &TrackMap, base: &Url, out_dir: &Path) ->
    Result<usize, SiteError> {

    fs::create_dir_all(out_dir).map_err(|e|
        SiteError::Store(
            format!("create dir {}: {e}", out_dir.display())
    ))?;

    for (track_id, track) in tracks {
        let html = render_page(base, track_id, track)?;
        let path = out_dir.join(format!("{track_id}.html"));
        fs::write(&path, html).map_err(|e|
            SiteError::Store(format!("write {}: {e}", path.display())))?;
        debug!(page = %path.display(), "generated");
    }
    Ok(tracks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://hiteriavillage.github.io/").unwrap()
    }

    fn sample_track() -> Track {
        Track {
            title: Some("Crazy".to_string()),
            artist: Some("Gnarls Barkley".to_string()),
            genre: Some("Soul".to_string()),
            duration: Some(Value::String("2:58".to_string())),
            release_year: Some(Value::Number(2006.into())),
            cover: Some("crazy.jpg".to_string()),
            ..Track::default()
        }
    }

    #[test]
    fn renders_embed_metadata_and_redirect() {
        let html = render_page(&base(), "crazy", &sample_track()).unwrap();
        assert!(html.contains(
            r#"<meta property="og:title" content="Crazy - Gnarls Barkley">"#
        ));
        assert!(html.contains("Soul \u{2022} 2:58 \u{2022} 2006"));
        assert!(html.contains(
            "https://hiteriavillage.github.io/assets/covers/crazy.jpg"
        ));
        assert!(html.contains(
            "https://hiteriavillage.github.io/songs/crazy.html"
        ));
        assert!(html.contains(r#"window.location.href = "/tracks.html#crazy";"#));
    }

    #[test]
    fn missing_fields_fall_back_to_site_defaults() {
        let html = render_page(&base(), "bare", &Track::default()).unwrap();
        assert!(html.contains("Unknown - Unknown"));
        assert!(html.contains("Music \u{2022} N/A \u{2022} N/A"));
        assert!(html.contains(
            "https://hiteriavillage.github.io/assets/images/logo.png"
        ));
    }

    #[test]
    fn html_in_fields_is_escaped() {
        let mut track = sample_track();
        track.title = Some(r#"<b>"Loud" & Clear</b>"#.to_string());
        let html = render_page(&base(), "loud", &track).unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;&quot;Loud&quot; &amp; Clear&lt;/b&gt;"));
    }

    #[test]
    fn generates_one_page_per_track() -> Result<(), SiteError> {
        let dir = tempfile::tempdir()?;
        let mut tracks = TrackMap::new();
        tracks.insert("crazy".to_string(), sample_track());
        tracks.insert("bare".to_string(), Track::default());

        let count = generate_pages(&tracks, &base(), dir.path())?;
        assert_eq!(count, 2);
        assert!(dir.path().join("crazy.html").is_file());
        assert!(dir.path().join("bare.html").is_file());
        Ok(())
    }
}
