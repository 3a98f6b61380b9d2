//!
//! src/creds.rs
//!
//! Plaintext credential cache (config.json) with an env fallback so
//! the form comes up pre-filled.
//!
//!

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::PreviewError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

/// Saved file wins; otherwise SPOTIFY_CLIENT_ID/SECRET from the
/// environment; otherwise empty fields for the user to fill in.
pub fn load(path: &Path) -> Credentials {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Credentials>(&raw) {
            Ok(creds) if creds.is_complete() => {
                debug!(file = %path.display(), "loaded saved credentials");
                return creds;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(file = %path.display(), error = %e, "credential cache unreadable");
            }
        },
        Err(_) => {}
    }

    Credentials {
        client_id: std::env::var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
        client_secret: std::env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
    }
}

pub fn save(path: &Path, creds: &Credentials) -> Result<(), PreviewError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e|
        PreviewError::Config(
            format!("create dir {}: {e}", parent.display())
    ))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| PreviewError::Config(
            format!("tempfile in {}: {e}", parent.display())
        ))?;
    {
        let file = temp.as_file_mut();
        serde_json::to_writer_pretty(&mut *file, creds)?;
        file.write_all(b"\n")?;
        file.flush()?;
    }
    temp.persist(path).map_err(|e|
        PreviewError::Config(format!("persist {}: {e}", path.display())))?;

    debug!(file = %path.display(), "credentials saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() -> Result<(), PreviewError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        let creds = Credentials {
            client_id: "abc".to_string(),
            client_secret: "shh".to_string(),
        };

        save(&path, &creds)?;
        assert_eq!(load(&path), creds);
        Ok(())
    }

    #[test]
    fn incomplete_pairs_are_incomplete() {
        assert!(!Credentials::default().is_complete());
        assert!(!Credentials {
            client_id: "abc".to_string(),
            client_secret: "  ".to_string(),
        }
        .is_complete());
        assert!(Credentials {
            client_id: "abc".to_string(),
            client_secret: "shh".to_string(),
        }
        .is_complete());
    }
}
