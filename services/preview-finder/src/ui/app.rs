use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::creds::{self, Credentials};
use crate::errors::PreviewError;
use crate::spotify::{self, SpotifyClient, TrackHit};

use super::render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchMode {
    ByName,
    ByLink,
}

impl SearchMode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchMode::ByName => "by name",
            SearchMode::ByLink => "by link",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    ClientId,
    ClientSecret,
    Title,
    Artist,
    Link,
    SavePath,
}

impl Field {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Field::ClientId => "Client ID",
            Field::ClientSecret => "Client Secret",
            Field::Title => "Song Title",
            Field::Artist => "Artist Name",
            Field::Link => "Spotify Track URL",
            Field::SavePath => "Save Path (blank = auto)",
        }
    }

    pub(crate) fn masked(self) -> bool {
        self == Field::ClientSecret
    }
}

/// Launch the form and drive the event loop.
pub(crate) fn run_tui(cfgs: AppConfig) -> Result<(), PreviewError> {
    let client = SpotifyClient::new(&cfgs.http, &cfgs.spotify)?;
    let saved = creds::load(&cfgs.creds_path);
    let mut app = App::new(client, cfgs.creds_path.clone(), saved);

    let mut term = init_terminal()?;
    let result = ui_loop(&mut term, &mut app);
    restore_terminal(&mut term)?;
    result
}

/// In-memory UI state for rendering + interaction.
pub(crate) struct App {
    client: SpotifyClient,
    creds_path: PathBuf,

    pub(crate) mode: SearchMode,
    pub(crate) focus: Field,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) link: String,
    pub(crate) save_path: String,

    pub(crate) hit: Option<TrackHit>,
    pub(crate) status: String,
}

impl App {
    pub(crate) fn new(
        client: SpotifyClient,
        creds_path: PathBuf,
        saved: Credentials,
    ) -> Self {
        let focus = if saved.is_complete() {
            Field::Title
        } else {
            Field::ClientId
        };
        Self {
            client,
            creds_path,
            mode: SearchMode::ByName,
            focus,
            client_id: saved.client_id,
            client_secret: saved.client_secret,
            title: String::new(),
            artist: String::new(),
            link: String::new(),
            save_path: String::new(),
            hit: None,
            status: "Ready".to_string(),
        }
    }

    /// The fields visible in the current mode, in tab order
    pub(crate) fn fields(&self) -> Vec<Field> {
        match self.mode {
            SearchMode::ByName => vec![
                Field::ClientId,
                Field::ClientSecret,
                Field::Title,
                Field::Artist,
                Field::SavePath,
            ],
            SearchMode::ByLink => vec![
                Field::ClientId,
                Field::ClientSecret,
                Field::Link,
                Field::SavePath,
            ],
        }
    }

    pub(crate) fn value_of(&self, field: Field) -> &str {
        match field {
            Field::ClientId => &self.client_id,
            Field::ClientSecret => &self.client_secret,
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Link => &self.link,
            Field::SavePath => &self.save_path,
        }
    }

    fn value_of_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ClientId => &mut self.client_id,
            Field::ClientSecret => &mut self.client_secret,
            Field::Title => &mut self.title,
            Field::Artist => &mut self.artist,
            Field::Link => &mut self.link,
            Field::SavePath => &mut self.save_path,
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        let field = self.focus;
        self.value_of_mut(field).push(c);
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.focus;
        self.value_of_mut(field).pop();
    }

    pub(crate) fn focus_next(&mut self) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(at + 1) % fields.len()];
    }

    pub(crate) fn focus_prev(&mut self) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(at + fields.len() - 1) % fields.len()];
    }

    pub(crate) fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            SearchMode::ByName => SearchMode::ByLink,
            SearchMode::ByLink => SearchMode::ByName,
        };
        // focus can point at a field the new mode hides
        if !self.fields().contains(&self.focus) {
            self.focus = match self.mode {
                SearchMode::ByName => Field::Title,
                SearchMode::ByLink => Field::Link,
            };
        }
        self.status = format!("Search mode: {}", self.mode.label());
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.trim().to_string(),
            client_secret: self.client_secret.trim().to_string(),
        }
    }

    pub(crate) fn search(&mut self) {
        let creds = self.credentials();
        if !creds.is_complete() {
            self.status = "Enter client ID and client secret first".to_string();
            return;
        }

        self.status = "Searching...".to_string();
        let result = match self.mode {
            SearchMode::ByName => {
                if self.title.trim().is_empty() {
                    self.status = "Enter a song title first".to_string();
                    return;
                }
                self.client.search(&creds, &self.title, &self.artist)
            }
            SearchMode::ByLink => spotify::track_id_from_link(&self.link)
                .and_then(|id| self.client.track(&creds, &id)),
        };

        match result {
            Ok(hit) => {
                info!(track = %hit.id, name = %hit.name, "lookup ok");
                self.status = format!(
                    "Found: {} - {}",
                    hit.name,
                    hit.artists.join(", ")
                );
                self.hit = Some(hit);
            }
            Err(e) => {
                warn!(error = %e, "lookup failed");
                self.status = format!("Error: {e}");
            }
        }
    }

    pub(crate) fn download(&mut self) {
        let Some(hit) = self.hit.clone() else {
            self.status = "Search for a track first".to_string();
            return;
        };
        let dest = if self.save_path.trim().is_empty() {
            PathBuf::from(default_save_name(&hit))
        } else {
            PathBuf::from(self.save_path.trim())
        };
        match self.client.download_preview(&hit, &dest) {
            Ok(bytes) => {
                self.status = format!("Saved {bytes} bytes to {}", dest.display());
            }
            Err(e) => {
                warn!(error = %e, "download failed");
                self.status = format!("Error: {e}");
            }
        }
    }

    pub(crate) fn save_credentials(&mut self) {
        let creds = self.credentials();
        if !creds.is_complete() {
            self.status = "Nothing to save, fill in both credential fields".to_string();
            return;
        }
        match creds::save(&self.creds_path, &creds) {
            Ok(()) => {
                self.status = format!(
                    "Credentials saved to {}",
                    self.creds_path.display()
                );
            }
            Err(e) => {
                warn!(error = %e, "credential save failed");
                self.status = format!("Error: {e}");
            }
        }
    }
}

/// "Artists - Name.mp3" with filesystem-hostile characters replaced
pub(crate) fn default_save_name(hit: &TrackHit) -> String {
    let stem = if hit.artists.is_empty() {
        hit.name.clone()
    } else {
        format!("{} - {}", hit.artists.join(", "), hit.name)
    };
    let stem: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{}.mp3", stem.trim())
}

fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), PreviewError> {
    let tick = Duration::from_millis(250);

    loop {
        terminal.draw(|f| render::draw(f, app))?;

        if event::poll(tick)? {
            if let CEvent::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if k.modifiers.contains(KeyModifiers::CONTROL) {
                    match k.code {
                        KeyCode::Char('l') => app.toggle_mode(),
                        KeyCode::Char('s') => app.save_credentials(),
                        KeyCode::Char('d') => app.download(),
                        KeyCode::Char('c') => return Ok(()),
                        _ => {}
                    }
                    continue;
                }
                match k.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => app.focus_next(),
                    KeyCode::BackTab => app.focus_prev(),
                    KeyCode::Enter => app.search(),
                    KeyCode::Backspace => app.backspace(),
                    KeyCode::Char(c) => app.push_char(c),
                    _ => {}
                }
            }
        }
    }
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, PreviewError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), PreviewError> {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    Ok(())
}
