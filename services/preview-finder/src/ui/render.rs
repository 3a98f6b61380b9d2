use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::spotify;

use super::app::{App, Field};

pub(crate) fn draw(f: &mut ratatui::Frame, app: &App) {
    let fields = app.fields();

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(10));
    constraints.push(Constraint::Length(4));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let header = Paragraph::new(Line::from(format!(
        "preview-finder  →  api.spotify.com   [mode: {}]",
        app.mode.label()
    )))
    .block(Block::default().borders(Borders::ALL).title("Spotify Preview Finder"));
    f.render_widget(header, chunks[0]);

    for (i, field) in fields.iter().enumerate() {
        f.render_widget(input_box(app, *field), chunks[i + 1]);
    }

    f.render_widget(result_panel(app), chunks[fields.len() + 1]);

    let footer = Paragraph::new(vec![
        Line::from(format!("status: {}", app.status)),
        Line::from(
            "keys: Tab/Shift-Tab fields | Enter search | Ctrl-L mode | Ctrl-S save creds | Ctrl-D download | Esc quit",
        ),
    ])
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(footer, chunks[fields.len() + 2]);
}

fn input_box(app: &App, field: Field) -> Paragraph<'static> {
    let raw = app.value_of(field);
    let shown = if field.masked() {
        "*".repeat(raw.chars().count())
    } else {
        raw.to_string()
    };
    let focused = app.focus == field;
    let shown = if focused { format!("{shown}_") } else { shown };

    let border = if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Paragraph::new(Line::from(shown)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(field.label()),
    )
}

fn result_panel(app: &App) -> Paragraph<'static> {
    let lines = match app.hit.as_ref() {
        Some(hit) => {
            let duration = hit
                .duration_ms
                .map(spotify::format_duration_ms)
                .unwrap_or_else(|| "-".to_string());
            let preview = match hit.preview_url.as_deref() {
                Some(url) => format!("yes  {url}"),
                None => "none for this track".to_string(),
            };
            vec![
                Line::from(format!("track:    {}", hit.name)),
                Line::from(format!("artists:  {}", hit.artists.join(", "))),
                Line::from(format!("album:    {}", hit.album.as_deref().unwrap_or("-"))),
                Line::from(format!(
                    "released: {}",
                    hit.release_date.as_deref().unwrap_or("-")
                )),
                Line::from(format!("duration: {duration}")),
                Line::from(format!("preview:  {preview}")),
                Line::from(format!(
                    "link:     {}",
                    hit.external_url.as_deref().unwrap_or("-")
                )),
                Line::from(format!(
                    "art:      {}",
                    hit.album_art.as_deref().unwrap_or("-")
                )),
            ]
        }
        None => vec![Line::from("No result yet. Fill in the form and press Enter.")],
    };
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Result"))
}
