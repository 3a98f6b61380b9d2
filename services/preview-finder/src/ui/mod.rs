//! Terminal form for the preview finder.
//!
//! Keys:
//! - Tab / Shift-Tab: move between fields
//! - typing / Backspace: edit the focused field
//! - Enter: run the search
//! - Ctrl-L: toggle search mode (name / link)
//! - Ctrl-S: save credentials to config.json
//! - Ctrl-D: download the preview clip
//! - Esc: quit

mod app;
mod render;

pub(crate) use app::run_tui;
