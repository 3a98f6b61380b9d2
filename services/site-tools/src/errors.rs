//!
//! src/errors.rs
//!
//! Defines enums and methods of error conversion
//! for errors the maintenance tools use
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("config error: {0}")]
    Config(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SiteError {
    fn from(e: serde_json::Error) -> Self { SiteError::Parse(e.to_string()) }
}
