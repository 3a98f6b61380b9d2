//!
//! src/lib.rs
//!
//! Shared library behind the tracks.json maintenance binaries. Each
//! binary under src/bin/ is one single-pass batch transform: load the
//! database, mutate the mapping, write it back.
//!
//!

pub mod audio;
pub mod charters;
pub mod config;
pub mod dates;
pub mod errors;
pub mod logging;
pub mod pages;
pub mod store;
pub mod track;
pub mod urlid;

pub use errors::SiteError;
