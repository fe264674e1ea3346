//! Repository file tree and bounded document selection.
//!
//! `docpick::core` turns a flat list of repository paths into a sorted tree,
//! tracks which leaf files are selected (with an optional upper bound), and
//! packages the selection as an ingestion job.

pub mod core;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;

pub use error::{Error, Result};
