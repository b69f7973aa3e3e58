//! Skyaudit Report Writer
//!
//! Serializes a finished run (raw outcomes + summary views) into a
//! timestamped JSON artifact. The summary views arrive precomputed from
//! `skyaudit-core`; this crate only decides the file layout, never the
//! numbers.

pub mod error;
pub mod json;

pub use error::{ReportError, Result};
pub use json::{Report, write_json_report};
