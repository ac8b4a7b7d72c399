//! Shared utilities for attest
//!
//! This crate provides:
//! - ID types (EntryId, UserId)
//! - Time helpers (today's date, report date formatting)
//! - Text helpers (whitespace collapsing, wrapping, width estimation)
//! - Default data directory resolution

mod ids;
mod paths;
mod text;
mod time;

pub use ids::*;
pub use paths::*;
pub use text::*;
pub use time::*;
