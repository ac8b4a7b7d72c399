//! Report renderers
//!
//! Both renderers are pure functions of (entries, settings): the same
//! input produces the same artifact, except for the report number's
//! random suffix, which is injected through [`RandomSource`] so tests
//! can pin it.

mod csv;
mod number;
mod pdf;

pub use csv::*;
pub use number::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Export precondition: rendering an empty entry list is blocked
    /// before any artifact is produced.
    #[error("No entries to export")]
    NoEntries,

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
