//! Configuration records for attest
//!
//! Two concerns:
//! - The singleton `ReportSettings` record: explicitly typed, versioned,
//!   serialized as JSON, loaded wholesale and saved wholesale.
//! - The TOML entry batch file the CLI ingests: versioned raw schema,
//!   validated with clear error messages, converted to typed drafts.

mod batch;
mod settings;

pub use batch::*;
pub use settings::*;
