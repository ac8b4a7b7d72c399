//! Shared data model for attest
//!
//! One `ProductEntry` per recorded product test. Entries are immutable
//! once created: the derived `total_operations` is computed at creation
//! time and never recomputed.

mod entry;
mod summary;

pub use entry::*;
pub use summary::*;
