//! Core workbench logic for attest
//!
//! - `EntryStore`: the in-memory, insertion-ordered sequence of test
//!   entries. Constructed at process start and passed explicitly; there
//!   is no ambient global.
//! - `Authenticator`: the simulated credential flows over the
//!   persistence layer's `Store` trait.

mod auth;
mod entry_store;

pub use auth::*;
pub use entry_store::*;
