//! Domain layer. Pure types, parsing, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod listing;
pub mod results;
pub mod shell;
pub mod target;

pub use error::{ConfigError, FailureKind, RemoteError};
pub use listing::{DirEntry, EntryKind, PathKind, PathStat};
pub use results::RemoteResults;
pub use target::{ConnectionParameters, Credential, Lookup, TargetRow, TargetSummary, TargetsConfig};
