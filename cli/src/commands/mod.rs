//! Command implementations

pub mod exec;
pub mod files;
pub mod targets;
pub mod version;
