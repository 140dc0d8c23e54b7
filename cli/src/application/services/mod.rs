//! Application services: use-case orchestration.
//!
//! Each service module composes domain logic with port trait calls. Services
//! import only from `crate::domain` and `crate::application::ports`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod dir_actions;
pub mod file_actions;
pub mod remote_command;
pub mod target_catalog;

pub use remote_command::Remote;
