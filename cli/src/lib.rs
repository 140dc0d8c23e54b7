//! remotekit library: named SSH targets, remote commands and file actions.
//!
//! Exposes modules for integration testing and for use as a library.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
