//! Unit tests for remotekit
//!
//! These tests use mocked ports and run fast without external I/O.

mod architecture;
mod dir_actions_service;
mod mocks;
mod target_catalog_service;
