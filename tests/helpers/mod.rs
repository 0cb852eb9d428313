//! Shared helpers for the integration tests.

pub mod recording_driver;
pub mod unit_fixtures;
