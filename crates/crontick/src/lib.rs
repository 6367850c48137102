//! Crontick binary internals, exposed as a library for integration tests.

pub mod commands;
pub mod logging;
pub mod tui;
