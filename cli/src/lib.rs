//! sqlload-cli library, exposed for tests.

pub mod app;
pub mod commands;
