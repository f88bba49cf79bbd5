//! Configuration management
//!
//! Settings are read from a TOML file in the platform config directory.

#[allow(clippy::module_inception)]
pub mod config;
