//! Configuration module for the lip-sync engine.
//!
//! Provides `LipSyncConfig` (top-level settings), sub-configs for the
//! envelope and the fetch layer, `AppPaths` for cross-platform config
//! directories, and TOML persistence via `LipSyncConfig::load` /
//! `LipSyncConfig::save`.
//!
//! Nothing in here is process-global: a config value reaches a component
//! only by being passed into its constructor.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{EnvelopeConfig, FetchConfig, LipSyncConfig};
