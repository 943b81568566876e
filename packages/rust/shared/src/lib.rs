//! Shared types, error model, and configuration for the walkscore workspace.
//!
//! This crate is the foundation depended on by all other walkscore crates.
//! It provides:
//! - [`WalkScoreError`]: the unified error type
//! - Domain types ([`InputRecord`], [`OutputRecord`], [`Score`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, DEFAULT_BASE_URL, DEFAULT_INPUT_FILE, FetchConfig, InputConfig,
    config_file_path, find_config, init_config, load_config, load_config_from,
};
pub use error::{Result, WalkScoreError};
pub use types::{InputRecord, NOT_FOUND_SENTINEL, OutputRecord, Score};
