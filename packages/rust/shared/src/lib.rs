//! Shared types, error model, and configuration for coursesmith.
//!
//! This crate is the foundation depended on by all other coursesmith crates.
//! It provides:
//! - [`CoursesmithError`] — the unified error type
//! - Domain types ([`Page`])
//! - Configuration ([`AppConfig`], config loading, API key validation)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OpenAiConfig, api_key_looks_valid, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{CoursesmithError, Result};
pub use types::{NO_TITLE, Page};
