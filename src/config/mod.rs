//! Configuration management for the rating engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for games and inference.

pub mod app;
pub mod game;
pub mod inference;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use game::GameInfo;
pub use inference::InferenceConfig;
