//! Configuration module for Harvest
//!
//! This module handles loading, layering, and validating TOML configuration
//! files. Every field has a default taken from the selected [`Profile`], so a
//! config file is optional and may be partial.
//!
//! # Example
//!
//! ```no_run
//! use harvest::config::{load_config, Profile};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml"), Profile::Full).unwrap();
//! println!("Writing pages to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, Config, CoordinationMode, DispatchMode, ExtractMode, FetchConfig, OutputConfig,
    Profile, ServeConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
