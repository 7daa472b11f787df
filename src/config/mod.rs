//! Configuration module for Sitefreeze
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitefreeze::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitefreeze.toml")).unwrap();
//! println!("Generating into: {}", config.output.folder.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AssetsConfig, ContentToCopy, CrawlConfig, OutputConfig, OutputStyle, PipelineConfig,
    SiteConfig, SiteSection, SitemapConfig, StageKind,
};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
