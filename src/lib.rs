//! Sitefreeze: freeze a running web application into a static site
//!
//! This crate crawls a live HTTP-rendered application, pushes every page and
//! static asset through a configurable content pipeline, and lays the result
//! out as files on disk alongside a sitemap.

pub mod assets;
pub mod config;
pub mod crawler;
pub mod generator;
pub mod pipeline;
pub mod routes;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitefreeze operations
#[derive(Debug, Error)]
pub enum FreezeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Crawl already ran; a crawler instance supports a single run")]
    CrawlAlreadyRan,

    #[error("Sitemap requires site-url to be configured")]
    MissingSiteUrl,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by content-pipeline stages
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Target path {0} has no parent directory component")]
    MissingParent(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Sitefreeze operations
pub type Result<T> = std::result::Result<T, FreezeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

// Re-export commonly used types
pub use config::{ContentToCopy, OutputStyle, SiteConfig};
pub use crawler::Crawler;
pub use generator::{GenerationContext, Generator};
pub use pipeline::{ContentContext, ContentPipeline};
pub use routes::{RouteInfo, RouteRegistry};
