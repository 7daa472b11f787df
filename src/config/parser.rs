use crate::config::types::SiteConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(SiteConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitefreeze::config::load_config;
///
/// let config = load_config(Path::new("sitefreeze.toml")).unwrap();
/// println!("Output folder: {}", config.output.folder.display());
/// ```
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: SiteConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}
