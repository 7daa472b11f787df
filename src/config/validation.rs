use crate::config::types::{AssetsConfig, CrawlConfig, OutputConfig, SiteConfig, SiteSection};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_site_section(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_assets_config(&config.assets)?;

    if config.sitemap.enable && config.site.site_url.is_none() {
        return Err(ConfigError::Validation(
            "sitemap.enable requires site.site-url to be set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output layout configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.folder.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output.folder cannot be empty".to_string(),
        ));
    }

    if config.index_file_name.is_empty() || config.index_file_name.contains('/') {
        return Err(ConfigError::Validation(format!(
            "output.index-file-name must be a bare file name, got '{}'",
            config.index_file_name
        )));
    }

    Ok(())
}

/// Validates site URLs
fn validate_site_section(config: &SiteSection) -> Result<(), ConfigError> {
    if let Some(app_url) = &config.app_url {
        Url::parse(app_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site.app-url: {}", e)))?;
    }

    if let Some(site_url) = &config.site_url {
        Url::parse(site_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site.site-url: {}", e)))?;
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    for url in &config.extra_urls {
        if !url.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "crawl.extra-urls entries must be absolute paths starting with '/', got '{}'",
                url
            )));
        }
    }

    Ok(())
}

/// Validates asset copy configuration
fn validate_assets_config(config: &AssetsConfig) -> Result<(), ConfigError> {
    for entry in &config.content_to_copy {
        if entry.source.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "assets.content-to-copy source cannot be empty".to_string(),
            ));
        }

        if entry.target.starts_with('/') || entry.target.split('/').any(|s| s == "..") {
            return Err(ConfigError::Validation(format!(
                "assets.content-to-copy target must be a relative path inside the output folder, got '{}'",
                entry.target
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ContentToCopy;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiteConfig::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_relative_extra_url_rejected() {
        let mut config = SiteConfig::default();
        config.crawl.extra_urls.push("about".to_string());

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_sitemap_requires_site_url() {
        let mut config = SiteConfig::default();
        config.sitemap.enable = true;

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        config.site.site_url = Some("https://example.com".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_site_url_rejected() {
        let mut config = SiteConfig::default();
        config.site.site_url = Some("not a url".to_string());

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_escaping_copy_target_rejected() {
        let mut config = SiteConfig::default();
        config
            .assets
            .content_to_copy
            .push(ContentToCopy::new("wwwroot/app.css", "../outside.css"));

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_index_file_name_with_separator_rejected() {
        let mut config = SiteConfig::default();
        config.output.index_file_name = "pages/index.html".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
