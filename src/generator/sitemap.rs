//! Sitemap rendering from the discovered-route registry

use crate::config::SitemapConfig;
use crate::routes::DiscoveredRoute;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Path separators stay literal in <loc>; everything else outside the
// unreserved set is percent-encoded.
const LOC_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One `<url>` entry of the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    /// Formatted as `YYYY-MM-DD` when present
    pub lastmod: Option<String>,
}

/// An in-memory sitemap ready for XML serialization
#[derive(Debug, Default)]
pub struct Sitemap {
    entries: Vec<UrlEntry>,
}

impl Sitemap {
    /// Builds the sitemap for the given public base URL and routes
    ///
    /// Routes whose URL ends with one of the configured ignored suffixes are
    /// left out. Route paths are forced to start with `/` and joined onto
    /// `site_url` with any trailing slash removed.
    pub fn from_routes(site_url: &str, config: &SitemapConfig, routes: &[DiscoveredRoute]) -> Self {
        let base = site_url.trim_end_matches('/');

        let entries = routes
            .iter()
            .filter(|route| {
                !config
                    .ignored_suffixes
                    .iter()
                    .any(|suffix| route.url.ends_with(suffix))
            })
            .map(|route| {
                let path = if route.url.starts_with('/') {
                    route.url.clone()
                } else {
                    format!("/{}", route.url)
                };
                UrlEntry {
                    loc: format!("{}{}", base, utf8_percent_encode(&path, LOC_PATH)),
                    lastmod: route
                        .info
                        .last_modified
                        .map(|lm| lm.format("%Y-%m-%d").to_string()),
                }
            })
            .collect();

        Sitemap { entries }
    }

    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Serializes the sitemap to its XML document
    pub fn into_xml(self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", entry.loc));
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}
