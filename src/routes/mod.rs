//! Route registry shared between the crawler and the sitemap emitter
//!
//! The crawler records every visited URL here; hooks may attach metadata
//! before or after the corresponding route is discovered. Keys are compared
//! case-insensitively.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Metadata attached to a discovered route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteInfo {
    pub last_modified: Option<DateTime<Utc>>,
}

/// A single crawled URL plus its metadata
#[derive(Debug, Clone)]
pub struct DiscoveredRoute {
    pub url: String,
    pub info: RouteInfo,
}

#[derive(Debug)]
struct RouteRecord {
    url: String,
    info: RouteInfo,
    // False while only metadata has been staged for a URL the crawler has
    // not reached yet.
    discovered: bool,
}

/// Case-insensitive map from URL to route record
///
/// `add_route` and `update_route_info` may be called in either order for the
/// same URL: metadata staged before discovery is attached when the route is
/// later added.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, RouteRecord>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        RouteRegistry::default()
    }

    /// Records a discovered route
    ///
    /// If metadata was staged for this URL before discovery, the staged
    /// metadata wins over `info`.
    pub fn add_route(&mut self, url: &str, info: Option<RouteInfo>) {
        let key = url.to_lowercase();
        match self.routes.get_mut(&key) {
            Some(record) => {
                if !record.discovered {
                    record.discovered = true;
                } else if let Some(info) = info {
                    record.info = info;
                }
            }
            None => {
                self.routes.insert(
                    key,
                    RouteRecord {
                        url: url.to_string(),
                        info: info.unwrap_or_default(),
                        discovered: true,
                    },
                );
            }
        }
    }

    /// Sets the metadata for a route, staging it if the route does not exist yet
    pub fn update_route_info(&mut self, url: &str, info: RouteInfo) {
        let key = url.to_lowercase();
        match self.routes.get_mut(&key) {
            Some(record) => record.info = info,
            None => {
                self.routes.insert(
                    key,
                    RouteRecord {
                        url: url.to_string(),
                        info,
                        discovered: false,
                    },
                );
            }
        }
    }

    /// All routes the crawler actually visited
    pub fn discovered_routes(&self) -> Vec<DiscoveredRoute> {
        let mut routes: Vec<DiscoveredRoute> = self
            .routes
            .values()
            .filter(|r| r.discovered)
            .map(|r| DiscoveredRoute {
                url: r.url.clone(),
                info: r.info.clone(),
            })
            .collect();
        // Deterministic ordering for sitemap output and tests.
        routes.sort_by(|a, b| a.url.cmp(&b.url));
        routes
    }

    pub fn len(&self) -> usize {
        self.routes.values().filter(|r| r.discovered).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
