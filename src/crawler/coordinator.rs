//! Crawl coordination: the reachability walk over the running application
//!
//! The crawler seeds its frontier with the site root and any configured
//! extra URLs, then recurses depth-first through the links of every fetched
//! page. A visited set keyed on the resolved path guarantees each URL is
//! fetched at most once per run; termination follows from the set growing
//! monotonically over a finite link graph.

use crate::config::{OutputConfig, OutputStyle, SiteConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::parser::{extract_crawl_targets, CrawlTarget, LinkScheme};
use crate::pipeline::{ContentContext, ContentPipeline};
use crate::routes::{RouteInfo, RouteRegistry};
use crate::FreezeError;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Mutex;

/// Lifecycle of a crawler instance; each instance supports a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Crawling,
    Done,
}

/// Depth-first crawler over the running application's link graph
pub struct Crawler<'a> {
    app_url: String,
    config: &'a SiteConfig,
    pipeline: &'a ContentPipeline,
    routes: &'a Mutex<RouteRegistry>,
    client: Client,
    visited: HashSet<String>,
    state: CrawlState,
}

impl<'a> Crawler<'a> {
    /// Creates a crawler against the application bound at `app_url`
    pub fn new(
        app_url: &str,
        config: &'a SiteConfig,
        pipeline: &'a ContentPipeline,
        routes: &'a Mutex<RouteRegistry>,
    ) -> Result<Self, FreezeError> {
        let client = build_http_client()?;
        Ok(Crawler {
            app_url: app_url.trim_end_matches('/').to_string(),
            config,
            pipeline,
            routes,
            client,
            visited: HashSet::new(),
            state: CrawlState::Idle,
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl: the root path first, then every configured extra URL
    ///
    /// Per-page fetch problems are logged and skipped; only pipeline
    /// failures propagate, ending the crawl.
    pub async fn start_crawling(&mut self) -> Result<(), FreezeError> {
        if self.state != CrawlState::Idle {
            return Err(FreezeError::CrawlAlreadyRan);
        }
        self.state = CrawlState::Crawling;

        self.crawl_page(CrawlTarget::internal("/")).await?;

        let extra_urls = self.config.crawl.extra_urls.clone();
        for url in &extra_urls {
            self.crawl_page(CrawlTarget::internal(url)).await?;
        }

        self.state = CrawlState::Done;
        Ok(())
    }

    fn crawl_page<'s>(
        &'s mut self,
        target: CrawlTarget,
    ) -> Pin<Box<dyn Future<Output = Result<(), FreezeError>> + 's>> {
        Box::pin(async move {
            let key = target.visit_key().to_string();
            if !self.visited.insert(key) {
                return Ok(());
            }

            if let LinkScheme::External(scheme) = &target.scheme {
                tracing::warn!(
                    "The requested URL ({}) was not navigable ({})",
                    target.href,
                    scheme
                );
                return Ok(());
            }

            let request_url = format!("{}{}", self.app_url, target.path);
            if url::Url::parse(&request_url).is_err() {
                tracing::warn!("The requested URL ({}) was not a valid format", request_url);
                return Ok(());
            }
            tracing::info!("Getting {}", request_url);

            let (body, last_modified) = match fetch_page(&self.client, &request_url).await {
                FetchOutcome::Html {
                    body,
                    last_modified,
                } => (body, last_modified),
                FetchOutcome::WrongStatus { status } => {
                    tracing::warn!(
                        "The HTTP status code was not OK. {} responded with {}.",
                        request_url,
                        status
                    );
                    return Ok(());
                }
                FetchOutcome::NotHtml { content_type } => {
                    tracing::info!(
                        "Expected text/html content type for {}, but was {}.",
                        request_url,
                        content_type
                    );
                    return Ok(());
                }
                FetchOutcome::Failed { error } => {
                    tracing::warn!("Failed to fetch {}: {}", request_url, error);
                    return Ok(());
                }
            };

            let output_path = compute_output_path(&self.config.output, &target.path);
            let mut ctx = ContentContext::new(
                self.config,
                request_url.clone(),
                output_path,
                body.clone().into_bytes(),
            );
            self.pipeline.run(&mut ctx)?;

            {
                let mut routes = self.routes.lock().unwrap();
                let info = last_modified.map(|lm| RouteInfo {
                    last_modified: Some(lm),
                });
                routes.add_route(&target.path, info);
            }

            // Recurse in document order: depth-first traversal.
            for link in extract_crawl_targets(&body, &target.path) {
                self.crawl_page(link).await?;
            }

            Ok(())
        })
    }
}

/// Maps a URL path to its file on disk per the configured output style
pub fn compute_output_path(output: &OutputConfig, path: &str) -> PathBuf {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match output.style {
        OutputStyle::IndexInSubfolders => {
            let mut file = output.folder.clone();
            for segment in &segments {
                file.push(segment);
            }
            file.push(&output.index_file_name);
            file
        }
        OutputStyle::AppendHtmlExtension => {
            if segments.is_empty() {
                return output.folder.join(&output.index_file_name);
            }
            let mut file = output.folder.clone();
            for segment in &segments {
                file.push(segment);
            }
            let mut name = file.into_os_string();
            name.push(".html");
            PathBuf::from(name)
        }
    }
}
