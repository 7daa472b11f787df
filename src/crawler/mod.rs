//! Crawling the running application over HTTP
//!
//! The crawler fetches pages, extracts same-site links, and hands every
//! fetched page to the content pipeline. Split into the link parser, the
//! HTTP fetcher, and the coordinator driving the traversal.

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{compute_output_path, CrawlState, Crawler};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use parser::{extract_crawl_targets, CrawlTarget, LinkScheme};
