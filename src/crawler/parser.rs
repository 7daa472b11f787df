//! HTML parser for extracting crawlable links
//!
//! Only anchors that stay inside the crawled site become crawl targets:
//! absolute links with an explicit HTTP(S) origin and anchors opening a new
//! browsing context are dropped at parse time, while links carrying a
//! non-navigable scheme (mailto:, javascript:, ...) are kept tagged so the
//! crawler can warn about them. Document-relative hrefs are resolved against
//! the path of the page they appear on, the same way a browser resolves them.

use scraper::{Html, Selector};
use url::Url;

// Placeholder origin used only to resolve relative hrefs; it never appears
// in a request.
const RESOLUTION_ORIGIN: &str = "http://crawl.invalid";

/// A normalized reference to a page discovered in an anchor element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Raw href as written in the document
    pub href: String,
    /// Scheme tag deciding whether the target is internally navigable
    pub scheme: LinkScheme,
    /// Path component of the target
    pub path: String,
}

/// Scheme classification of a crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkScheme {
    /// Same-site link with no explicit origin; safe to follow
    Internal,
    /// Explicit non-navigable scheme such as "mailto:"
    External(String),
}

impl CrawlTarget {
    /// Target for a site-internal path such as "/" or "/blog/post-1"
    pub fn internal(path: &str) -> Self {
        CrawlTarget {
            href: path.to_string(),
            scheme: LinkScheme::Internal,
            path: path.to_string(),
        }
    }

    /// Key used for visited-set membership: the resolved path
    ///
    /// Two hrefs written differently but resolving to the same path (for
    /// example `about` on one page and `/about` on another) share a key, so
    /// the page is fetched once.
    pub fn visit_key(&self) -> &str {
        &self.path
    }
}

/// Extracts crawl targets from the anchors of an HTML document
///
/// `page_path` is the path of the page the document was fetched from;
/// document-relative hrefs are resolved against it. Returned targets appear
/// in document order; the crawler recurses into them directly, which makes
/// the traversal depth-first over the link graph.
pub fn extract_crawl_targets(html: &str, page_path: &str) -> Vec<CrawlTarget> {
    let origin = Url::parse(RESOLUTION_ORIGIN).expect("static origin");
    let base = origin.join(page_path).unwrap_or(origin);

    let document = Html::parse_document(html);
    let mut targets = Vec::new();

    let selector = Selector::parse("a[href]").expect("static selector");
    for element in document.select(&selector) {
        // Anchors opening another browsing context are not followed.
        if element
            .value()
            .attr("target")
            .is_some_and(|t| !t.is_empty())
        {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(target) = classify_href(href.trim(), &base) {
            targets.push(target);
        }
    }

    targets
}

/// Classifies one href into a crawl target, or None when it must be dropped
fn classify_href(href: &str, base: &Url) -> Option<CrawlTarget> {
    if href.is_empty() {
        return None;
    }

    // Fragment-only links stay on the current page.
    if href.starts_with('#') {
        return None;
    }

    // Protocol-relative links carry an explicit origin.
    if href.starts_with("//") {
        return None;
    }

    match Url::parse(href) {
        // Absolute HTTP(S) links have an explicit origin and are external to
        // the crawl even when they point back at the same host.
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => None,
        Ok(url) => {
            let path = url.path().to_string();
            if path.is_empty() {
                return None;
            }
            Some(CrawlTarget {
                href: href.to_string(),
                scheme: LinkScheme::External(format!("{}:", url.scheme())),
                path,
            })
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let resolved = base.join(href).ok()?;
            let path = resolved.path().to_string();
            if path.is_empty() {
                return None;
            }
            Some(CrawlTarget {
                href: href.to_string(),
                scheme: LinkScheme::Internal,
                path,
            })
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rooted_link() {
        let html = r#"<html><body><a href="/about">About</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets, vec![CrawlTarget::internal("/about")]);
    }

    #[test]
    fn test_relative_link_resolved_against_root_page() {
        let html = r#"<html><body><a href="about">About</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets[0].path, "/about");
        assert_eq!(targets[0].href, "about");
    }

    #[test]
    fn test_relative_link_resolved_against_nested_page() {
        let html = r#"<html><body><a href="post-2">Next</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/blog/post-1");
        assert_eq!(targets[0].path, "/blog/post-2");
    }

    #[test]
    fn test_dot_segments_resolved() {
        let html = r#"<html><body>
            <a href="./sibling">S</a>
            <a href="../up">U</a>
        </body></html>"#;
        let targets = extract_crawl_targets(html, "/docs/guide/intro");
        let paths: Vec<&str> = targets
            .iter()
            .map(|t| t.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/docs/guide/sibling", "/docs/up"]);
    }

    #[test]
    fn test_absolute_same_host_link_dropped() {
        let html = r#"<html><body><a href="https://example.com/page">Link</a></body></html>"#;
        assert!(extract_crawl_targets(html, "/").is_empty());
    }

    #[test]
    fn test_protocol_relative_link_dropped() {
        let html = r#"<html><body><a href="//example.com/page">Link</a></body></html>"#;
        assert!(extract_crawl_targets(html, "/").is_empty());
    }

    #[test]
    fn test_mailto_kept_as_external() {
        let html = r#"<html><body><a href="mailto:hi@example.com">Mail</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0].scheme,
            LinkScheme::External("mailto:".to_string())
        );
    }

    #[test]
    fn test_new_tab_link_dropped() {
        let html = r#"<html><body><a href="/page" target="_blank">Link</a></body></html>"#;
        assert!(extract_crawl_targets(html, "/").is_empty());
    }

    #[test]
    fn test_fragment_only_link_dropped() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_crawl_targets(html, "/").is_empty());
    }

    #[test]
    fn test_fragment_stripped_from_path_but_kept_in_href() {
        let html = r##"<html><body><a href="/docs#intro">Docs</a></body></html>"##;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets[0].path, "/docs");
        assert_eq!(targets[0].href, "/docs#intro");
        assert_eq!(targets[0].visit_key(), "/docs");
    }

    #[test]
    fn test_query_stripped_from_path() {
        let html = r#"<html><body><a href="/search?q=rust">Search</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets[0].path, "/search");
    }

    #[test]
    fn test_same_path_written_differently_shares_visit_key() {
        let html = r#"<html><body><a href="about">A</a><a href="/about">B</a></body></html>"#;
        let targets = extract_crawl_targets(html, "/");
        assert_eq!(targets[0].visit_key(), targets[1].visit_key());
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <html><body>
                <a href="/first">1</a>
                <a href="/second">2</a>
                <a href="/third">3</a>
            </body></html>
        "#;
        let paths: Vec<String> = extract_crawl_targets(html, "/")
            .into_iter()
            .map(|t| t.path)
            .collect();
        assert_eq!(paths, vec!["/first", "/second", "/third"]);
    }

    #[test]
    fn test_empty_href_dropped() {
        let html = r#"<html><body><a href="">Empty</a></body></html>"#;
        assert!(extract_crawl_targets(html, "/").is_empty());
    }
}
