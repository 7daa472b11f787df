//! HTTP fetcher for the crawl
//!
//! One GET per page against the running application. Anything other than a
//! 200 `text/html` response ends that branch of the traversal; the outcome
//! enum tells the coordinator which warning to log.

use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

/// Result of fetching one page
#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 response carrying HTML
    Html {
        body: String,
        /// Parsed Last-Modified header, if the server sent one
        last_modified: Option<DateTime<Utc>>,
    },

    /// Response status was not 200
    WrongStatus { status: u16 },

    /// 200 response with a non-HTML media type
    NotHtml { content_type: String },

    /// Request failed before a response was read
    Failed { error: String },
}

/// Builds the HTTP client used for the whole crawl
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("sitefreeze/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Fetches one page and classifies the response
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    let status = response.status().as_u16();
    if status != 200 {
        return FetchOutcome::WrongStatus { status };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if media_type != "text/html" {
        return FetchOutcome::NotHtml { content_type };
    }

    let last_modified = response
        .headers()
        .get(reqwest::header::LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
        .map(|dt| dt.with_timezone(&Utc));

    match response.text().await {
        Ok(body) => FetchOutcome::Html {
            body,
            last_modified,
        },
        Err(e) => FetchOutcome::Failed {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html></html>", "text/html; charset=utf-8")
                    .insert_header("last-modified", "Wed, 01 Jan 2025 00:00:00 GMT"),
            )
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_page(&client, &format!("{}/", server.uri())).await;

        match outcome {
            FetchOutcome::Html {
                body,
                last_modified,
            } => {
                assert_eq!(body, "<html></html>");
                assert!(last_modified.is_some());
            }
            other => panic!("expected Html, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_page(&client, &format!("{}/missing", server.uri())).await;

        assert!(matches!(outcome, FetchOutcome::WrongStatus { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
            )
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_page(&client, &format!("{}/api", server.uri())).await;

        match outcome {
            FetchOutcome::NotHtml { content_type } => {
                assert_eq!(content_type, "application/json")
            }
            other => panic!("expected NotHtml, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_failure() {
        let client = build_http_client().unwrap();
        // Port 1 is never listening.
        let outcome = fetch_page(&client, "http://127.0.0.1:1/").await;
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    }
}
