//! Page fetching for coursesmith.
//!
//! A thin HTTP layer: one GET per page with a fixed browser-like User-Agent,
//! erroring on transport failure or a non-2xx status, then handing the body
//! to the extractor. No retries, no caching, no crawl state.

pub mod extract;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use coursesmith_shared::{CoursesmithError, Page, Result};

/// Some websites refuse requests without a browser-looking User-Agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Fetches pages over HTTP and extracts their content.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the shared HTTP client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CoursesmithError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch a single page and extract its title, text, and links.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<Page> {
        debug!("fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CoursesmithError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoursesmithError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CoursesmithError::Network(format!("{url}: body read failed: {e}")))?;

        let page = extract::extract_page(url.as_str(), &body);

        debug!(
            title = %page.title,
            text_len = page.text.len(),
            links = page.links.len(),
            "page extracted"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_extracts_page() {
        let server = MockServer::start().await;

        let html = r#"<html><head><title>Lesson</title></head>
            <body><p>Content here.</p><a href="/next">Next</a></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/lesson"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let url = Url::parse(&format!("{}/lesson", server.uri())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.title, "Lesson");
        assert_eq!(page.text, "Content here.\nNext");
        assert_eq!(page.links, vec!["/next"]);
    }

    #[tokio::test]
    async fn fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", BROWSER_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>ok</body></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        fetcher.fetch(&url).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, CoursesmithError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let fetcher = Fetcher::new().unwrap();
        // Port 1 is essentially never listening
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, CoursesmithError::Network(_)));
    }
}
