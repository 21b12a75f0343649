use crate::types::{AggregatorError, FetchConfig, Result};
use reqwest::{Client, RequestBuilder, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// A fetched HTML document and the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Single-attempt HTTP client shared by the source adapters and feed client.
///
/// There is no retry and no backoff: a failed request fails the course for
/// this aggregation only.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Self::client_builder(&config).build()?;
        Ok(Self { client, config })
    }

    /// Same configuration, but cookies persist between requests made through
    /// this fetcher. Used for one login session at a time.
    pub fn with_cookies(config: FetchConfig) -> Result<Self> {
        let client = Self::client_builder(&config).cookie_store(true).build()?;
        Ok(Self { client, config })
    }

    fn client_builder(config: &FetchConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        debug!("Fetching page: {}", url);
        let request = self.client.get(Url::parse(url)?);
        self.send(request).await
    }

    /// Send a prepared request and read the body as a page.
    pub async fn send(&self, request: RequestBuilder) -> Result<Page> {
        let start_time = Instant::now();
        let response = request.send().await?;
        let page = self.read_page(response).await?;
        info!(
            "Fetched {} ({} bytes, {}ms)",
            page.url,
            page.body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(page)
    }

    async fn read_page(&self, mut response: Response) -> Result<Page> {
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            return Err(AggregatorError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length as usize)?;
        }

        // Chunked responses carry no length up front, so the cap is enforced
        // while the body streams in.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            self.check_size(body.len())?;
        }

        Ok(Page {
            url,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn check_size(&self, bytes: usize) -> Result<()> {
        let size_mb = bytes / (1024 * 1024);
        if size_mb > self.config.max_page_size_mb {
            return Err(AggregatorError::PageTooLarge { size_mb });
        }
        Ok(())
    }
}
