use crate::fetcher::Fetcher;
use crate::traits::FeedClient;
use crate::types::{Assignment, FeedSnapshot, FetchConfig, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Wire format of the assignment feed: course key to its assignments.
type FeedDocument = HashMap<String, Vec<Assignment>>;

fn parse_feed(body: &str) -> Result<FeedSnapshot> {
    let document: FeedDocument = serde_json::from_str(body)?;
    Ok(document.into_iter().collect())
}

/// Reads the assignment feed as JSON over HTTP.
///
/// ```json
/// { "cs304": [ { "name": "A1", "comment": "", "due": "2016-10-01", "late": "" } ] }
/// ```
pub struct HttpFeedClient {
    url: String,
    fetcher: Fetcher,
}

impl HttpFeedClient {
    pub fn new(url: String, fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            url,
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_feed(&self) -> Result<FeedSnapshot> {
        let page = self.fetcher.fetch_page(&self.url).await?;
        let snapshot = parse_feed(&page.body)?;
        info!("Fetched assignment feed from {} ({} courses)", self.url, snapshot.len());
        Ok(snapshot)
    }
}

/// A feed whose contents are known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    snapshot: FeedSnapshot,
}

impl StaticFeed {
    pub fn new(snapshot: FeedSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedClient for StaticFeed {
    async fn fetch_feed(&self) -> Result<FeedSnapshot> {
        Ok(self.snapshot.clone())
    }
}

/// Reads the assignment feed from a local JSON file, same shape as the HTTP
/// feed. The file is read again for every request, so edits show up on the
/// next page load and a broken file degrades records instead of the process.
#[derive(Debug, Clone)]
pub struct FileFeedClient {
    path: PathBuf,
}

impl FileFeedClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedClient for FileFeedClient {
    async fn fetch_feed(&self) -> Result<FeedSnapshot> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = parse_feed(&body)?;
        if snapshot.is_empty() {
            warn!("Assignment feed file {} has no courses", self.path.display());
        }
        debug!("Read assignment feed from {} ({} courses)", self.path.display(), snapshot.len());
        Ok(snapshot)
    }
}
