use crate::types::{FeedSnapshot, Result};
use async_trait::async_trait;

/// Trait for pulling one course's page content from its source site
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable name for this source, used in logs
    fn source_name(&self) -> String;

    /// Fetch the raw HTML fragment for the course.
    ///
    /// Each call starts from scratch: adapters keep no session between calls
    /// and share none with each other. When an expected marker, form or link
    /// is missing the adapter returns `AggregatorError::Protocol` rather than
    /// an empty fragment.
    async fn fetch(&self) -> Result<String>;
}

/// Trait for the shared assignment/deadline feed
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the whole feed. Called once per aggregation request.
    async fn fetch_feed(&self) -> Result<FeedSnapshot>;
}

/// Turns untrusted HTML into the subset that is safe to embed in a page
pub trait Sanitize: Send + Sync {
    fn sanitize(&self, raw_html: &str) -> String;
}
