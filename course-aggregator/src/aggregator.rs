use crate::registry::AdapterRegistry;
use crate::traits::{FeedClient, Sanitize};
use crate::types::{AggregatorError, CourseError, CourseKey, CourseRecord, FeedSnapshot, SourceResult};
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How the feed task ended. Resolved exactly once per request.
pub type FeedOutcome = std::result::Result<FeedSnapshot, CourseError>;

/// The feed barrier: every course task awaits a clone of this future, and
/// all of them observe the same fully resolved outcome.
type FeedBarrier = Shared<BoxFuture<'static, Arc<FeedOutcome>>>;

/// Fetches every requested course in parallel and merges in the shared
/// assignment feed.
#[derive(Clone)]
pub struct CourseAggregator {
    registry: Arc<AdapterRegistry>,
    feed_client: Arc<dyn FeedClient>,
    sanitizer: Arc<dyn Sanitize>,
}

impl CourseAggregator {
    pub fn new(
        registry: AdapterRegistry,
        feed_client: Arc<dyn FeedClient>,
        sanitizer: Arc<dyn Sanitize>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            feed_client,
            sanitizer,
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Build one record per requested key, sorted by normalized key.
    ///
    /// Duplicate keys are kept and resolved independently. Adapter and feed
    /// failures are recorded on the affected records; this never fails.
    pub async fn aggregate<I, K>(&self, requested: I) -> Vec<CourseRecord>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut keys: Vec<CourseKey> = requested.into_iter().map(CourseKey::new).collect();
        keys.sort();

        let span = info_span!("aggregate", request_id = %Uuid::new_v4(), courses = keys.len());
        self.aggregate_sorted(keys).instrument(span).await
    }

    async fn aggregate_sorted(&self, keys: Vec<CourseKey>) -> Vec<CourseRecord> {
        info!("Aggregating {} courses", keys.len());

        let feed = self.spawn_feed();

        let tasks: Vec<_> = keys
            .iter()
            .cloned()
            .map(|key| {
                let this = self.clone();
                let feed = feed.clone();
                tokio::spawn(async move { this.build_record(key, feed).await }.in_current_span())
            })
            .collect();

        // join_all keeps launch order, so output order follows the sorted keys
        // no matter which task finishes first.
        let records: Vec<CourseRecord> = join_all(tasks)
            .await
            .into_iter()
            .zip(keys)
            .map(|(joined, key)| joined.unwrap_or_else(|e| Self::failed_record(key, e)))
            .collect();

        let degraded = records.iter().filter(|record| record.has_errors()).count();
        info!("Aggregated {} courses ({} with errors)", records.len(), degraded);
        records
    }

    fn spawn_feed(&self) -> FeedBarrier {
        let feed_client = Arc::clone(&self.feed_client);
        let handle = tokio::spawn(
            async move {
                match feed_client.fetch_feed().await {
                    Ok(snapshot) => {
                        debug!("Assignment feed resolved with {} courses", snapshot.len());
                        Ok(snapshot)
                    }
                    Err(e) => {
                        warn!("Assignment feed failed: {}", e);
                        Err(e.into_feed_error())
                    }
                }
            }
            .in_current_span(),
        );

        handle
            .map(|joined| {
                Arc::new(joined.unwrap_or_else(|e| Err(CourseError::FeedFetch(e.to_string()))))
            })
            .boxed()
            .shared()
    }

    async fn build_record(&self, key: CourseKey, feed: FeedBarrier) -> CourseRecord {
        let mut record = CourseRecord::new(key.clone());

        if let Some(source) = self.fetch_source(&key, &mut record).await {
            match source.error {
                Some(error) => record.errors.push(error),
                None => record.content = self.sanitizer.sanitize(&source.content),
            }
        }

        // Barrier: nothing below runs until the feed has fully resolved.
        let outcome = feed.await;
        match &*outcome {
            Ok(snapshot) => match snapshot.get(&key) {
                Some(assignments) => record.assignments = assignments.to_vec(),
                None => record.errors.push(CourseError::MissingFeedEntry(key.clone())),
            },
            Err(error) => record.errors.push(error.clone()),
        }

        debug!(
            "Built record for {} ({} bytes, {} assignments, {} errors)",
            key,
            record.content.len(),
            record.assignments.len(),
            record.errors.len()
        );
        record
    }

    /// Run the registered adapter for `key`, if any, filling in the record's
    /// source URL. Unregistered keys are feed-only and yield `None`.
    async fn fetch_source(&self, key: &CourseKey, record: &mut CourseRecord) -> Option<SourceResult> {
        let registration = match self.registry.get(key) {
            Ok(registration) => registration,
            Err(AggregatorError::UnregisteredKey(_)) => {
                debug!("No adapter for {}, using feed only", key);
                return None;
            }
            Err(e) => {
                return Some(SourceResult::failure(key.clone(), e.into_adapter_error()));
            }
        };
        record.source_url = registration.url.clone();

        let result = match registration.adapter.fetch().await {
            Ok(content) => {
                info!("Fetched {} from {} ({} bytes)", key, registration.adapter.source_name(), content.len());
                SourceResult::success(key.clone(), content)
            }
            Err(e) => {
                warn!("Fetching {} from {} failed: {}", key, registration.adapter.source_name(), e);
                SourceResult::failure(key.clone(), e.into_adapter_error())
            }
        };
        Some(result)
    }

    fn failed_record(key: CourseKey, error: JoinError) -> CourseRecord {
        warn!("Course task for {} did not complete: {}", key, error);
        let mut record = CourseRecord::new(key);
        record.errors.push(CourseError::TaskFailed(error.to_string()));
        record
    }
}
