#![allow(dead_code)]

// Fakes and helpers shared by the integration tests.

use async_trait::async_trait;
use axum::Router;
use course_aggregator::{AggregatorError, FeedClient, FeedSnapshot, Result, SourceAdapter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// What a [`FakeAdapter`] does when fetched.
#[derive(Clone, Debug)]
pub enum FakeOutcome {
    Content(String),
    /// Fails like a network error.
    Fail(String),
    /// Fails like a page whose structure changed.
    Protocol(String),
    Panic,
}

pub struct FakeAdapter {
    outcome: FakeOutcome,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn content(html: &str) -> Arc<Self> {
        Arc::new(Self::new(FakeOutcome::Content(html.to_string())))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::new(FakeOutcome::Fail(message.to_string())))
    }

    pub fn protocol(what: &str) -> Arc<Self> {
        Arc::new(Self::new(FakeOutcome::Protocol(what.to_string())))
    }

    pub fn delayed(outcome: FakeOutcome, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(delay_ms),
            ..Self::new(outcome)
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for FakeAdapter {
    fn source_name(&self) -> String {
        "fake".to_string()
    }

    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            FakeOutcome::Content(html) => Ok(html.clone()),
            FakeOutcome::Fail(message) => Err(AggregatorError::General(message.clone())),
            FakeOutcome::Protocol(what) => Err(AggregatorError::protocol(what.clone(), "http://fake.test/")),
            FakeOutcome::Panic => panic!("fake adapter panicked"),
        }
    }
}

pub struct FakeFeed {
    snapshot: Option<FeedSnapshot>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeFeed {
    pub fn ok(snapshot: FeedSnapshot) -> Arc<Self> {
        Self::delayed(Some(snapshot), 0)
    }

    pub fn failing() -> Arc<Self> {
        Self::delayed(None, 0)
    }

    pub fn delayed(snapshot: Option<FeedSnapshot>, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            snapshot,
            delay: Duration::from_millis(delay_ms),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for FakeFeed {
    async fn fetch_feed(&self) -> Result<FeedSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.snapshot
            .clone()
            .ok_or_else(|| AggregatorError::General("feed unreachable".to_string()))
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}
