// Use the interfaces crate for the request-scoped data model
pub use interfaces::defs::{Assignment, CourseError, CourseKey, CourseRecord, FeedSnapshot, SourceResult};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_page_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Course-Aggregator/1.0".to_string(),
            timeout_seconds: 30,
            max_page_size_mb: 10,
            max_redirects: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page size exceeds limit: {size_mb}MB")]
    PageTooLarge { size_mb: usize },

    #[error("Missing {what} on {url}")]
    Protocol { what: String, url: String },

    #[error("No adapter registered for {0}")]
    UnregisteredKey(CourseKey),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    pub fn protocol(what: impl Into<String>, url: impl Into<String>) -> Self {
        AggregatorError::Protocol {
            what: what.into(),
            url: url.into(),
        }
    }

    /// Classify an adapter failure for the course record. Missing page
    /// structure is a protocol error; everything else is a fetch error.
    pub fn into_adapter_error(self) -> CourseError {
        match self {
            AggregatorError::Protocol { .. } => CourseError::AdapterProtocol(self.to_string()),
            other => CourseError::AdapterFetch(other.to_string()),
        }
    }

    pub fn into_feed_error(self) -> CourseError {
        CourseError::FeedFetch(self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
