pub mod types;
pub mod traits;
pub mod config;
pub mod utils;
pub mod fetcher;
pub mod browser;
pub mod parser;
pub mod sanitizer;
pub mod feed;
pub mod registry;
pub mod aggregator;
pub mod sources;
pub mod render;
pub mod server;

pub use types::*;
pub use traits::{FeedClient, Sanitize, SourceAdapter};
pub use config::{AppConfig, Args, Credentials, FeedSource};
pub use fetcher::{Fetcher, Page};
pub use browser::{Browser, Form, FormMethod};
pub use parser::{FragmentOptions, PageParser};
pub use sanitizer::HtmlSanitizer;
pub use feed::{FileFeedClient, HttpFeedClient, StaticFeed};
pub use registry::{AdapterRegistry, Registration};
pub use aggregator::{CourseAggregator, FeedOutcome};
pub use sources::{default_registry, BlackboardSource, PiazzaResourceSource, StaticTableSource};
pub use server::AppState;
