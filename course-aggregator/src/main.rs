use clap::Parser;
use course_aggregator::{
    default_registry, server, AppConfig, AppState, Args, CourseAggregator, FeedClient, FeedSource,
    FileFeedClient, HtmlSanitizer, HttpFeedClient, StaticFeed,
};
use std::sync::Arc;
use tracing::{error, info, warn};

fn feed_client(config: &AppConfig) -> anyhow::Result<Arc<dyn FeedClient>> {
    let client: Arc<dyn FeedClient> = match &config.feed {
        FeedSource::Url(url) => {
            info!("Assignment feed: {}", url);
            Arc::new(HttpFeedClient::new(url.clone(), config.fetch.clone())?)
        }
        FeedSource::File(path) => {
            info!("Assignment feed file: {}", path.display());
            Arc::new(FileFeedClient::new(path.clone()))
        }
        FeedSource::None => {
            warn!("No assignment feed configured; every course will report a missing feed entry");
            Arc::new(StaticFeed::empty())
        }
    };
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from(Args::parse());
    info!("Starting course aggregator on port {}", config.port);

    let registry = default_registry(&config)?;
    info!("Registered {} course sources", registry.len());

    let aggregator = CourseAggregator::new(registry, feed_client(&config)?, Arc::new(HtmlSanitizer::new()));
    let state = Arc::new(AppState::new(aggregator));

    server::serve(state, config.port).await.map_err(|e| {
        error!("Failed to serve on port {}: {}", config.port, e);
        e
    })
}
