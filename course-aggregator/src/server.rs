// Axum surface: `/` renders every registered course, `/{keys}` renders a
// comma-separated selection such as `/cs304,CS311`.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;

use crate::aggregator::CourseAggregator;
use crate::render::render_page;
use crate::types::CourseKey;

pub struct AppState {
    pub aggregator: CourseAggregator,
    pub default_keys: Vec<CourseKey>,
}

impl AppState {
    /// Index page shows every course with a registered source.
    pub fn new(aggregator: CourseAggregator) -> Self {
        let default_keys = aggregator.registry().keys();
        Self {
            aggregator,
            default_keys,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/{keys}", get(courses_handler))
        .with_state(state)
}

/// Bind and serve until the process exits. Failing to bind is fatal.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Running on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, &state.default_keys).await
}

async fn courses_handler(State(state): State<Arc<AppState>>, Path(keys): Path<String>) -> Html<String> {
    let keys = CourseKey::parse_list(&keys);
    render(&state, &keys).await
}

async fn render(state: &AppState, keys: &[CourseKey]) -> Html<String> {
    let records = state.aggregator.aggregate(keys.iter().map(CourseKey::as_str)).await;
    Html(render_page(&records, Utc::now()))
}
