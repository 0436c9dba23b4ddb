use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{main_lib::AppState, models::WatcherStatus};

async fn get_watcher_status(State(state): State<Arc<AppState>>) -> Json<WatcherStatus> {
    let watcher = &state.watcher;
    Json(WatcherStatus {
        state: watcher.state().to_string(),
        poll_interval_secs: watcher.config().poll_interval.as_secs(),
        completed_ticks: watcher.completed_ticks(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/watcher", get(get_watcher_status))
}
