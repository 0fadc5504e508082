//! `Stats` handler for the [`HTTP tracker`](crate::servers::http).
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;

use crate::core::Tracker;
use crate::servers::http::v1::responses::stats::Stats;

/// It handles the `stats` request.
///
/// It returns the [`AggregateStats`](crate::core::statistics::AggregateStats)
/// maintained by the tracker, as JSON by default or as plaintext when the
/// request's `Accept` header prefers `text/plain`.
#[allow(clippy::unused_async)]
pub async fn handler(State(tracker): State<Arc<Tracker>>, headers: HeaderMap) -> Stats {
    let stats = tracker.get_stats().await;
    Stats::new(stats, &headers)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::header::ACCEPT;
    use axum::http::HeaderMap;

    use super::handler;
    use crate::core::services::tracker_factory;
    use crate::core::Tracker;
    use torrust_tracker_test_helpers::configuration;

    fn public_tracker() -> Tracker {
        tracker_factory(&configuration::ephemeral_public())
    }

    #[tokio::test]
    async fn it_should_return_a_json_snapshot_by_default() {
        let tracker = Arc::new(public_tracker());

        let response = handler(axum::extract::State(tracker), HeaderMap::new()).await;

        assert!(!response.plain_text);
    }

    #[tokio::test]
    async fn it_should_return_plain_text_when_requested() {
        let tracker = Arc::new(public_tracker());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "text/plain".parse().unwrap());

        let response = handler(axum::extract::State(tracker), headers).await;

        assert!(response.plain_text);
    }
}
