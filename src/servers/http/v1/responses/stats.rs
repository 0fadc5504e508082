//! `Stats` response for the [`HTTP tracker`](crate::servers::http).
//!
//! Served at `/stats`. The response body is content-negotiated: `application/json`
//! (the default) returns the [`AggregateStats`] struct as JSON; any other `Accept`
//! header, notably `text/plain`, returns a human-readable line-per-counter body.
use axum::http::header::ACCEPT;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::core::statistics::AggregateStats;

/// `Stats` response for the [`HTTP tracker`](crate::servers::http).
pub struct Stats {
    pub stats: AggregateStats,
    pub plain_text: bool,
}

impl Stats {
    /// Builds a [`Stats`] response, choosing the plaintext rendering when the
    /// request's `Accept` header prefers `text/plain` over `application/json`.
    #[must_use]
    pub fn new(stats: AggregateStats, headers: &HeaderMap) -> Self {
        Self {
            stats,
            plain_text: wants_plain_text(headers),
        }
    }

    /// Renders the stats as `key: value` lines, one counter per line.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        format!(
            "total_torrents: {}\nactive_torrents: {}\ntotal_peers: {}\ntotal_seeders: {}\ntotal_leechers: {}\n",
            self.stats.total_torrents, self.stats.active_torrents, self.stats.total_peers, self.stats.total_seeders, self.stats.total_leechers
        )
    }
}

fn wants_plain_text(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    accept
        .split(',')
        .map(|entry| entry.split(';').next().unwrap_or("").trim())
        .any(|media_type| media_type == "text/plain")
}

impl IntoResponse for Stats {
    fn into_response(self) -> Response {
        if self.plain_text {
            self.to_plain_text().into_response()
        } else {
            Json(self.stats).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::ACCEPT;
    use axum::http::HeaderMap;

    use super::{AggregateStats, Stats};

    fn sample_stats() -> AggregateStats {
        AggregateStats {
            total_torrents: 1,
            active_torrents: 1,
            total_peers: 2,
            total_seeders: 1,
            total_leechers: 1,
        }
    }

    #[test]
    fn it_should_default_to_json_when_there_is_no_accept_header() {
        let stats = Stats::new(sample_stats(), &HeaderMap::new());
        assert!(!stats.plain_text);
    }

    #[test]
    fn it_should_use_plain_text_when_the_accept_header_asks_for_it() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "text/plain".parse().unwrap());

        let stats = Stats::new(sample_stats(), &headers);
        assert!(stats.plain_text);
    }

    #[test]
    fn it_should_use_json_when_the_accept_header_asks_for_it() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "application/json".parse().unwrap());

        let stats = Stats::new(sample_stats(), &headers);
        assert!(!stats.plain_text);
    }

    #[test]
    fn plain_text_rendering_has_one_line_per_counter() {
        let stats = Stats::new(sample_stats(), &HeaderMap::new());
        let body = stats.to_plain_text();

        assert_eq!(body.lines().count(), 5);
        assert!(body.contains("total_peers: 2"));
    }
}
