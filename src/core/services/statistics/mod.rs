//! Statistics services.
//!
//! It includes:
//!
//! - A [`factory`](crate::core::services::statistics::setup::factory) function to build the structs needed to collect the tracker metrics.
//! - A [`get_metrics`] service to get the [`tracker metrics`](crate::core::statistics::AggregateStats).
//!
//! Tracker metrics are collected using a Publisher-Subscribe pattern.
//!
//! The factory function builds two structs:
//!
//! - An statistics [`EventSender`](crate::core::statistics::EventSender)
//! - An statistics [`Repo`](crate::core::statistics::Repo)
//!
//! ```text
//! let (stats_event_sender, stats_repository) = factory(tracker_usage_statistics);
//! ```
//!
//! The statistics repository is responsible for storing the metrics in memory. The statistics
//! event sender allows `Tracker::announce` to report a peer diff after every swarm mutation.
//! There is an event listener receiving every diff and folding it into the running counters.
pub mod setup;

use std::sync::Arc;

use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;

use crate::core::statistics::AggregateStats;
use crate::core::Tracker;

/// All the metrics collected by the tracker.
#[derive(Debug, PartialEq)]
pub struct TrackerMetrics {
    /// Domain level metrics.
    ///
    /// General metrics for all torrents (number of seeders, leechers, etcetera)
    pub torrents_metrics: TorrentsMetrics,

    /// Application level metrics: the aggregate counters served at `/stats`.
    pub protocol_metrics: AggregateStats,
}

/// It returns all the [`TrackerMetrics`]
pub async fn get_metrics(tracker: Arc<Tracker>) -> TrackerMetrics {
    let torrents_metrics = tracker.get_torrents_metrics();
    let protocol_metrics = tracker.get_stats().await;

    TrackerMetrics {
        torrents_metrics,
        protocol_metrics,
    }
}
