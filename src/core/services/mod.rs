//! Tracker domain services.
//!
//! - [Services for statistics](crate::core::services::statistics): related to tracker metrics. Aggregate data about the tracker server.
pub mod statistics;

use torrust_tracker_configuration::Configuration;

use crate::core::Tracker;

/// It returns a new tracker wired against the permissive default repositories, building its
/// statistics dependencies along the way.
#[must_use]
pub fn tracker_factory(config: &Configuration) -> Tracker {
    let (stats_event_sender, stats_repository) = statistics::setup::factory(config.tracker_usage_statistics);

    Tracker::new_with_defaults(config, stats_event_sender, stats_repository)
}
