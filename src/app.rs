//! Tracker application.
//!
//! The tracker application has a global configuration for multiple jobs.
//! It's basically a container for other services.
//! It also check constraint and dependencies between services. For example:
//! It's not safe to run a UDP tracker on top of a core public tracker, as UDP trackers
//! do not allow private access to the tracker data.
//!
//! The application is responsible for starting the jobs enabled in the
//! configuration:
//!
//! Always started:
//!
//! - Health Check API
//! - Torrent cleaner: it removes inactive peers and (optionally) peerless torrents.
//!
//! Optional jobs:
//!
//! - UDP trackers: the user can enable multiple UDP trackers on several ports.
//! - HTTP trackers: the user can enable multiple HTTP trackers on several ports.
//! - WebSocket trackers: `WebTorrent` signaling endpoints.
use std::sync::Arc;

use tokio::task::JoinHandle;
use torrust_tracker_configuration::Configuration;
use tracing::warn;

use crate::bootstrap::jobs::{health_check_api, http_tracker, torrent_cleanup, udp_tracker};
use crate::servers::registar::Registar;
use crate::{core, servers};

pub async fn start(config: &Configuration, tracker: Arc<core::Tracker>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    let registar = Registar::default();

    // Start the UDP blocks
    for udp_tracker_config in &config.udp_trackers {
        if !udp_tracker_config.enabled {
            continue;
        }

        if tracker.is_private() {
            warn!(
                "Could not start UDP tracker on: {} while in {:?}. UDP is not safe for private trackers!",
                udp_tracker_config.bind_address, config.mode
            );
        } else {
            jobs.push(udp_tracker::start_job(udp_tracker_config, tracker.clone(), registar.give_form()).await);
        }
    }

    // Start the HTTP blocks
    for http_tracker_config in &config.http_trackers {
        if !http_tracker_config.enabled {
            continue;
        }

        if let Some(job) = http_tracker::start_job(
            http_tracker_config,
            tracker.clone(),
            registar.give_form(),
            servers::http::Version::V1,
        )
        .await
        {
            jobs.push(job);
        };
    }

    // Start the WebSocket (WebTorrent signaling) blocks
    for websocket_tracker_config in &config.websocket_trackers {
        if !websocket_tracker_config.enabled {
            continue;
        }

        jobs.push(crate::bootstrap::jobs::websocket_tracker::start_job(
            websocket_tracker_config,
            tracker.clone(),
        ));
    }

    // Start runners to remove torrents without peers, every interval
    if config.inactive_peer_cleanup_interval > 0 {
        jobs.push(torrent_cleanup::start_job(config, &tracker));
    }

    // Start Health Check API
    jobs.push(health_check_api::start_job(&config.health_check_api, registar.entries()).await);

    jobs
}
