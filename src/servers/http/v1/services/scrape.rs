//! The `scrape` service.
//!
//! The service is responsible for handling the `scrape` requests.
//!
//! It delegates the `scrape` logic to the [`Tracker`](crate::core::Tracker::scrape)
//! and it returns the [`ScrapeData`] returned by the [`Tracker`].
use std::net::IpAddr;
use std::sync::Arc;

use torrust_tracker_primitives::info_hash::InfoHash;

use crate::core::{ScrapeData, Tracker};

/// The HTTP tracker `scrape` service.
pub async fn invoke(tracker: &Arc<Tracker>, info_hashes: &Vec<InfoHash>, _original_peer_ip: &IpAddr) -> ScrapeData {
    tracker.scrape(info_hashes).await
}

/// The HTTP tracker fake `scrape` service. It returns zeroed stats.
///
/// When the peer is not authenticated and the tracker is running in `private` mode,
/// the tracker returns empty stats for all the torrents.
pub async fn fake(_tracker: &Arc<Tracker>, info_hashes: &Vec<InfoHash>, _original_peer_ip: &IpAddr) -> ScrapeData {
    ScrapeData::zeroed(info_hashes)
}

#[cfg(test)]
mod tests {

    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use torrust_tracker_primitives::announce_event::AnnounceEvent;
    use torrust_tracker_primitives::info_hash::InfoHash;
    use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, NumberOfBytes};
    use torrust_tracker_test_helpers::configuration;

    use crate::core::services::tracker_factory;
    use crate::core::Tracker;

    fn public_tracker() -> Tracker {
        tracker_factory(&configuration::ephemeral_public())
    }

    fn sample_info_hash() -> InfoHash {
        "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".parse::<InfoHash>().unwrap()
    }

    fn sample_peer() -> peer::Peer {
        peer::Peer {
            peer_id: aquatic_udp_protocol::PeerId(*b"-qB00000000000000000"),
            peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080),
            updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
            uploaded: NumberOfBytes::new(0),
            downloaded: NumberOfBytes::new(0),
            left: NumberOfBytes::new(0),
            event: AnnounceEvent::Started,
            key: None,
        }
    }

    mod with_real_data {

        use std::sync::Arc;

        use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;

        use crate::core::ScrapeData;
        use crate::servers::http::v1::services::scrape::invoke;
        use crate::servers::http::v1::services::scrape::tests::{public_tracker, sample_info_hash, sample_peer};

        #[tokio::test]
        async fn it_should_return_the_scrape_data_for_a_torrent() {
            let tracker = Arc::new(public_tracker());

            let info_hash = sample_info_hash();
            let info_hashes = vec![info_hash];

            // Announce a new peer to force scrape data to contain not zeroed data
            let mut peer = sample_peer();
            let original_peer_ip = peer.ip();
            tracker.announce(&info_hash, &mut peer, &original_peer_ip, None).await;

            let scrape_data = invoke(&tracker, &info_hashes, &original_peer_ip).await;

            let mut expected_scrape_data = ScrapeData::empty();
            expected_scrape_data.add_file(
                &info_hash,
                SwarmMetadata {
                    complete: 1,
                    downloaded: 0,
                    incomplete: 0,
                },
            );

            assert_eq!(scrape_data, expected_scrape_data);
        }
    }

    mod with_zeroed_data {

        use std::sync::Arc;

        use crate::core::ScrapeData;
        use crate::servers::http::v1::services::scrape::fake;
        use crate::servers::http::v1::services::scrape::tests::{public_tracker, sample_info_hash, sample_peer};

        #[tokio::test]
        async fn it_should_always_return_the_zeroed_scrape_data_for_a_torrent() {
            let tracker = Arc::new(public_tracker());

            let info_hash = sample_info_hash();
            let info_hashes = vec![info_hash];

            // Announce a new peer to force scrape data to contain not zeroed data
            let mut peer = sample_peer();
            let original_peer_ip = peer.ip();
            tracker.announce(&info_hash, &mut peer, &original_peer_ip, None).await;

            let scrape_data = fake(&tracker, &info_hashes, &original_peer_ip).await;

            let expected_scrape_data = ScrapeData::zeroed(&info_hashes);

            assert_eq!(scrape_data, expected_scrape_data);
        }
    }
}
