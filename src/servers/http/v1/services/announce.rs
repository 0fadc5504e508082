//! The `announce` service.
//!
//! The service is responsible for handling the `announce` requests.
//!
//! It delegates the `announce` logic to the [`Tracker`](crate::core::Tracker::announce)
//! and it returns the [`AnnounceData`] returned by the [`Tracker`].
//!
//! The peer diff produced by the announce (and any resulting eviction) is reported to the
//! statistics aggregator by the `Tracker` itself, not by this service.
use std::sync::Arc;

use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::peer;

use crate::core::external::ResolvedUser;
use crate::core::{AnnounceData, Tracker};

/// The HTTP tracker `announce` service.
pub async fn invoke(
    tracker: Arc<Tracker>,
    info_hash: InfoHash,
    peer: &mut peer::Peer,
    credited_user: Option<ResolvedUser>,
) -> AnnounceData {
    let original_peer_ip = peer.peer_addr.ip();

    // The tracker could change the original peer ip
    tracker.announce(&info_hash, peer, &original_peer_ip, credited_user).await
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use aquatic_udp_protocol::{NumberOfBytes, PeerId};
    use torrust_tracker_primitives::announce_event::AnnounceEvent;
    use torrust_tracker_primitives::info_hash::InfoHash;
    use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};
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
            peer_id: PeerId(*b"-qB00000000000000000"),
            peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080),
            updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
            uploaded: NumberOfBytes::new(0),
            downloaded: NumberOfBytes::new(0),
            left: NumberOfBytes::new(0),
            event: AnnounceEvent::Started,
            key: None,
        }
    }

    mod with_tracker_in_any_mode {
        use std::sync::Arc;

        use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;

        use super::{public_tracker, sample_info_hash, sample_peer};
        use crate::core::AnnounceData;
        use crate::servers::http::v1::services::announce::invoke;

        #[tokio::test]
        async fn it_should_return_the_announce_data() {
            let tracker = Arc::new(public_tracker());

            let mut peer = sample_peer();

            let announce_data = invoke(tracker.clone(), sample_info_hash(), &mut peer, None).await;

            let expected_announce_data = AnnounceData {
                peers: vec![],
                stats: SwarmMetadata {
                    downloaded: 0,
                    complete: 1,
                    incomplete: 0,
                },
                policy: tracker.get_announce_policy(),
            };

            assert_eq!(announce_data, expected_announce_data);
        }
    }
}
