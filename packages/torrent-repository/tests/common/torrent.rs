use std::net::SocketAddr;
use std::sync::Arc;

use aquatic_udp_protocol::PeerId;
use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};
use torrust_tracker_torrent_repository::entry::{Entry as _, EntrySync as _, DEFAULT_PEER_LIMIT};
use torrust_tracker_torrent_repository::{EntryMutexStd, EntrySingle};

#[derive(Debug, Clone)]
pub(crate) enum Torrent {
    Single(EntrySingle),
    MutexStd(EntryMutexStd),
}

impl Torrent {
    pub(crate) async fn get_stats(&self) -> SwarmMetadata {
        match self {
            Torrent::Single(entry) => entry.get_swarm_metadata(),
            Torrent::MutexStd(entry) => entry.get_swarm_metadata(),
        }
    }

    pub(crate) async fn is_good(&self, policy: &TrackerPolicy) -> bool {
        match self {
            Torrent::Single(entry) => entry.is_good(policy),
            Torrent::MutexStd(entry) => entry.is_good(policy),
        }
    }

    pub(crate) async fn peers_is_empty(&self) -> bool {
        match self {
            Torrent::Single(entry) => entry.peers_is_empty(),
            Torrent::MutexStd(entry) => entry.peers_is_empty(),
        }
    }

    pub(crate) async fn get_peers_len(&self) -> usize {
        match self {
            Torrent::Single(entry) => entry.get_peers_len(),
            Torrent::MutexStd(entry) => entry.get_peers_len(),
        }
    }

    pub(crate) async fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match self {
            Torrent::Single(entry) => entry.get_peers(limit),
            Torrent::MutexStd(entry) => entry.get_peers(limit),
        }
    }

    pub(crate) async fn get_peers_for_client(
        &self,
        client: &SocketAddr,
        requester_is_seeder: bool,
        limit: Option<usize>,
    ) -> Vec<Arc<peer::Peer>> {
        match self {
            Torrent::Single(entry) => entry.get_peers_for_client(client, requester_is_seeder, limit),
            Torrent::MutexStd(entry) => entry.get_peers_for_client(client, requester_is_seeder, limit),
        }
    }

    /// Returns whether the upsert was accepted (rejected only on a spoofed `peer_id`).
    pub(crate) async fn upsert_peer(&mut self, peer: &peer::Peer) -> bool {
        match self {
            Torrent::Single(entry) => entry.upsert_peer(peer, DEFAULT_PEER_LIMIT).is_ok(),
            Torrent::MutexStd(entry) => entry.upsert_peer(peer, DEFAULT_PEER_LIMIT).is_ok(),
        }
    }

    pub(crate) async fn remove_inactive_peers(&mut self, current_cutoff: DurationSinceUnixEpoch) -> Vec<PeerId> {
        match self {
            Torrent::Single(entry) => entry.remove_inactive_peers(current_cutoff),
            Torrent::MutexStd(entry) => entry.remove_inactive_peers(current_cutoff),
        }
    }
}
