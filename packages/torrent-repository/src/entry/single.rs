use std::net::SocketAddr;
use std::sync::Arc;

use aquatic_udp_protocol::PeerId;
use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::peer::{self, ReadInfo as _};
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::DurationSinceUnixEpoch;

use super::{Entry, PeerTransition, SpoofedPeer};
use crate::EntrySingle;

impl Entry for EntrySingle {
    #[allow(clippy::cast_possible_truncation)]
    fn get_swarm_metadata(&self) -> SwarmMetadata {
        let (seeders, leechers) = self.peers.seeders_and_leechers();

        SwarmMetadata {
            downloaded: self.downloaded,
            complete: seeders as u32,
            incomplete: leechers as u32,
        }
    }

    fn is_good(&self, policy: &TrackerPolicy) -> bool {
        if policy.persistent_torrent_completed_stat && self.downloaded > 0 {
            return true;
        }

        if policy.remove_peerless_torrents && self.peers.is_empty() {
            return false;
        }

        true
    }

    fn peers_is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn get_peers_len(&self) -> usize {
        self.peers.len()
    }

    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.peers.get_peers(limit)
    }

    fn get_peers_for_client(&self, client: &SocketAddr, requester_is_seeder: bool, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.peers
            .select_for_client(client, requester_is_seeder, limit.unwrap_or(usize::MAX))
    }

    fn upsert_peer(&mut self, peer: &peer::Peer, cap: usize) -> Result<(PeerTransition, Option<PeerId>), SpoofedPeer> {
        let peer_id = peer.get_id();
        let event = peer.get_event();

        if let Some(existing) = self.peers.get(&peer_id) {
            if existing.peer_addr != peer.peer_addr {
                let keys_match = matches!((existing.key, peer.key), (Some(a), Some(b)) if a == b);
                if !keys_match {
                    return Err(SpoofedPeer { peer_id });
                }
            }
        }

        if event == AnnounceEvent::Stopped {
            self.peers.remove(&peer_id);
            return Ok((PeerTransition::Stopped, None));
        }

        let is_new = self.peers.get(&peer_id).is_none();
        let evicted = if is_new && self.peers.len() >= cap {
            self.peers.evict_lru(&peer_id)
        } else {
            None
        };

        let transition = match event {
            AnnounceEvent::Started => PeerTransition::Started,
            AnnounceEvent::Completed => PeerTransition::Completed,
            AnnounceEvent::Paused => PeerTransition::Paused,
            AnnounceEvent::Update | AnnounceEvent::Stopped => PeerTransition::Updated,
        };

        if event == AnnounceEvent::Completed {
            let previous = self.peers.insert(peer_id, Arc::new(*peer));
            // Don't count if peer was not previously known and not already completed.
            if previous.is_some_and(|p| p.event != AnnounceEvent::Completed) {
                self.downloaded += 1;
            }
        } else {
            drop(self.peers.insert(peer_id, Arc::new(*peer)));
        }

        Ok((transition, evicted))
    }

    fn remove_inactive_peers(&mut self, current_cutoff: DurationSinceUnixEpoch) -> Vec<PeerId> {
        self.peers.remove_inactive(current_cutoff)
    }
}
