use std::collections::BTreeMap;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;

use aquatic_udp_protocol::PeerId;
use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::peer::ReadInfo;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};

pub mod mutex_std;
pub mod single;

/// Default per-swarm peer cap. Reaching it triggers LRU eviction on the next insert
/// rather than growing the table further.
pub const DEFAULT_PEER_LIMIT: usize = 1000;

/// What happened to a peer as a side effect of an `upsert_peer` call or of the time
/// wheel's sweep. Downstream consumers (credit engine, stats aggregator, observability)
/// react to this instead of re-deriving it from the raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerTransition {
    Started,
    Updated,
    Completed,
    Stopped,
    Paused,
    /// Evicted to make room under the per-swarm peer cap.
    Evicted,
}

/// Describes a single peer's state change resulting from one registry mutation.
#[derive(Debug, Clone, Copy)]
pub struct PeerDiff {
    pub peer_id: PeerId,
    pub transition: PeerTransition,
}

/// Returned when a `started`/`update` announce reuses a `peer_id` already bound to a
/// different endpoint under an incompatible (or missing) `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("peer_id already bound to a different endpoint under a different key")]
pub struct SpoofedPeer {
    pub peer_id: PeerId,
}

pub trait Entry {
    /// It returns the swarm metadata (statistics) as a struct:
    ///
    /// `(seeders, completed, leechers)`
    fn get_swarm_metadata(&self) -> SwarmMetadata;

    /// Returns True if Still a Valid Entry according to the Tracker Policy
    fn is_good(&self, policy: &TrackerPolicy) -> bool;

    /// Returns True if the Peers is Empty
    fn peers_is_empty(&self) -> bool;

    /// Returns the number of Peers
    fn get_peers_len(&self) -> usize;

    /// Get all swarm peers, optionally limiting the result.
    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    /// Selects peers to advertise back to `client`, applying the seeder/leecher mixing
    /// policy: a seeding requester is offered leechers first (seeders gain nothing from
    /// each other); a leeching requester is offered a mix weighted toward seeders.
    /// Paused peers and the requester itself are never returned.
    fn get_peers_for_client(&self, client: &SocketAddr, requester_is_seeder: bool, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    /// Inserts or updates a peer, applying the state machine in §4.2/§4.8: `started`/`update`
    /// upsert, `completed` flips the seeder flag and increments the lifetime download counter
    /// at most once per peer, `paused` retains but hides the peer, `stopped` removes it.
    ///
    /// If inserting would exceed `cap`, the least-recently-seen peer other than the one being
    /// inserted is evicted first; its id is returned alongside the resulting transition.
    ///
    /// # Errors
    ///
    /// Returns [`SpoofedPeer`] if `peer`'s id is already bound to a different endpoint under
    /// an incompatible key.
    fn upsert_peer(&mut self, peer: &peer::Peer, cap: usize) -> Result<(PeerTransition, Option<PeerId>), SpoofedPeer>;

    /// Removes peers that have not announced since before `current_cutoff`, returning the
    /// ids of everything evicted so the caller can emit the equivalent of a `stopped` event.
    fn remove_inactive_peers(&mut self, current_cutoff: DurationSinceUnixEpoch) -> Vec<PeerId>;
}

#[allow(clippy::module_name_repetitions)]
pub trait EntrySync {
    fn get_swarm_metadata(&self) -> SwarmMetadata;
    fn is_good(&self, policy: &TrackerPolicy) -> bool;
    fn peers_is_empty(&self) -> bool;
    fn get_peers_len(&self) -> usize;
    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;
    fn get_peers_for_client(&self, client: &SocketAddr, requester_is_seeder: bool, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;
    fn upsert_peer(&self, peer: &peer::Peer, cap: usize) -> Result<(PeerTransition, Option<PeerId>), SpoofedPeer>;
    fn remove_inactive_peers(&self, current_cutoff: DurationSinceUnixEpoch) -> Vec<PeerId>;
}

/// A data structure containing all the information about a torrent in the tracker.
///
/// This is the tracker entry for a given torrent and contains the swarm data,
/// that's the list of all the peers trying to download the same torrent.
/// The tracker keeps one entry like this for every torrent.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Torrent {
    /// The swarm: a network of peers that are all trying to download the torrent associated to this entry
    pub(crate) peers: PeerList,
    /// The number of peers that have ever completed downloading the torrent associated to this entry
    pub(crate) downloaded: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerList {
    peers: BTreeMap<PeerId, Arc<peer::Peer>>,
}

impl PeerList {
    pub(crate) fn len(&self) -> usize {
        self.peers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub(crate) fn get(&self, key: &PeerId) -> Option<&Arc<peer::Peer>> {
        self.peers.get(key)
    }

    pub(crate) fn insert(&mut self, key: PeerId, value: Arc<peer::Peer>) -> Option<Arc<peer::Peer>> {
        self.peers.insert(key, value)
    }

    pub(crate) fn remove(&mut self, key: &PeerId) -> Option<Arc<peer::Peer>> {
        self.peers.remove(key)
    }

    fn retain_keep<F>(&mut self, mut f: F) -> Vec<PeerId>
    where
        F: FnMut(&Arc<peer::Peer>) -> bool,
    {
        let mut evicted = Vec::new();
        self.peers.retain(|id, peer| {
            let keep = f(peer);
            if !keep {
                evicted.push(*id);
            }
            keep
        });
        evicted
    }

    pub(crate) fn remove_inactive(&mut self, current_cutoff: DurationSinceUnixEpoch) -> Vec<PeerId> {
        self.retain_keep(|peer| peer.get_updated() > current_cutoff)
    }

    pub(crate) fn seeders_and_leechers(&self) -> (usize, usize) {
        let seeders = self.peers.values().filter(|peer| peer.is_seeder()).count();
        let leechers = self.len() - seeders;

        (seeders, leechers)
    }

    pub(crate) fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match limit {
            Some(limit) => self.peers.values().take(limit).cloned().collect(),
            None => self.peers.values().cloned().collect(),
        }
    }

    /// Evicts the least-recently-seen peer other than `excluding`, returning its id.
    pub(crate) fn evict_lru(&mut self, excluding: &PeerId) -> Option<PeerId> {
        let oldest = self
            .peers
            .iter()
            .filter(|(id, _)| *id != excluding)
            .min_by_key(|(_, peer)| peer.get_updated())
            .map(|(id, _)| *id)?;

        self.peers.remove(&oldest);
        Some(oldest)
    }

    /// Selects up to `limit` peers to hand back to `client`: paused peers and the
    /// requester are always excluded. A seeding requester is offered leechers first; a
    /// leeching requester is offered a mix weighted toward seeders (2 seeders per
    /// leecher). Remaining slots within each pool are filled by most-recently-seen.
    pub(crate) fn select_for_client(&self, client: &SocketAddr, requester_is_seeder: bool, limit: usize) -> Vec<Arc<peer::Peer>> {
        if limit == 0 {
            return Vec::new();
        }

        let mut seeders: Vec<Arc<peer::Peer>> = Vec::new();
        let mut leechers: Vec<Arc<peer::Peer>> = Vec::new();

        for peer in self.peers.values() {
            if peer.get_address() == *client {
                continue;
            }
            if peer.get_event() == AnnounceEvent::Paused {
                continue;
            }
            if peer.is_seeder() {
                seeders.push(peer.clone());
            } else {
                leechers.push(peer.clone());
            }
        }

        let by_recency = |peers: &mut Vec<Arc<peer::Peer>>| {
            peers.sort_by_key(|peer| std::cmp::Reverse(peer.get_updated()));
        };
        by_recency(&mut seeders);
        by_recency(&mut leechers);

        let mut selected = Vec::with_capacity(limit.min(seeders.len() + leechers.len()));

        if requester_is_seeder {
            selected.extend(leechers.iter().take(limit).cloned());
            if selected.len() < limit {
                selected.extend(seeders.iter().take(limit - selected.len()).cloned());
            }
        } else {
            // Weighted 2:1 toward seeders, then top up from whichever pool still has peers.
            let mut seeder_iter = seeders.iter();
            let mut leecher_iter = leechers.iter();
            while selected.len() < limit {
                let mut progressed = false;
                for _ in 0..2 {
                    if selected.len() >= limit {
                        break;
                    }
                    if let Some(peer) = seeder_iter.next() {
                        selected.push(peer.clone());
                        progressed = true;
                    }
                }
                if selected.len() >= limit {
                    break;
                }
                if let Some(peer) = leecher_iter.next() {
                    selected.push(peer.clone());
                    progressed = true;
                }
                if !progressed {
                    break;
                }
            }
        }

        selected
    }
}
