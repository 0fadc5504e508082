use aquatic_udp_protocol::PeerId;
use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::Pagination;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, PersistentTorrents};

use crate::entry::PeerDiff;

pub mod skip_map_mutex_std;

/// The top-level swarm registry: a concurrent map from `info_hash` to a torrent entry.
///
/// Reads of the map itself never block a writer and vice versa; mutation of a single
/// torrent's peer list is serialized by the per-entry lock held inside `T`, not by this trait.
pub trait Repository<T>: Default + 'static {
    fn get(&self, key: &InfoHash) -> Option<T>;
    fn get_metrics(&self) -> TorrentsMetrics;
    fn get_paginated(&self, pagination: Option<&Pagination>) -> Vec<(InfoHash, T)>;
    fn import_persistent(&self, persistent_torrents: &PersistentTorrents);
    fn remove(&self, key: &InfoHash) -> Option<T>;
    fn remove_inactive_peers(&self, current_cutoff: DurationSinceUnixEpoch);
    fn remove_peerless_torrents(&self, policy: &TrackerPolicy);

    /// Applies the peer's announce to the torrent's swarm.
    ///
    /// Returns the diff for the announcing peer (`None` if it was rejected as spoofed), the
    /// swarm's resulting metadata, and the id of a peer evicted to make room under the per-swarm
    /// cap, if any.
    fn update_torrent_with_peer_and_get_stats(
        &self,
        info_hash: &InfoHash,
        peer: &peer::Peer,
    ) -> (Option<PeerDiff>, SwarmMetadata, Option<PeerId>);
}
