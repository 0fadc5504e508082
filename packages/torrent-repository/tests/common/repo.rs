use aquatic_udp_protocol::PeerId;
use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::Pagination;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, PersistentTorrents};
use torrust_tracker_torrent_repository::entry::PeerDiff;
use torrust_tracker_torrent_repository::repository::Repository as _;
use torrust_tracker_torrent_repository::{EntrySingle, Torrents};

#[derive(Debug, Default)]
pub(crate) struct Repo {
    torrents: Torrents,
}

#[allow(dead_code)]
impl Repo {
    pub(crate) async fn get(&self, key: &InfoHash) -> Option<EntrySingle> {
        Some(self.torrents.get(key)?.lock().expect("it should get a lock").clone())
    }

    pub(crate) async fn get_metrics(&self) -> TorrentsMetrics {
        self.torrents.get_metrics()
    }

    pub(crate) async fn get_paginated(&self, pagination: Option<&Pagination>) -> Vec<(InfoHash, EntrySingle)> {
        self.torrents
            .get_paginated(pagination)
            .iter()
            .map(|(i, t)| (*i, t.lock().expect("it should get a lock").clone()))
            .collect()
    }

    pub(crate) async fn import_persistent(&self, persistent_torrents: &PersistentTorrents) {
        self.torrents.import_persistent(persistent_torrents);
    }

    pub(crate) async fn remove(&self, key: &InfoHash) -> Option<EntrySingle> {
        Some(self.torrents.remove(key)?.lock().expect("it should get a lock").clone())
    }

    pub(crate) async fn remove_inactive_peers(&self, current_cutoff: DurationSinceUnixEpoch) {
        self.torrents.remove_inactive_peers(current_cutoff);
    }

    pub(crate) async fn remove_peerless_torrents(&self, policy: &TrackerPolicy) {
        self.torrents.remove_peerless_torrents(policy);
    }

    pub(crate) async fn update_torrent_with_peer_and_get_stats(
        &self,
        info_hash: &InfoHash,
        peer: &peer::Peer,
    ) -> (Option<PeerDiff>, SwarmMetadata, Option<PeerId>) {
        self.torrents.update_torrent_with_peer_and_get_stats(info_hash, peer)
    }

    pub(crate) async fn insert(&self, info_hash: &InfoHash, torrent: EntrySingle) -> Option<EntrySingle> {
        let previous = self.get(info_hash).await;
        self.torrents.insert(*info_hash, torrent.into());
        previous
    }
}
