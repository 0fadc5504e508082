//! The core `tracker` module contains the generic `BitTorrent` tracker logic which is independent of the delivery layer.
//!
//! It contains the tracker services and their dependencies. It's a domain layer which does not
//! specify how the end user should connect to the `Tracker`.
//!
//! Typically this module is intended to be used by higher modules like:
//!
//! - A UDP tracker
//! - A HTTP tracker
//! - A `WebTorrent` signaling server
//!
//! ```text
//! Delivery layer       Domain layer
//!
//!       HTTP tracker |
//!        UDP tracker |> Core tracker
//! WebSocket signaling |
//! ```
//!
//! # Table of contents
//!
//! - [Tracker](#tracker)
//!   - [Announce request](#announce-request)
//!   - [Scrape request](#scrape-request)
//! - [Authentication](#authentication)
//! - [Credit engine](#credit-engine)
//! - [Statistics](#statistics)
//!
//! # Tracker
//!
//! The `Tracker` is the main struct in this module. It groups:
//!
//! - **Swarm registry**: the in-memory `info_hash -> Swarm` map and its peer lists.
//! - **Authentication**: resolving `auth_token`s into user identities via [`external::UserRepo`].
//! - **Authorization**: checking torrent whitelisting/existence via [`external::TorrentRepo`].
//! - **Credit accounting**: per-(user, torrent) upload/download diffing, see [`credit`].
//! - **Statistics**: the running counters served at `/stats`.
//!
//! The `Tracker` itself persists nothing: the swarm registry is rebuilt from client announces,
//! and every durable concern (users, torrent catalog, credit ledger) is delegated to the
//! repository traits in [`external`].
//!
//! ## Announce request
//!
//! Handling `announce` requests is the most important task for a `BitTorrent` tracker.
//!
//! A `BitTorrent` swarm is a network of peers that are all trying to download the same torrent.
//! When a peer wants to find other peers it announces itself to the swarm via the tracker.
//! The peer sends its data to the tracker so that the tracker can add it to the swarm.
//! The tracker responds to the peer with the list of other peers in the swarm so that
//! the peer can contact them to start downloading pieces of the file from them.
//!
//! ```rust,no_run
//! use torrust_tracker_primitives::peer;
//! use torrust_tracker_primitives::info_hash::InfoHash;
//! use torrust_tracker_primitives::{DurationSinceUnixEpoch, NumberOfBytes};
//! use torrust_tracker_primitives::announce_event::AnnounceEvent;
//! use aquatic_udp_protocol::PeerId;
//! use std::net::SocketAddr;
//! use std::net::IpAddr;
//! use std::net::Ipv4Addr;
//! use std::str::FromStr;
//!
//! let info_hash = InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap();
//!
//! let peer = peer::Peer {
//!     peer_id: PeerId(*b"-qB00000000000000001"),
//!     peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8081),
//!     updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
//!     uploaded: NumberOfBytes::new(0),
//!     downloaded: NumberOfBytes::new(0),
//!     left: NumberOfBytes::new(0),
//!     event: AnnounceEvent::Completed,
//!     key: None,
//! };
//!
//! let peer_ip = IpAddr::V4(Ipv4Addr::from_str("126.0.0.1").unwrap());
//! ```
//!
//! ```text
//! let announce_data = tracker.announce(&info_hash, &mut peer, &peer_ip, None).await;
//! ```
//!
//! > **NOTICE**: the peer argument is mutable because the `Tracker` can change the peer IP if the peer is using a loopback IP.
//!
//! The last argument is the caller's resolved identity (see [`auth::Authenticator`]), used by
//! the [`credit`] engine to book upload/download deltas; pass `None` for unauthenticated peers.
//!
//! # Authentication
//!
//! Refer to [`auth`] for how `auth_token`s are resolved against [`external::UserRepo`].
//!
//! # Credit engine
//!
//! Refer to [`credit`] for how upload/download deltas are diffed and booked through
//! [`external::Ledger`].
//!
//! # Statistics
//!
//! Refer to [`statistics`] for the `Tracker`'s event sender API and running counters.
pub mod auth;
pub mod credit;
pub mod error;
pub mod external;
pub mod services;
pub mod statistics;
pub mod torrent;

use std::collections::HashMap;
use std::net::IpAddr;
use std::panic::Location;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aquatic_udp_protocol::PeerId;
use derive_more::Constructor;
use tokio::sync::mpsc::error::SendError;
use torrust_tracker_clock::clock::Time;
use torrust_tracker_configuration::{AnnouncePolicy, Configuration, TrackerPolicy, TORRENT_PEERS_LIMIT};
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{peer, TrackerMode};
use torrust_tracker_torrent_repository::entry::{EntrySync, PeerTransition};
use torrust_tracker_torrent_repository::repository::Repository;
use tracing::debug;

use self::auth::{Authenticator, Key};
use self::credit::{CreditEngine, CreditPolicy};
use self::error::Error;
use self::external::{Ledger, Observability, ObservabilityEvent, ResolvedUser, TorrentRepo, UserId, UserRepo};
use self::torrent::Torrents;
use crate::CurrentClock;

/// The domain layer tracker service.
///
/// Its main responsibility is to handle the `announce` and `scrape` requests. It also owns the
/// authenticator, the credit engine, and the statistics counters, wired against the external
/// repository traits rather than any durable storage of its own.
///
/// > **NOTICE**: the `Tracker` is not responsible for handling the network layer.
/// Typically, the `Tracker` is used by a higher application service that handles
/// the network layer.
pub struct Tracker {
    announce_policy: AnnouncePolicy,
    mode: TrackerMode,
    policy: TrackerPolicy,
    pub torrents: Arc<Torrents>,
    authenticator: Authenticator,
    torrent_repo: Arc<dyn TorrentRepo>,
    credit_engine: CreditEngine,
    observability: Arc<dyn Observability>,
    /// The owner of each peer currently counted in a credit session, so that an eviction (which
    /// only surfaces a `PeerId`, not a `UserId`) can still close the right session.
    peer_owners: Mutex<HashMap<(InfoHash, PeerId), UserId>>,
    stats_event_sender: Option<Box<dyn statistics::EventSender>>,
    stats_repository: statistics::Repo,
    external_ip: Option<IpAddr>,
    on_reverse_proxy: bool,
}

/// Structure that holds the data returned by the `announce` request.
#[derive(Clone, Debug, PartialEq, Constructor, Default)]
pub struct AnnounceData {
    /// The list of peers that are downloading the same torrent.
    /// It excludes the peer that made the request.
    pub peers: Vec<Arc<peer::Peer>>,
    /// Swarm statistics
    pub stats: SwarmMetadata,
    pub policy: AnnouncePolicy,
}

/// Structure that holds the data returned by the `scrape` request.
#[derive(Debug, PartialEq, Default)]
pub struct ScrapeData {
    /// A map of infohashes and swarm metadata for each torrent.
    pub files: HashMap<InfoHash, SwarmMetadata>,
}

impl ScrapeData {
    /// Creates a new empty `ScrapeData` with no files (torrents).
    #[must_use]
    pub fn empty() -> Self {
        let files: HashMap<InfoHash, SwarmMetadata> = HashMap::new();
        Self { files }
    }

    /// Creates a new `ScrapeData` with zeroed metadata for each torrent.
    #[must_use]
    pub fn zeroed(info_hashes: &Vec<InfoHash>) -> Self {
        let mut scrape_data = Self::empty();

        for info_hash in info_hashes {
            scrape_data.add_file(info_hash, SwarmMetadata::zeroed());
        }

        scrape_data
    }

    /// Adds a torrent to the `ScrapeData`.
    pub fn add_file(&mut self, info_hash: &InfoHash, swarm_metadata: SwarmMetadata) {
        self.files.insert(*info_hash, swarm_metadata);
    }

    /// Adds a torrent to the `ScrapeData` with zeroed metadata.
    pub fn add_file_with_zeroed_metadata(&mut self, info_hash: &InfoHash) {
        self.files.insert(*info_hash, SwarmMetadata::zeroed());
    }
}

impl Tracker {
    /// `Tracker` constructor, wired against explicit repository implementations.
    ///
    /// Use this for production wiring once real `UserRepo`/`TorrentRepo`/`Ledger`/`Observability`
    /// backends exist. For public-mode operation or tests, [`Tracker::new_with_defaults`] wires
    /// in permissive stand-ins instead.
    #[must_use]
    pub fn new(
        config: &Configuration,
        user_repo: Arc<dyn UserRepo>,
        torrent_repo: Arc<dyn TorrentRepo>,
        ledger: Arc<dyn Ledger>,
        observability: Arc<dyn Observability>,
        stats_event_sender: Option<Box<dyn statistics::EventSender>>,
        stats_repository: statistics::Repo,
    ) -> Tracker {
        let mode = config.mode;

        Tracker {
            announce_policy: AnnouncePolicy::new(config.announce_interval, config.min_announce_interval),
            mode,
            torrents: Arc::default(),
            authenticator: Authenticator::new(user_repo),
            torrent_repo,
            credit_engine: CreditEngine::new(CreditPolicy::default(), ledger, observability.clone()),
            observability,
            peer_owners: Mutex::new(HashMap::new()),
            stats_event_sender,
            stats_repository,
            external_ip: config.get_ext_ip(),
            policy: config.tracker_policy(),
            on_reverse_proxy: config.on_reverse_proxy,
        }
    }

    /// `Tracker` constructor wired against the permissive default repositories: every token
    /// resolves to a regular user, every torrent is public, ledger writes and observability
    /// events are discarded (beyond a debug log line). Suitable for a tracker running in
    /// `public` mode, or for tests.
    #[must_use]
    pub fn new_with_defaults(
        config: &Configuration,
        stats_event_sender: Option<Box<dyn statistics::EventSender>>,
        stats_repository: statistics::Repo,
    ) -> Tracker {
        Self::new(
            config,
            external::default_user_repo(),
            external::default_torrent_repo(),
            external::default_ledger(),
            external::default_observability(),
            stats_event_sender,
            stats_repository,
        )
    }

    /// Returns `true` is the tracker is in public mode.
    pub fn is_public(&self) -> bool {
        self.mode == TrackerMode::Public
    }

    /// Returns `true` is the tracker is in private mode.
    pub fn is_private(&self) -> bool {
        self.mode == TrackerMode::Private || self.mode == TrackerMode::PrivateListed
    }

    /// Returns `true` is the tracker is in whitelisted mode.
    pub fn is_whitelisted(&self) -> bool {
        self.mode == TrackerMode::Listed || self.mode == TrackerMode::PrivateListed
    }

    /// Returns `true` if the tracker requires authentication.
    pub fn requires_authentication(&self) -> bool {
        self.is_private()
    }

    /// Returns `true` is the tracker is in whitelisted mode.
    pub fn is_behind_reverse_proxy(&self) -> bool {
        self.on_reverse_proxy
    }

    pub fn get_announce_policy(&self) -> AnnouncePolicy {
        self.announce_policy
    }

    pub fn get_maybe_external_ip(&self) -> Option<IpAddr> {
        self.external_ip
    }

    /// It resolves an `auth_token` (the HTTP `key` path parameter) against the user repository.
    ///
    /// # Errors
    ///
    /// Will return an error if the key is unknown to the user repository, or if it resolves to a
    /// banned user.
    pub async fn authenticate(&self, key: &Key) -> Result<ResolvedUser, Error> {
        self.authenticator.authenticate(key).await.map_err(Error::from)
    }

    /// It handles an announce request.
    ///
    /// # Context: Tracker
    ///
    /// BEP 03: [The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html).
    ///
    /// `credited_user` is the identity resolved by [`Tracker::authenticate`], if any; when
    /// present, the upload/download deltas for this announce are booked by the credit engine.
    pub async fn announce(
        &self,
        info_hash: &InfoHash,
        peer: &mut peer::Peer,
        remote_client_ip: &IpAddr,
        credited_user: Option<ResolvedUser>,
    ) -> AnnounceData {
        debug!("Before: {peer:?}");
        peer.change_ip(&assign_ip_address_to_peer(remote_client_ip, self.external_ip));
        debug!("After: {peer:?}");

        let stats = self.apply_peer_update(info_hash, peer).await;

        let peers = self.get_torrent_peers_for_peer(info_hash, peer);

        if let Some(resolved) = credited_user {
            let swarm_peer_count = usize::try_from(stats.complete + stats.incomplete).unwrap_or(usize::MAX);
            self.credit_engine
                .record_announce(
                    resolved.user_id,
                    resolved.user_class,
                    info_hash,
                    u64::try_from(peer.uploaded.0.get()).unwrap_or(0),
                    u64::try_from(peer.downloaded.0.get()).unwrap_or(0),
                    swarm_peer_count,
                )
                .await;

            if peer.event == torrust_tracker_primitives::announce_event::AnnounceEvent::Stopped {
                self.credit_engine.close_session(resolved.user_id, info_hash);
                self.peer_owners.lock().unwrap().remove(&(*info_hash, peer.peer_id));
            } else {
                self.peer_owners
                    .lock()
                    .unwrap()
                    .insert((*info_hash, peer.peer_id), resolved.user_id);
            }
        }

        AnnounceData {
            peers,
            stats,
            policy: self.get_announce_policy(),
        }
    }

    /// Applies the peer's announce to the swarm registry, reports the resulting peer diff (and
    /// any eviction) to the statistics aggregator, and closes the credit session of an evicted
    /// peer so it doesn't linger once its owner can no longer be resolved.
    async fn apply_peer_update(&self, info_hash: &InfoHash, peer: &peer::Peer) -> SwarmMetadata {
        let (diff, stats, evicted_peer_id) = self.torrents.update_torrent_with_peer_and_get_stats(info_hash, peer);

        if let Some(diff) = diff {
            self.send_stats_event(statistics::Event {
                info_hash: *info_hash,
                peer_id: diff.peer_id,
                transition: diff.transition,
                is_seeder: peer.is_seeder(),
            })
            .await;
        }

        if let Some(evicted_peer_id) = evicted_peer_id {
            self.send_stats_event(statistics::Event {
                info_hash: *info_hash,
                peer_id: evicted_peer_id,
                transition: PeerTransition::Evicted,
                is_seeder: false,
            })
            .await;

            let evicted_owner = self.peer_owners.lock().unwrap().remove(&(*info_hash, evicted_peer_id));
            if let Some(user_id) = evicted_owner {
                self.credit_engine.close_session(user_id, info_hash);
            }
            self.observability.emit(ObservabilityEvent::PeerEvicted { info_hash: *info_hash });
        }

        stats
    }

    /// It handles a scrape request.
    ///
    /// # Context: Tracker
    ///
    /// BEP 48: [Tracker Protocol Extension: Scrape](https://www.bittorrent.org/beps/bep_0048.html).
    pub async fn scrape(&self, info_hashes: &Vec<InfoHash>) -> ScrapeData {
        let mut scrape_data = ScrapeData::empty();

        for info_hash in info_hashes {
            let swarm_metadata = match self.authorize(info_hash).await {
                Ok(()) => self.get_swarm_metadata(info_hash),
                Err(_) => SwarmMetadata::zeroed(),
            };
            scrape_data.add_file(info_hash, swarm_metadata);
        }

        scrape_data
    }

    /// It returns the data for a `scrape` response.
    fn get_swarm_metadata(&self, info_hash: &InfoHash) -> SwarmMetadata {
        match self.torrents.get(info_hash) {
            Some(torrent_entry) => torrent_entry.get_swarm_metadata(),
            None => SwarmMetadata::default(),
        }
    }

    fn get_torrent_peers_for_peer(&self, info_hash: &InfoHash, peer: &peer::Peer) -> Vec<Arc<peer::Peer>> {
        match self.torrents.get(info_hash) {
            None => vec![],
            Some(entry) => entry.get_peers_for_client(&peer.peer_addr, peer.is_seeder(), Some(TORRENT_PEERS_LIMIT)),
        }
    }

    /// # Context: Tracker
    ///
    /// Get all torrent peers for a given torrent
    pub fn get_torrent_peers(&self, info_hash: &InfoHash) -> Vec<Arc<peer::Peer>> {
        match self.torrents.get(info_hash) {
            None => vec![],
            Some(entry) => entry.get_peers(Some(TORRENT_PEERS_LIMIT)),
        }
    }

    /// It updates the torrent entry in memory and returns the data needed for an `announce`
    /// request response.
    ///
    /// # Context: Tracker
    pub async fn update_torrent_with_peer_and_get_stats(&self, info_hash: &InfoHash, peer: &peer::Peer) -> SwarmMetadata {
        self.apply_peer_update(info_hash, peer).await
    }

    /// It calculates and returns the general `Tracker`
    /// [`TorrentsMetrics`]
    ///
    /// # Context: Tracker
    ///
    /// # Panics
    /// Panics if unable to get the torrent metrics.
    pub fn get_torrents_metrics(&self) -> TorrentsMetrics {
        self.torrents.get_metrics()
    }

    /// Remove inactive peers and (optionally) peerless torrents.
    ///
    /// This is the in-memory side of the time wheel's sweep: the scheduler in
    /// [`crate::bootstrap::jobs::torrent_cleanup`] calls this at a fixed interval using bucketed
    /// timestamps to avoid re-scanning the whole registry every tick.
    ///
    /// # Context: Tracker
    pub fn cleanup_torrents(&self) {
        // If we don't need to remove torrents we will use the faster iter
        if self.policy.remove_peerless_torrents {
            self.torrents.remove_peerless_torrents(&self.policy);
        } else {
            let current_cutoff =
                CurrentClock::now_sub(&Duration::from_secs(u64::from(self.policy.max_peer_timeout))).unwrap_or_default();
            self.torrents.remove_inactive_peers(current_cutoff);
        }
    }

    /// Right now, there is only authorization when the `Tracker` runs in
    /// `listed` or `private_listed` modes.
    ///
    /// # Context: Authorization
    ///
    /// # Errors
    ///
    /// Will return an error if the tracker is running in `listed` mode and the torrent
    /// repository does not report the infohash as active, or reports it as private with no
    /// resolvable owner.
    pub async fn authorize(&self, info_hash: &InfoHash) -> Result<(), Error> {
        if !self.is_whitelisted() {
            return Ok(());
        }

        match self.torrent_repo.lookup(info_hash).await {
            Some(lookup) if lookup.is_active => Ok(()),
            _ => Err(Error::TorrentNotWhitelisted {
                info_hash: *info_hash,
                location: Location::caller(),
            }),
        }
    }

    /// It returns the aggregate swarm counters served at `/stats`.
    ///
    /// # Context: Statistics
    pub async fn get_stats(&self) -> statistics::AggregateStats {
        let mut stats = self.stats_repository.get_stats().await;
        stats.total_torrents = self.get_torrents_metrics().torrents;
        stats
    }

    /// It allows to send a peer-diff event which eventually will be folded into [`statistics::AggregateStats`].
    ///
    /// # Context: Statistics
    pub async fn send_stats_event(&self, event: statistics::Event) -> Option<Result<(), SendError<statistics::Event>>> {
        match &self.stats_event_sender {
            None => None,
            Some(stats_event_sender) => stats_event_sender.send_event(event).await,
        }
    }
}

#[must_use]
fn assign_ip_address_to_peer(remote_client_ip: &IpAddr, tracker_external_ip: Option<IpAddr>) -> IpAddr {
    if let Some(host_ip) = tracker_external_ip.filter(|_| remote_client_ip.is_loopback()) {
        host_ip
    } else {
        *remote_client_ip
    }
}

#[cfg(test)]
mod tests {

    mod the_tracker {

        use std::net::{IpAddr, Ipv4Addr, SocketAddr};
        use std::str::FromStr;
        use std::sync::Arc;

        use aquatic_udp_protocol::PeerId;
        use torrust_tracker_primitives::announce_event::AnnounceEvent;
        use torrust_tracker_primitives::info_hash::InfoHash;
        use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, NumberOfBytes};
        use torrust_tracker_test_helpers::configuration;

        use crate::core::services::tracker_factory;
        use crate::core::{AnnounceData, ScrapeData, Tracker};
        use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;

        fn public_tracker() -> Tracker {
            tracker_factory(&configuration::ephemeral_mode_public())
        }

        fn private_tracker() -> Tracker {
            tracker_factory(&configuration::ephemeral_mode_private())
        }

        fn whitelisted_tracker() -> Tracker {
            tracker_factory(&configuration::ephemeral_mode_whitelisted())
        }

        fn sample_info_hash() -> InfoHash {
            "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".parse::<InfoHash>().unwrap()
        }

        fn peer_ip() -> IpAddr {
            IpAddr::V4(Ipv4Addr::from_str("126.0.0.1").unwrap())
        }

        fn seeder() -> peer::Peer {
            peer::Peer {
                peer_id: PeerId(*b"-qB00000000000000001"),
                peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 6881),
                updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
                uploaded: NumberOfBytes::new(0),
                downloaded: NumberOfBytes::new(0),
                left: NumberOfBytes::new(0),
                event: AnnounceEvent::Started,
                key: None,
            }
        }

        fn leecher() -> peer::Peer {
            peer::Peer {
                peer_id: PeerId(*b"-qB00000000000000002"),
                peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), 6881),
                updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
                uploaded: NumberOfBytes::new(0),
                downloaded: NumberOfBytes::new(0),
                left: NumberOfBytes::new(1_048_576),
                event: AnnounceEvent::Started,
                key: None,
            }
        }

        #[tokio::test]
        async fn it_should_be_able_to_announce_a_new_peer() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut peer = seeder();

            let announce_data = tracker.announce(&info_hash, &mut peer, &peer_ip(), None).await;

            assert_eq!(announce_data.stats, SwarmMetadata { complete: 0, downloaded: 0, incomplete: 0 });
            assert_eq!(announce_data.peers, vec![]);
        }

        #[tokio::test]
        async fn a_newly_announced_peer_must_not_appear_in_its_own_peer_list() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut seeder_peer = seeder();
            let mut leecher_peer = leecher();

            tracker.announce(&info_hash, &mut seeder_peer, &peer_ip(), None).await;
            let announce_data: AnnounceData = tracker.announce(&info_hash, &mut leecher_peer, &peer_ip(), None).await;

            assert!(!announce_data.peers.iter().any(|peer| peer.peer_id == leecher_peer.peer_id));
        }

        #[tokio::test]
        async fn scenario_a_two_peer_swarm_returns_the_seeder_to_the_leecher() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut seeder_peer = seeder();
            let mut leecher_peer = leecher();

            tracker.announce(&info_hash, &mut seeder_peer, &peer_ip(), None).await;
            let announce_data = tracker.announce(&info_hash, &mut leecher_peer, &peer_ip(), None).await;

            assert_eq!(announce_data.stats.complete, 1);
            assert_eq!(announce_data.stats.incomplete, 1);
            assert_eq!(announce_data.peers.len(), 1);
            assert_eq!(announce_data.peers[0].peer_id, seeder_peer.peer_id);
        }

        #[tokio::test]
        async fn scenario_b_a_completed_event_increments_the_completion_counter_once() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut leecher_peer = leecher();

            tracker.announce(&info_hash, &mut leecher_peer, &peer_ip(), None).await;

            leecher_peer.event = AnnounceEvent::Completed;
            leecher_peer.left = NumberOfBytes::new(0);
            let announce_data = tracker.announce(&info_hash, &mut leecher_peer, &peer_ip(), None).await;

            assert_eq!(announce_data.stats.complete, 1);
            assert_eq!(announce_data.stats.downloaded, 1);

            // A second `completed` does not double-count completions.
            let announce_data = tracker.announce(&info_hash, &mut leecher_peer, &peer_ip(), None).await;
            assert_eq!(announce_data.stats.downloaded, 1);
        }

        #[tokio::test]
        async fn scenario_c_a_stopped_peer_is_removed_and_scrape_reflects_it() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut seeder_peer = seeder();

            tracker.announce(&info_hash, &mut seeder_peer, &peer_ip(), None).await;

            seeder_peer.event = AnnounceEvent::Stopped;
            tracker.announce(&info_hash, &mut seeder_peer, &peer_ip(), None).await;

            let scrape_data = tracker.scrape(&vec![info_hash]).await;
            assert_eq!(scrape_data, ScrapeData::zeroed(&vec![info_hash]));
        }

        #[tokio::test]
        async fn it_should_return_empty_peer_list_when_requested_for_a_torrent_that_does_not_exist() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();

            assert_eq!(tracker.get_torrent_peers(&info_hash), vec![]);
        }

        #[tokio::test]
        async fn scrape_should_return_a_zeroed_entry_for_an_unknown_torrent() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();

            let scrape_data = tracker.scrape(&vec![info_hash]).await;

            assert_eq!(scrape_data, ScrapeData::zeroed(&vec![info_hash]));
        }

        #[tokio::test]
        async fn it_should_return_the_tracker_statistics() {
            let tracker = public_tracker();

            let stats = tracker.get_stats().await;

            assert_eq!(stats.total_peers, 0);
            assert_eq!(stats.active_torrents, 0);
        }

        #[tokio::test]
        async fn should_be_public_private_or_whitelisted() {
            assert!(public_tracker().is_public());
            assert!(!public_tracker().is_private());
            assert!(!public_tracker().is_whitelisted());

            assert!(private_tracker().is_private());
            assert!(!private_tracker().is_public());

            assert!(whitelisted_tracker().is_whitelisted());
            assert!(!whitelisted_tracker().is_public());
        }

        #[tokio::test]
        async fn private_tracker_requires_authentication() {
            assert!(private_tracker().requires_authentication());
            assert!(!public_tracker().requires_authentication());
        }

        #[tokio::test]
        async fn an_unknown_torrent_is_rejected_on_a_listed_tracker() {
            use crate::core::external::{TorrentLookup, TorrentRepo};
            use async_trait::async_trait;

            struct NothingIsActive;

            #[async_trait]
            impl TorrentRepo for NothingIsActive {
                async fn lookup(&self, _info_hash: &InfoHash) -> Option<TorrentLookup> {
                    Some(TorrentLookup {
                        is_active: false,
                        is_private: false,
                        owner_id: None,
                    })
                }
            }

            let config = configuration::ephemeral_mode_whitelisted();
            let tracker = Tracker::new(
                &config,
                crate::core::external::default_user_repo(),
                Arc::new(NothingIsActive),
                crate::core::external::default_ledger(),
                crate::core::external::default_observability(),
                None,
                crate::core::statistics::Repo::new(),
            );

            assert!(tracker.authorize(&sample_info_hash()).await.is_err());
        }

        #[tokio::test]
        async fn an_active_torrent_is_accepted_on_a_listed_tracker() {
            let tracker = whitelisted_tracker();

            assert!(tracker.authorize(&sample_info_hash()).await.is_ok());
        }

        #[tokio::test]
        async fn an_authenticated_announce_books_a_credit_transaction() {
            use crate::core::external::{CreditTransaction, Ledger, LedgerError, ResolvedUser, UserClass, UserId};

            struct RecordingLedger {
                transactions: tokio::sync::Mutex<Vec<CreditTransaction>>,
            }

            #[async_trait::async_trait]
            impl Ledger for RecordingLedger {
                async fn write_transaction(&self, transaction: CreditTransaction) -> Result<(), LedgerError> {
                    self.transactions.lock().await.push(transaction);
                    Ok(())
                }
            }

            let ledger = Arc::new(RecordingLedger {
                transactions: tokio::sync::Mutex::new(Vec::new()),
            });

            let config = configuration::ephemeral_mode_public();
            let tracker = Tracker::new(
                &config,
                crate::core::external::default_user_repo(),
                crate::core::external::default_torrent_repo(),
                ledger.clone(),
                crate::core::external::default_observability(),
                None,
                crate::core::statistics::Repo::new(),
            );

            let info_hash = sample_info_hash();
            let mut peer = leecher();
            peer.downloaded = NumberOfBytes::new(500);

            let resolved = ResolvedUser {
                user_id: UserId(42),
                user_class: UserClass::Regular,
                is_banned: false,
            };

            tracker.announce(&info_hash, &mut peer, &peer_ip(), Some(resolved)).await;

            assert_eq!(ledger.transactions.lock().await.len(), 1);
        }

        #[tokio::test]
        async fn it_should_be_able_to_cleanup_torrents() {
            let tracker = public_tracker();
            let info_hash = sample_info_hash();
            let mut peer = seeder();

            tracker.announce(&info_hash, &mut peer, &peer_ip(), None).await;
            tracker.cleanup_torrents();

            // With default policy the swarm is only pruned once peers go inactive; a freshly
            // announced peer is still present right after cleanup runs.
            assert!(tracker.torrents.get(&info_hash).is_some());
        }
    }
}
