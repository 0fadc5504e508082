//! Aggregate swarm counters derived from peer diffs.
//!
//! The tracker collects:
//!
//! - Total peers currently registered across all swarms.
//! - Total seeders and total leechers (the two are disjoint and sum to the total).
//! - The number of "active" torrents, meaning swarms with at least one peer.
//!
//! Unlike the swarm registry itself, which forgets a peer the moment it leaves, the aggregator
//! only cares about counts, so it is fed incrementally from the same
//! [`PeerDiff`](torrust_tracker_torrent_repository::entry::PeerDiff) the credit engine consumes,
//! rather than re-scanning every swarm on each request.
//!
//! The data is collected by using an `event-sender -> event listener` model.
//!
//! [`Tracker::announce`](crate::core::Tracker::announce) uses a [`statistics::EventSender`](EventSender)
//! instance to send an event after every peer mutation. The [`statistics::Keeper`](Keeper) listens
//! for new events and uses the [`statistics::Repo`](Repo) to update the counters.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use aquatic_udp_protocol::PeerId;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{mpsc, RwLock};
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_torrent_repository::entry::PeerTransition;
use tracing::debug;

const CHANNEL_BUFFER_SIZE: usize = 65_535;

/// A single peer's state change, as reported by the swarm registry after an announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub info_hash: InfoHash,
    pub peer_id: PeerId,
    pub transition: PeerTransition,
    /// Whether the peer is a seeder (`left == 0`) as of this transition. Ignored for
    /// [`PeerTransition::Stopped`] and [`PeerTransition::Evicted`], where the aggregator relies
    /// on the state it already has recorded for the peer.
    pub is_seeder: bool,
}

/// A snapshot of the counters served at `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct AggregateStats {
    pub total_torrents: u64,
    pub active_torrents: u64,
    pub total_peers: u64,
    pub total_seeders: u64,
    pub total_leechers: u64,
}

/// Per-peer and per-torrent bookkeeping the aggregator needs to correctly decrement counters on
/// `stopped`/`evicted` without re-deriving them from the swarm registry.
#[derive(Debug, Default)]
struct AggregatorState {
    peers_by_torrent: HashMap<InfoHash, BTreeMap<PeerId, bool>>,
}

impl AggregatorState {
    fn snapshot(&self) -> AggregateStats {
        let mut total_peers = 0u64;
        let mut total_seeders = 0u64;
        let mut active_torrents = 0u64;

        for peers in self.peers_by_torrent.values() {
            if peers.is_empty() {
                continue;
            }
            active_torrents += 1;
            total_peers += peers.len() as u64;
            total_seeders += peers.values().filter(|is_seeder| **is_seeder).count() as u64;
        }

        AggregateStats {
            total_torrents: 0,
            active_torrents,
            total_peers,
            total_seeders,
            total_leechers: total_peers - total_seeders,
        }
    }

    fn apply(&mut self, event: &Event) {
        match event.transition {
            PeerTransition::Stopped | PeerTransition::Evicted => {
                if let Some(peers) = self.peers_by_torrent.get_mut(&event.info_hash) {
                    peers.remove(&event.peer_id);
                    if peers.is_empty() {
                        self.peers_by_torrent.remove(&event.info_hash);
                    }
                }
            }
            PeerTransition::Started | PeerTransition::Updated | PeerTransition::Completed | PeerTransition::Paused => {
                self.peers_by_torrent
                    .entry(event.info_hash)
                    .or_default()
                    .insert(event.peer_id, event.is_seeder);
            }
        }
    }
}

/// The service responsible for keeping the aggregate counters (listening to peer-diff events and
/// folding them into [`AggregatorState`]).
pub struct Keeper {
    pub repository: Repo,
}

impl Default for Keeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Keeper {
    #[must_use]
    pub fn new() -> Self {
        Self { repository: Repo::new() }
    }

    #[must_use]
    pub fn new_active_instance() -> (Box<dyn EventSender>, Repo) {
        let mut keeper = Self::new();

        let stats_event_sender = keeper.run_event_listener();

        (stats_event_sender, keeper.repository)
    }

    pub fn run_event_listener(&mut self) -> Box<dyn EventSender> {
        let (sender, receiver) = mpsc::channel::<Event>(CHANNEL_BUFFER_SIZE);

        let stats_repository = self.repository.clone();

        tokio::spawn(async move { event_listener(receiver, stats_repository).await });

        Box::new(Sender { sender })
    }
}

async fn event_listener(mut receiver: mpsc::Receiver<Event>, stats_repository: Repo) {
    while let Some(event) = receiver.recv().await {
        event_handler(event, &stats_repository).await;
    }
}

async fn event_handler(event: Event, stats_repository: &Repo) {
    stats_repository.apply(&event).await;

    debug!("stats: {:?}", stats_repository.get_stats().await);
}

/// A trait to allow sending peer-diff events to the aggregator.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait EventSender: Sync + Send {
    async fn send_event(&self, event: Event) -> Option<Result<(), SendError<Event>>>;
}

/// An [`EventSender`] implementation backed by a channel created by a [`Keeper`].
pub struct Sender {
    sender: mpsc::Sender<Event>,
}

#[async_trait]
impl EventSender for Sender {
    async fn send_event(&self, event: Event) -> Option<Result<(), SendError<Event>>> {
        Some(self.sender.send(event).await)
    }
}

/// An in-memory repository for the aggregate counters.
#[derive(Clone, Default)]
pub struct Repo {
    state: Arc<RwLock<AggregatorState>>,
}

impl Repo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_stats(&self) -> AggregateStats {
        self.state.read().await.snapshot()
    }

    pub async fn apply(&self, event: &Event) {
        self.state.write().await.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use aquatic_udp_protocol::PeerId;
    use torrust_tracker_primitives::info_hash::InfoHash;
    use torrust_tracker_torrent_repository::entry::PeerTransition;

    use super::{AggregateStats, Event, Keeper, Repo};

    fn sample_info_hash() -> InfoHash {
        InfoHash::from([0x69; 20])
    }

    fn sample_peer_id(byte: u8) -> PeerId {
        PeerId([byte; 20])
    }

    fn started(peer_id: PeerId, is_seeder: bool) -> Event {
        Event {
            info_hash: sample_info_hash(),
            peer_id,
            transition: PeerTransition::Started,
            is_seeder,
        }
    }

    mod stats_tracker {
        use super::{sample_info_hash, sample_peer_id};
        use crate::core::statistics::{Event, Keeper};
        use torrust_tracker_torrent_repository::entry::PeerTransition;

        #[tokio::test]
        async fn should_start_with_zeroed_counters() {
            let keeper = Keeper::new();

            let stats = keeper.repository.get_stats().await;

            assert_eq!(stats.total_peers, 0);
        }

        #[tokio::test]
        async fn should_create_an_event_sender_that_can_deliver_events() {
            let mut keeper = Keeper::new();

            let event_sender = keeper.run_event_listener();

            let result = event_sender
                .send_event(Event {
                    info_hash: sample_info_hash(),
                    peer_id: sample_peer_id(1),
                    transition: PeerTransition::Started,
                    is_seeder: true,
                })
                .await;

            assert!(result.is_some());
        }
    }

    mod event_handler {
        use torrust_tracker_torrent_repository::entry::PeerTransition;

        use super::{sample_peer_id, started, Repo};
        use crate::core::statistics::event_handler;

        #[tokio::test]
        async fn a_started_seeder_increments_total_peers_and_seeders() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), true), &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.total_peers, 1);
            assert_eq!(stats.total_seeders, 1);
            assert_eq!(stats.total_leechers, 0);
            assert_eq!(stats.active_torrents, 1);
        }

        #[tokio::test]
        async fn a_started_leecher_increments_total_peers_and_leechers() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), false), &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.total_leechers, 1);
            assert_eq!(stats.total_seeders, 0);
        }

        #[tokio::test]
        async fn a_second_transition_for_the_same_peer_does_not_double_count_it() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), false), &repo).await;
            let mut update = started(sample_peer_id(1), true);
            update.transition = PeerTransition::Updated;
            event_handler(update, &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.total_peers, 1);
            assert_eq!(stats.total_seeders, 1);
            assert_eq!(stats.total_leechers, 0);
        }

        #[tokio::test]
        async fn a_stopped_peer_is_removed_from_the_counters() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), true), &repo).await;
            let mut stopped = started(sample_peer_id(1), true);
            stopped.transition = PeerTransition::Stopped;
            event_handler(stopped, &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.total_peers, 0);
            assert_eq!(stats.active_torrents, 0);
        }

        #[tokio::test]
        async fn an_evicted_peer_is_removed_from_the_counters_without_needing_its_seeder_flag() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), false), &repo).await;
            let mut evicted = started(sample_peer_id(1), false);
            evicted.transition = PeerTransition::Evicted;
            event_handler(evicted, &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.total_peers, 0);
        }

        #[tokio::test]
        async fn a_torrent_stays_active_while_any_peer_remains() {
            let repo = Repo::new();

            event_handler(started(sample_peer_id(1), true), &repo).await;
            event_handler(started(sample_peer_id(2), false), &repo).await;

            let mut stopped = started(sample_peer_id(1), true);
            stopped.transition = PeerTransition::Stopped;
            event_handler(stopped, &repo).await;

            let stats = repo.get_stats().await;
            assert_eq!(stats.active_torrents, 1);
            assert_eq!(stats.total_peers, 1);
        }
    }

    #[tokio::test]
    async fn a_fresh_snapshot_is_all_zero() {
        let stats = Repo::new().get_stats().await;
        assert_eq!(stats, AggregateStats::default());
    }
}
