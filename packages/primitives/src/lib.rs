//! Primitive types shared by the tracker core and its satellite crates.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod announce_event;
pub mod info_hash;
pub mod pagination;
pub mod peer;
pub mod swarm_metadata;
pub mod torrent_metrics;

/// A point in time expressed as a duration since the Unix epoch.
///
/// All tracker timestamps (`peer.updated`, connection-cookie issuance, credit-session
/// bookkeeping) are expressed this way so that they can be driven by [`CurrentClock`]
/// and replayed deterministically in tests.
pub type DurationSinceUnixEpoch = std::time::Duration;

/// IP family of a peer's advertised endpoint, used to route it into the `peers`
/// (compact v4) or `peers6` (compact v6) stream of an announce response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IPVersion {
    IPv4,
    IPv6,
}

/// Completion counts recovered from a persistence snapshot, keyed by info_hash, used to
/// seed the swarm registry's lifetime `downloaded` counters on restart.
pub type PersistentTorrents = BTreeMap<info_hash::InfoHash, u32>;

/// The mode the tracker runs in.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
pub enum TrackerMode {
    /// Tracks every new info hash and serves every peer.
    #[serde(rename = "public")]
    Public,

    /// Only tracks info hashes present in the torrent repository's whitelist.
    #[serde(rename = "listed")]
    Listed,

    /// Only serves peers that present a valid auth token.
    #[serde(rename = "private")]
    Private,

    /// Combines `listed` and `private`.
    #[serde(rename = "private_listed")]
    PrivateListed,
}
