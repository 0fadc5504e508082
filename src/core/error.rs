//! Error returned by the core `Tracker`.
//!
//! Variants map onto the taxonomy the dispatchers render into their transport-specific failure
//! encoding:
//!
//! Error | Taxonomy | Description
//! ---|---|---
//! `PeerNotAuthenticated` | Authentication failure | No `auth_token` supplied for a private tracker.
//! `PeerKeyNotValid` | Authentication failure | The `auth_token` is unknown, expired, or belongs to a banned user.
//! `TorrentNotWhitelisted` | Resource failure | The torrent is not whitelisted on a `listed`/`private_listed` tracker.
//! `TorrentNotFound` | Resource failure | The torrent is unknown to the torrent repository on a private tracker.
//! `SpoofedPeer` | Malformed request | A `peer_id` reappeared at a different endpoint with a mismatched `key`.
//! `TrackerFull` | Resource failure | The process-wide swarm count limit has been reached.
//!
//! Malformed requests and transient backend failures are not modeled here: malformed requests
//! are rejected by the dispatcher before reaching the `Tracker` (codec-level failure), and
//! transient repository/ledger failures are caught and degraded at the call site rather than
//! propagated (see [`crate::core::credit`] and [`crate::core::external`]).
use std::panic::Location;

use torrust_tracker_located_error::LocatedError;
use torrust_tracker_primitives::info_hash::InfoHash;

/// Authentication or authorization error returned by the core `Tracker`.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    // Authentication errors
    #[error("The supplied key: {key:?}, is not valid: {source}")]
    PeerKeyNotValid {
        key: super::auth::Key,
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },
    #[error("The peer is not authenticated, {location}")]
    PeerNotAuthenticated { location: &'static Location<'static> },

    // Authorization / resource errors
    #[error("The torrent: {info_hash}, is not whitelisted, {location}")]
    TorrentNotWhitelisted {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },
    #[error("The torrent: {info_hash}, is not known to the torrent repository, {location}")]
    TorrentNotFound {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },
    #[error("The tracker is full, {location}")]
    TrackerFull { location: &'static Location<'static> },
}

impl From<super::auth::Error> for Error {
    fn from(err: super::auth::Error) -> Self {
        use torrust_tracker_located_error::DynError;

        Error::PeerKeyNotValid {
            key: match &err {
                super::auth::Error::UnableToReadKey { key } | super::auth::Error::UserBanned { key } => (**key).clone(),
            },
            source: (std::sync::Arc::new(err) as DynError).into(),
        }
    }
}
