use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The event reported by a peer on an announce request.
///
/// See [BEP 3](https://www.bittorrent.org/beps/bep_0003.html) for `started`/`stopped`/`completed`/
/// the regular-interval announce (here named `Update`). `Paused` is a tracker extension: the peer
/// is retained in the swarm and counted in aggregates but not advertised to other peers.
#[derive(Hash, Clone, Copy, Debug, Display, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnnounceEvent {
    /// First announce of a session.
    #[display("started")]
    Started,
    /// The peer has ceased participating in the swarm.
    #[display("stopped")]
    Stopped,
    /// The peer has just finished downloading the content.
    #[display("completed")]
    Completed,
    /// A regular-interval announce carrying no state transition.
    #[display("")]
    Update,
    /// The peer remains in the swarm but asks not to be advertised to others.
    #[display("paused")]
    Paused,
}

impl AnnounceEvent {
    /// Maps from the BEP 15 UDP wire encoding (`0..=3`). UDP has no wire value for `Paused`.
    #[inline]
    #[must_use]
    pub fn from_i32(i: i32) -> Self {
        match i {
            1 => Self::Completed,
            2 => Self::Started,
            3 => Self::Stopped,
            _ => Self::Update,
        }
    }

    #[inline]
    #[must_use]
    pub fn to_i32(&self) -> i32 {
        match self {
            AnnounceEvent::Update => 0,
            AnnounceEvent::Completed => 1,
            AnnounceEvent::Started => 2,
            AnnounceEvent::Stopped => 3,
            AnnounceEvent::Paused => 4,
        }
    }
}
