//! Logic to extract the peer info from the announce request.
use std::net::{IpAddr, SocketAddr};

use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::peer::Peer;

use super::request::AnnounceWrapper;
use crate::CurrentClock;

/// Extracts the [`Peer`](torrust_tracker_primitives::peer::Peer) info from the
/// announce request.
///
/// # Arguments
///
/// * `announce_wrapper` - The announce request to extract the peer info from.
/// * `peer_ip` - The real IP address of the peer, not the one in the announce
/// request.
#[must_use]
pub fn from_request(announce_wrapper: &AnnounceWrapper, peer_ip: &IpAddr) -> Peer {
    Peer {
        peer_id: announce_wrapper.announce_request.peer_id,
        peer_addr: SocketAddr::new(*peer_ip, announce_wrapper.announce_request.port.0),
        updated: CurrentClock::now(),
        uploaded: announce_wrapper.announce_request.bytes_uploaded,
        downloaded: announce_wrapper.announce_request.bytes_downloaded,
        left: announce_wrapper.announce_request.bytes_left,
        event: map_to_announce_event(announce_wrapper.announce_request.event),
        key: None,
    }
}

fn map_to_announce_event(event: aquatic_udp_protocol::AnnounceEvent) -> AnnounceEvent {
    match event {
        aquatic_udp_protocol::AnnounceEvent::Started => AnnounceEvent::Started,
        aquatic_udp_protocol::AnnounceEvent::Stopped => AnnounceEvent::Stopped,
        aquatic_udp_protocol::AnnounceEvent::Completed => AnnounceEvent::Completed,
        aquatic_udp_protocol::AnnounceEvent::None => AnnounceEvent::Update,
    }
}
