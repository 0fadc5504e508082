//! UDP tracker dispatcher: BEP 15 connect/announce/scrape framing over a raw socket.
use std::net::SocketAddr;

pub mod check;
pub mod connection_cookie;
pub mod error;
pub mod handle;
pub mod handlers;
pub mod launcher;
pub mod peer_builder;
pub mod request;
pub mod server;
pub mod tracing;

/// Each UDP packet is at most 1496 bytes (BEP 41 extension limit minus transport headers).
pub const MAX_PACKET_SIZE: usize = 1496;

/// A raw, not-yet-parsed UDP request: the datagram payload plus the sender's address.
pub struct RawRequest {
    pub payload: [u8; MAX_PACKET_SIZE],
    pub payload_len: usize,
    pub from: SocketAddr,
}
