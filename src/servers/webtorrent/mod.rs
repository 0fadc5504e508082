//! `WebTorrent` signaling: announce/scrape over a `WebSocket`, plus `WebRTC` offer/answer relay.
//!
//! Unlike the HTTP and UDP dispatchers, the `WebSocket` transport keeps a live connection per
//! peer, so the tracker can push relayed offers/answers to a peer instead of waiting for it to
//! poll. See [`signaling`] for the message handling.
pub mod signaling;
