//! Message handling for the `WebTorrent` signaling `WebSocket` endpoint.
//!
//! A `WebSocket` peer sends JSON `{action, info_hash, peer_id, ...}` announces just like an HTTP
//! peer, plus optional `offers`/`answer` carrying opaque `WebRTC` SDP blobs. The tracker never
//! inspects or mutates SDP; it only relays it to the peers selected by the swarm registry, keyed
//! by `peer_id` and echoed `offer_id`.
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use aquatic_udp_protocol::{NumberOfBytes, PeerId};
use axum::extract::ws::{Message, WebSocket};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use torrust_tracker_clock::clock::Time as _;
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::peer;
use tracing::{debug, warn};

use crate::core;
use crate::CurrentClock;

type OutgoingSender = mpsc::UnboundedSender<Message>;

/// Live `WebSocket` connections, keyed by the hex `peer_id` announced on them.
///
/// This is separate from the swarm registry's peer table: the registry stores the peer's
/// announced counters and endpoint, this tracks the socket used to push relayed signaling
/// messages back to it. A peer that reconnects (new socket, same `peer_id`) simply replaces its
/// entry here.
#[derive(Clone)]
pub struct SignalingState {
    tracker: Arc<core::Tracker>,
    max_offers_per_peer: usize,
    connections: Arc<DashMap<String, OutgoingSender>>,
}

impl SignalingState {
    #[must_use]
    pub fn new(tracker: Arc<core::Tracker>, max_offers_per_peer: usize) -> Self {
        Self {
            tracker,
            max_offers_per_peer,
            connections: Arc::new(DashMap::new()),
        }
    }
}

#[derive(Deserialize)]
struct WsOffer {
    offer_id: String,
    offer: Value,
}

#[derive(Deserialize)]
struct WsAnswer {
    offer_id: String,
    answer: Value,
    to_peer_id: String,
}

#[derive(Deserialize)]
struct WsRequest {
    action: String,
    info_hash: String,
    #[serde(default)]
    peer_id: Option<String>,
    #[serde(default)]
    numwant: Option<usize>,
    #[serde(default)]
    uploaded: Option<u64>,
    #[serde(default)]
    downloaded: Option<u64>,
    #[serde(default)]
    left: Option<u64>,
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    offers: Vec<WsOffer>,
    #[serde(default)]
    answer: Option<WsAnswer>,
}

#[derive(Serialize)]
struct WsFailure<'a> {
    failure: &'a str,
}

#[derive(Serialize)]
struct WsAnnounceResponse {
    action: &'static str,
    info_hash: String,
    interval: u32,
    complete: u32,
    incomplete: u32,
}

#[derive(Serialize)]
struct WsRelayedOffer<'a> {
    action: &'static str,
    info_hash: &'a str,
    offer_id: &'a str,
    offer: &'a Value,
    peer_id: &'a str,
}

#[derive(Serialize)]
struct WsRelayedAnswer<'a> {
    action: &'static str,
    info_hash: &'a str,
    offer_id: &'a str,
    answer: &'a Value,
    peer_id: &'a str,
}

#[derive(Serialize)]
struct WsScrapeResponse {
    action: &'static str,
    files: std::collections::HashMap<String, ScrapeFile>,
}

#[derive(Serialize)]
struct ScrapeFile {
    complete: u32,
    incomplete: u32,
    downloaded: u32,
}

/// Drives one `WebSocket` connection until it closes: reads incoming signaling messages,
/// forwards relayed offers/answers pushed from other connections, and deregisters the peer on
/// disconnect.
pub async fn handle_socket(mut socket: WebSocket, remote: SocketAddr, state: SignalingState) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut registered_peer_id: Option<String> = None;

    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                match outgoing {
                    Some(message) => {
                        if socket.send(message).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(failure) = handle_message(&text, remote.ip(), &state, &tx, &mut registered_peer_id).await {
                            let body = serde_json::to_string(&WsFailure { failure: &failure }).unwrap_or_default();
                            if socket.send(Message::Text(body)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("websocket tracker connection error: {err}");
                        break;
                    }
                }
            }
        }
    }

    if let Some(peer_id) = registered_peer_id {
        state.connections.remove(&peer_id);
    }
}

async fn handle_message(
    text: &str,
    remote_ip: IpAddr,
    state: &SignalingState,
    tx: &OutgoingSender,
    registered_peer_id: &mut Option<String>,
) -> Result<(), String> {
    let request: WsRequest = serde_json::from_str(text).map_err(|err| format!("malformed message: {err}"))?;

    match request.action.as_str() {
        "announce" => handle_announce(request, remote_ip, state, tx, registered_peer_id).await,
        "scrape" => handle_scrape(&request, state, tx).await,
        other => Err(format!("unsupported action: {other}")),
    }
}

async fn handle_announce(
    request: WsRequest,
    remote_ip: IpAddr,
    state: &SignalingState,
    tx: &OutgoingSender,
    registered_peer_id: &mut Option<String>,
) -> Result<(), String> {
    let info_hash = InfoHash::from_str(&request.info_hash).map_err(|()| "invalid info_hash".to_owned())?;
    let peer_id_hex = request.peer_id.clone().ok_or_else(|| "missing peer_id".to_owned())?;
    let peer_id = parse_peer_id(&peer_id_hex)?;

    state.connections.insert(peer_id_hex.clone(), tx.clone());
    *registered_peer_id = Some(peer_id_hex.clone());

    let event = match request.event.as_deref() {
        Some("started") => AnnounceEvent::Started,
        Some("stopped") => AnnounceEvent::Stopped,
        Some("completed") => AnnounceEvent::Completed,
        Some("paused") => AnnounceEvent::Paused,
        _ => AnnounceEvent::Update,
    };

    let mut peer = peer::Peer {
        peer_id,
        peer_addr: SocketAddr::new(remote_ip, 0),
        updated: CurrentClock::now(),
        uploaded: NumberOfBytes::new(i64::try_from(request.uploaded.unwrap_or_default()).unwrap_or(i64::MAX)),
        downloaded: NumberOfBytes::new(i64::try_from(request.downloaded.unwrap_or_default()).unwrap_or(i64::MAX)),
        left: NumberOfBytes::new(i64::try_from(request.left.unwrap_or_default()).unwrap_or(i64::MAX)),
        event,
        key: None,
    };

    // WebSocket signaling carries no auth_token field, so these announces are never
    // credited by the credit engine.
    let announce_data = state.tracker.announce(&info_hash, &mut peer, &remote_ip, None).await;

    let response = WsAnnounceResponse {
        action: "announce",
        info_hash: request.info_hash.clone(),
        interval: announce_data.policy.interval,
        complete: announce_data.stats.complete,
        incomplete: announce_data.stats.incomplete,
    };
    send_json(tx, &response);

    let offers_to_relay = request.offers.into_iter().take(state.max_offers_per_peer);
    relay_offers(&state.connections, &request.info_hash, &peer_id_hex, offers_to_relay, &announce_data.peers);

    if let Some(answer) = request.answer {
        relay_answer(&state.connections, &request.info_hash, &peer_id_hex, &answer);
    }

    Ok(())
}

async fn handle_scrape(request: &WsRequest, state: &SignalingState, tx: &OutgoingSender) -> Result<(), String> {
    let info_hash = InfoHash::from_str(&request.info_hash).map_err(|()| "invalid info_hash".to_owned())?;
    let scrape_data = state.tracker.scrape(&vec![info_hash]).await;

    let mut files = std::collections::HashMap::new();
    if let Some(metadata) = scrape_data.files.get(&info_hash) {
        files.insert(
            request.info_hash.clone(),
            ScrapeFile {
                complete: metadata.complete,
                incomplete: metadata.incomplete,
                downloaded: metadata.downloaded,
            },
        );
    }

    send_json(tx, &WsScrapeResponse { action: "scrape", files });
    Ok(())
}

/// Relays each offer to the peer it names, looking the target connection up by `peer_id`. Offers
/// for peers without a live `WebSocket` connection (e.g. plain HTTP/UDP peers) are silently
/// dropped: `WebRTC` signaling only makes sense between two `WebSocket`-connected peers.
fn relay_offers(
    connections: &DashMap<String, OutgoingSender>,
    info_hash: &str,
    from_peer_id: &str,
    offers: impl Iterator<Item = WsOffer>,
    candidate_peers: &[Arc<peer::Peer>],
) {
    let targets: Vec<String> = candidate_peers.iter().map(|peer| hex::encode(peer.peer_id.0)).collect();

    for (offer, to_peer_id) in offers.zip(targets) {
        if to_peer_id == from_peer_id {
            continue;
        }
        let Some(connection) = connections.get(&to_peer_id) else {
            debug!("dropping webtorrent offer for disconnected peer {to_peer_id}");
            continue;
        };
        let message = WsRelayedOffer {
            action: "offer",
            info_hash,
            offer_id: &offer.offer_id,
            offer: &offer.offer,
            peer_id: from_peer_id,
        };
        send_json(connection.value(), &message);
    }
}

fn relay_answer(connections: &DashMap<String, OutgoingSender>, info_hash: &str, from_peer_id: &str, answer: &WsAnswer) {
    let Some(connection) = connections.get(&answer.to_peer_id) else {
        debug!("dropping webtorrent answer for disconnected peer {}", answer.to_peer_id);
        return;
    };
    let message = WsRelayedAnswer {
        action: "answer",
        info_hash,
        offer_id: &answer.offer_id,
        answer: &answer.answer,
        peer_id: from_peer_id,
    };
    send_json(connection.value(), &message);
}

fn send_json<T: Serialize>(tx: &OutgoingSender, value: &T) {
    match serde_json::to_string(value) {
        Ok(body) => {
            let _ = tx.send(Message::Text(body));
        }
        Err(err) => warn!("failed to encode websocket tracker message: {err}"),
    }
}

fn parse_peer_id(hex_str: &str) -> Result<PeerId, String> {
    let bytes = hex::decode(hex_str).map_err(|_| "invalid peer_id: not hex".to_owned())?;
    let array: [u8; 20] = bytes.try_into().map_err(|_| "invalid peer_id: wrong length".to_owned())?;
    Ok(PeerId(array))
}
