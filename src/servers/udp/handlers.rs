//! Handlers for the UDP server.
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use aquatic_udp_protocol::{
    AnnounceInterval, AnnounceRequest, AnnounceResponse, ConnectRequest, ConnectResponse, ErrorResponse, NumberOfDownloads,
    NumberOfPeers, Port, Request, Response, ResponsePeer, ScrapeRequest, ScrapeResponse, TorrentScrapeStatistics, TransactionId,
};
use tokio::net::UdpSocket;
use torrust_tracker_located_error::DynError;
use torrust_tracker_primitives::info_hash::InfoHash;
use tracing::debug;
use uuid::Uuid;

use super::connection_cookie::{check, from_connection_id, into_connection_id, make};
use super::RawRequest;
use crate::core::{ScrapeData, Tracker};
use crate::servers::udp::error::Error;
use crate::servers::udp::peer_builder;
use crate::servers::udp::request::AnnounceWrapper;
use crate::servers::udp::tracing::{trace_bad_request, trace_error_response, trace_request, trace_response};
use crate::shared::bit_torrent::common::MAX_SCRAPE_TORRENTS;

/// It handles the incoming UDP packets.
///
/// It's responsible for:
///
/// - Parsing the incoming packet.
/// - Delegating the request to the correct handler depending on the request
/// type.
///
/// It will return an `Error` response if the request is invalid.
pub(crate) async fn handle_packet(udp_request: RawRequest, tracker: &Arc<Tracker>, socket: Arc<UdpSocket>) -> Response {
    debug!("Handling Packets: {udp_request:?}");

    let start_time = Instant::now();

    let request_id = RequestId::make(&udp_request);
    let server_socket_addr = socket.local_addr().expect("Could not get local_addr for socket.");

    match Request::from_bytes(&udp_request.payload[..udp_request.payload.len()], MAX_SCRAPE_TORRENTS).map_err(|e| {
        Error::InternalServer {
            message: format!("{e:?}"),
            location: Location::caller(),
        }
    }) {
        Ok(request) => {
            trace_request(&request, &request_id, &server_socket_addr);

            let transaction_id = match &request {
                Request::Connect(connect_request) => connect_request.transaction_id,
                Request::Announce(announce_request) => announce_request.transaction_id,
                Request::Scrape(scrape_request) => scrape_request.transaction_id,
            };

            let response = match handle_request(request, udp_request.from, tracker).await {
                Ok(response) => response,
                Err(e) => handle_error(&e, transaction_id),
            };

            let latency = start_time.elapsed();

            trace_response(&response, &transaction_id, &request_id, &server_socket_addr, latency);

            response
        }
        Err(e) => {
            trace_bad_request(&request_id);

            let response = handle_error(
                &Error::BadRequest {
                    source: (Arc::new(e) as DynError).into(),
                },
                TransactionId(0),
            );

            trace_error_response(&request_id);

            response
        }
    }
}

/// It dispatches the request to the correct handler.
///
/// # Errors
///
/// If a error happens in the `handle_request` function, it will just return the  `ServerError`.
pub async fn handle_request(request: Request, remote_addr: SocketAddr, tracker: &Tracker) -> Result<Response, Error> {
    debug!("Handling Request: {request:?} to: {remote_addr:?}");

    match request {
        Request::Connect(connect_request) => handle_connect(remote_addr, &connect_request, tracker).await,
        Request::Announce(announce_request) => handle_announce(remote_addr, &announce_request, tracker).await,
        Request::Scrape(scrape_request) => handle_scrape(remote_addr, &scrape_request, tracker).await,
    }
}

/// It handles the `Connect` request. Refer to [`Connect`](crate::servers::udp#connect)
/// request for more information.
///
/// # Errors
///
/// This function does not ever return an error.
pub async fn handle_connect(remote_addr: SocketAddr, request: &ConnectRequest, tracker: &Tracker) -> Result<Response, Error> {
    debug!("udp connect request: {:#?}", request);

    let connection_cookie = make(&remote_addr);
    let connection_id = into_connection_id(&connection_cookie);

    let response = ConnectResponse {
        transaction_id: request.transaction_id,
        connection_id,
    };

    debug!("udp connect response: {:#?}", response);

    Ok(Response::from(response))
}

/// It handles the `Announce` request. Refer to [`Announce`](crate::servers::udp#announce)
/// request for more information.
///
/// # Errors
///
/// If a error happens in the `handle_announce` function, it will just return the  `ServerError`.
pub async fn handle_announce(
    remote_addr: SocketAddr,
    announce_request: &AnnounceRequest,
    tracker: &Tracker,
) -> Result<Response, Error> {
    debug!("udp announce request: {:#?}", announce_request);

    // Authentication
    if tracker.requires_authentication() {
        return Err(Error::TrackerAuthenticationRequired {
            location: Location::caller(),
        });
    }

    check(&remote_addr, &from_connection_id(&announce_request.connection_id))?;

    let wrapped_announce_request = AnnounceWrapper::new(announce_request);

    let info_hash = wrapped_announce_request.info_hash;
    let remote_client_ip = remote_addr.ip();

    // Authorization
    tracker.authorize(&info_hash).await.map_err(|e| Error::TrackerError {
        source: (Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>).into(),
    })?;

    let mut peer = peer_builder::from_request(&wrapped_announce_request, &remote_client_ip);

    // UDP (BEP 15) carries no string auth_token, so announces from this transport are never
    // credited by the credit engine.
    let response = tracker.announce(&info_hash, &mut peer, &remote_client_ip, None).await;

    #[allow(clippy::cast_possible_truncation)]
    if remote_addr.is_ipv4() {
        let announce_response = AnnounceResponse {
            transaction_id: wrapped_announce_request.announce_request.transaction_id,
            announce_interval: AnnounceInterval(i64::from(tracker.get_announce_policy().interval) as i32),
            leechers: NumberOfPeers(i64::from(response.stats.incomplete) as i32),
            seeders: NumberOfPeers(i64::from(response.stats.complete) as i32),
            peers: response
                .peers
                .iter()
                .filter_map(|peer| {
                    if let IpAddr::V4(ip) = peer.peer_addr.ip() {
                        Some(ResponsePeer::<Ipv4Addr> {
                            ip_address: ip,
                            port: Port(peer.peer_addr.port()),
                        })
                    } else {
                        None
                    }
                })
                .collect(),
        };

        debug!("udp announce response: {:#?}", announce_response);

        Ok(Response::from(announce_response))
    } else {
        let announce_response = AnnounceResponse {
            transaction_id: wrapped_announce_request.announce_request.transaction_id,
            announce_interval: AnnounceInterval(i64::from(tracker.get_announce_policy().interval) as i32),
            leechers: NumberOfPeers(i64::from(response.stats.incomplete) as i32),
            seeders: NumberOfPeers(i64::from(response.stats.complete) as i32),
            peers: response
                .peers
                .iter()
                .filter_map(|peer| {
                    if let IpAddr::V6(ip) = peer.peer_addr.ip() {
                        Some(ResponsePeer::<Ipv6Addr> {
                            ip_address: ip,
                            port: Port(peer.peer_addr.port()),
                        })
                    } else {
                        None
                    }
                })
                .collect(),
        };

        debug!("udp announce response: {:#?}", announce_response);

        Ok(Response::from(announce_response))
    }
}

/// It handles the `Scrape` request. Refer to [`Scrape`](crate::servers::udp#scrape)
/// request for more information.
///
/// # Errors
///
/// This function does not ever return an error.
pub async fn handle_scrape(remote_addr: SocketAddr, request: &ScrapeRequest, tracker: &Tracker) -> Result<Response, Error> {
    debug!("udp scrape request: {:#?}", request);

    // Convert from aquatic infohashes
    let mut info_hashes = vec![];
    for info_hash in &request.info_hashes {
        info_hashes.push(InfoHash(info_hash.0));
    }

    let scrape_data = if tracker.requires_authentication() {
        ScrapeData::zeroed(&info_hashes)
    } else {
        tracker.scrape(&info_hashes).await
    };

    let mut torrent_stats: Vec<TorrentScrapeStatistics> = Vec::new();

    for file in &scrape_data.files {
        let swarm_metadata = file.1;

        #[allow(clippy::cast_possible_truncation)]
        let scrape_entry = {
            TorrentScrapeStatistics {
                seeders: NumberOfPeers(i64::from(swarm_metadata.complete) as i32),
                completed: NumberOfDownloads(i64::from(swarm_metadata.downloaded) as i32),
                leechers: NumberOfPeers(i64::from(swarm_metadata.incomplete) as i32),
            }
        };

        torrent_stats.push(scrape_entry);
    }

    let response = ScrapeResponse {
        transaction_id: request.transaction_id,
        torrent_stats,
    };

    debug!("udp scrape response: {:#?}", response);

    Ok(Response::from(response))
}

fn handle_error(e: &Error, transaction_id: TransactionId) -> Response {
    let message = e.to_string();
    Response::from(ErrorResponse {
        transaction_id,
        message: message.into(),
    })
}

/// An identifier for a request.
#[derive(Debug, Clone)]
pub struct RequestId(Uuid);

impl RequestId {
    fn make(_request: &RawRequest) -> RequestId {
        RequestId(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
