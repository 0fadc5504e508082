//! `WebTorrent` signaling job starter.
//!
//! Starts a `WebSocket` endpoint at `config.bind_address` that speaks the `WebTorrent` JSON
//! announce/scrape protocol and relays `WebRTC` offers/answers between connected peers.
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;
use torrust_tracker_configuration::WebSocketTracker;
use tracing::{info, warn};

use crate::core;
use crate::servers::webtorrent::signaling::{self, SignalingState};

#[must_use]
pub fn start_job(config: &WebSocketTracker, tracker: Arc<core::Tracker>) -> JoinHandle<()> {
    let bind_address: SocketAddr = config
        .bind_address
        .parse()
        .expect("it should have a valid websocket tracker bind address");
    let state = SignalingState::new(tracker, config.max_offers_per_peer);

    tokio::spawn(async move {
        let app = Router::new().route("/announce", get(upgrade)).with_state(state);

        info!(target: "WebSocket Tracker", "Starting on: ws://{bind_address}/announce");

        let listener = match tokio::net::TcpListener::bind(bind_address).await {
            Ok(listener) => listener,
            Err(err) => {
                warn!(target: "WebSocket Tracker", "Failed to bind {bind_address}: {err}");
                return;
            }
        };

        if let Err(err) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await {
            warn!(target: "WebSocket Tracker", "Stopped: {err}");
        }
    })
}

async fn upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(state): State<SignalingState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| signaling::handle_socket(socket, remote, state))
}
