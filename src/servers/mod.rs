//! Servers. Services that can be started and stopped.
pub mod custom_axum_server;
pub mod health_check_api;
pub mod http;
pub mod registar;
pub mod signals;
pub mod udp;
pub mod webtorrent;
