//! Application jobs launchers.
//!
//! The main application setup has only two main stages:
//!
//! 1. Setup the domain layer: the core tracker.
//! 2. Launch all the application services as concurrent jobs.
//!
//! This modules contains all the functions needed to start those jobs.

use std::net::SocketAddr;
use std::panic::Location;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use torrust_tracker_located_error::{DynError, LocatedError};
use tracing::{info, instrument};
pub mod health_check_api;
pub mod http_tracker;
pub mod torrent_cleanup;
pub mod udp_tracker;
pub mod websocket_tracker;

/// Sent back by a server launcher once it is actually listening.
#[derive(Debug, Copy, Clone)]
pub struct Started {
    pub address: SocketAddr,
}

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Timeout elapsed for Task")]
    TimeoutError { err: Arc<tokio::time::error::Elapsed> },
    #[error("Error From Service: {err}")]
    ServiceError { err: crate::servers::service::Error },

    #[error("tls config missing")]
    MissingTlsConfig { location: &'static Location<'static> },

    #[error("bad tls config: {source}")]
    BadTlsConfig {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(e: tokio::time::error::Elapsed) -> Self {
        Error::TimeoutError { err: e.into() }
    }
}

impl From<crate::servers::service::Error> for Error {
    fn from(err: crate::servers::service::Error) -> Self {
        Error::ServiceError { err }
    }
}

/// It builds a TLS config from the optional certificate/key paths, if TLS is enabled.
///
/// Returns `None` when `ssl_enabled` is false. Returns `Some(Err(_))` when TLS is enabled
/// but the paths are missing or the PEM files can't be loaded.
#[instrument(ret)]
pub async fn make_rust_tls(ssl_enabled: bool, cert: &Option<String>, key: &Option<String>) -> Option<Result<RustlsConfig, Error>> {
    if !ssl_enabled {
        return None;
    }

    let (Some(cert), Some(key)) = (cert, key) else {
        return Some(Err(Error::MissingTlsConfig {
            location: Location::caller(),
        }));
    };

    info!("Using https: cert path: {cert}.");
    info!("Using https: key path: {key}.");

    Some(
        RustlsConfig::from_pem_file(cert, key)
            .await
            .map_err(|err| Error::BadTlsConfig {
                source: (Arc::new(err) as DynError).into(),
            }),
    )
}
