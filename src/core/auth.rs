//! Authentication against the external user repository.
//!
//! Tracker keys (the HTTP `key` path parameter) carry an opaque `auth_token`, issued out-of-band
//! by the user repository. The [`Authenticator`] resolves that token on every private-mode
//! request, rejects unknown or banned users, and returns the resolved identity so the credit
//! engine can book transactions against it.
//!
//! Keys are never minted or stored by the tracker itself; that distinguishes this from a
//! self-issued API-key scheme.

use std::str::FromStr;
use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::external::{ResolvedUser, UserRepo};
use crate::shared::bit_torrent::common::AUTH_KEY_LENGTH;

/// The `auth_token` presented by a client, as lifted from the HTTP `key` path segment (or the
/// UDP/`WebSocket` equivalents).
///
/// It contains lower and uppercase letters and numbers. It's a 32-char string.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Display, Hash)]
pub struct Key(String);

impl Key {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Error returned when a key cannot be parsed from a string.
///
/// ```rust,no_run
/// use torrust_tracker::core::auth::Key;
/// use std::str::FromStr;
///
/// let key_string = "YZSl4lMZupRuOpSRC3krIKR5BPB14nrJ";
/// let key = Key::from_str(key_string);
///
/// assert!(key.is_ok());
/// assert_eq!(key.unwrap().to_string(), key_string);
/// ```
///
/// If the string does not contain a valid key, the parser function will return this error.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseKeyError;

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != AUTH_KEY_LENGTH {
            return Err(ParseKeyError);
        }

        Ok(Self(s.to_string()))
    }
}

/// Resolves [`Key`]s against a [`UserRepo`] and rejects banned users.
pub struct Authenticator {
    user_repo: Arc<dyn UserRepo>,
}

impl Authenticator {
    #[must_use]
    pub fn new(user_repo: Arc<dyn UserRepo>) -> Self {
        Self { user_repo }
    }

    /// Resolves `key` against the user repository.
    ///
    /// # Errors
    ///
    /// Will return `Error::UnableToReadKey` if the token is unknown to the repository, or
    /// `Error::UserBanned` if it resolves to a banned user.
    pub async fn authenticate(&self, key: &Key) -> Result<ResolvedUser, Error> {
        // The token value itself is never logged in full.
        debug!("authenticating key ending in: ...{}", &key.0[key.0.len().saturating_sub(4)..]);

        match self.user_repo.resolve_token(&key.0).await {
            None => Err(Error::UnableToReadKey { key: Box::new(key.clone()) }),
            Some(resolved) if resolved.is_banned => Err(Error::UserBanned { key: Box::new(key.clone()) }),
            Some(resolved) => Ok(resolved),
        }
    }
}

/// Authentication error, surfaced by a [`Authenticator`] as a protocol failure by the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not resolve key: {key}")]
    UnableToReadKey { key: Box<Key> },
    #[error("user for key {key} is banned")]
    UserBanned { key: Box<Key> },
}
