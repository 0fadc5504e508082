//! Repository contracts the core consumes but never implements.
//!
//! The tracker owns no durable storage: user accounts, torrent catalog metadata and credit
//! ledgers all live behind these traits. Production wiring is expected to back them with real
//! stores (a user service, a torrent catalog, an accounting ledger); the default implementations
//! in this module are permissive stand-ins used for public-mode operation and tests, not
//! production backends.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use torrust_tracker_primitives::info_hash::InfoHash;

/// Opaque user identity as published by the user repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's standing, used by the credit engine to pick a download multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserClass {
    /// Newly registered accounts: download multiplier 2x to help them reach ratio.
    Newbie,
    /// Accounts in good standing: multiplier 1x.
    Regular,
    /// Long-tenured or high-contribution accounts: multiplier 0.5x.
    Elite,
}

impl UserClass {
    /// The download-side credit multiplier published for this class.
    #[must_use]
    pub fn download_multiplier(self) -> f64 {
        match self {
            UserClass::Newbie => 2.0,
            UserClass::Regular => 1.0,
            UserClass::Elite => 0.5,
        }
    }
}

/// What the user repository returns for a resolved `auth_token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedUser {
    pub user_id: UserId,
    pub user_class: UserClass,
    pub is_banned: bool,
}

/// What the torrent repository returns for a looked-up `info_hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorrentLookup {
    pub is_active: bool,
    pub is_private: bool,
    pub owner_id: Option<UserId>,
}

/// Resolves an `auth_token` to the user identity the credit engine books transactions against.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn resolve_token(&self, token: &str) -> Option<ResolvedUser>;
}

/// Looks up torrent catalog metadata, used for private-tracker authorization.
#[async_trait]
pub trait TorrentRepo: Send + Sync {
    async fn lookup(&self, info_hash: &InfoHash) -> Option<TorrentLookup>;
}

/// One side of a credit session delta, as booked by [`super::credit::CreditEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Upload,
    Download,
}

/// An accounting event produced by the credit engine for one announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditTransaction {
    pub user_id: UserId,
    pub info_hash: InfoHash,
    pub kind: TransactionKind,
    pub bytes: u64,
    pub multiplier_applied: u32, // multiplier x1000, to keep the type Eq/Copy
    pub timestamp: torrust_tracker_primitives::DurationSinceUnixEpoch,
}

/// Fire-and-forget sink for credit transactions.
///
/// Failures are retried a bounded number of times by the caller and then dropped with a log
/// line: ledger persistence never blocks or fails an announce.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn write_transaction(&self, transaction: CreditTransaction) -> Result<(), LedgerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger backend unavailable")]
    Transient,
    #[error("ledger rejected the transaction")]
    Permanent,
}

/// Suspicion flags and eviction notices raised for monitoring, never enforced by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityEvent {
    /// `Δupload > 0` but no other peer in the swarm could plausibly have received the bytes.
    ImplausibleUploadSwarmSize { user_id: UserId, info_hash: InfoHash },
    /// `Δupload` exceeded the configured link-capacity ceiling for the elapsed time.
    ImplausibleUploadLinkCapacity { user_id: UserId, info_hash: InfoHash },
    /// A peer was evicted from a swarm to make room under the per-swarm cap.
    PeerEvicted { info_hash: InfoHash },
}

pub trait Observability: Send + Sync {
    fn emit(&self, event: ObservabilityEvent);
}

/// Permissive [`UserRepo`] used in public mode: every token resolves to a regular, unbanned user
/// derived deterministically from the token's bytes.
pub struct AllowAllUserRepo;

#[async_trait]
impl UserRepo for AllowAllUserRepo {
    async fn resolve_token(&self, token: &str) -> Option<ResolvedUser> {
        Some(ResolvedUser {
            user_id: UserId(seahash(token)),
            user_class: UserClass::Regular,
            is_banned: false,
        })
    }
}

/// Permissive [`TorrentRepo`] used in public mode: every torrent is active and public.
pub struct OpenTorrentRepo;

#[async_trait]
impl TorrentRepo for OpenTorrentRepo {
    async fn lookup(&self, _info_hash: &InfoHash) -> Option<TorrentLookup> {
        Some(TorrentLookup {
            is_active: true,
            is_private: false,
            owner_id: None,
        })
    }
}

/// [`Ledger`] that discards every transaction. Used when no accounting backend is wired in.
pub struct NoopLedger;

#[async_trait]
impl Ledger for NoopLedger {
    async fn write_transaction(&self, _transaction: CreditTransaction) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// [`Observability`] that only logs at debug level. Used when no monitoring backend is wired in.
pub struct TracingObservability;

impl Observability for TracingObservability {
    fn emit(&self, event: ObservabilityEvent) {
        tracing::debug!("observability event: {event:?}");
    }
}

/// A simple, dependency-free string hash used to derive a stable [`UserId`] from a raw token in
/// [`AllowAllUserRepo`]. Not cryptographic; only used so the same token maps to the same user.
fn seahash(value: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in value.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

#[must_use]
pub fn default_user_repo() -> Arc<dyn UserRepo> {
    Arc::new(AllowAllUserRepo)
}

#[must_use]
pub fn default_torrent_repo() -> Arc<dyn TorrentRepo> {
    Arc::new(OpenTorrentRepo)
}

#[must_use]
pub fn default_ledger() -> Arc<dyn Ledger> {
    Arc::new(NoopLedger)
}

#[must_use]
pub fn default_observability() -> Arc<dyn Observability> {
    Arc::new(TracingObservability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allow_all_user_repo_resolves_every_token() {
        let repo = AllowAllUserRepo;
        let resolved = repo.resolve_token("any-token").await.expect("should resolve");
        assert_eq!(resolved.user_class, UserClass::Regular);
        assert!(!resolved.is_banned);
    }

    #[tokio::test]
    async fn allow_all_user_repo_is_deterministic() {
        let repo = AllowAllUserRepo;
        let a = repo.resolve_token("same-token").await.unwrap();
        let b = repo.resolve_token("same-token").await.unwrap();
        assert_eq!(a.user_id, b.user_id);
    }

    #[test]
    fn user_class_multipliers_match_published_rates() {
        assert!((UserClass::Newbie.download_multiplier() - 2.0).abs() < f64::EPSILON);
        assert!((UserClass::Regular.download_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((UserClass::Elite.download_multiplier() - 0.5).abs() < f64::EPSILON);
    }
}
