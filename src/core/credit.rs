//! Per-(user, torrent) credit accounting, layered on top of the swarm registry.
//!
//! Every accepted announce from an authenticated peer is diffed against its running session:
//! the delta in cumulative `uploaded`/`downloaded` since the last announce is booked as a
//! [`external::CreditTransaction`] through the [`external::Ledger`]. Sessions reset on a counter
//! decrease (client restart) or after a configured period of silence, per
//! [§4.6](crate::core) of the accounting design this module implements.
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use torrust_tracker_clock::clock::Time;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::DurationSinceUnixEpoch;
use tracing::warn;

use crate::core::external::{
    self, CreditTransaction, Ledger, Observability, ObservabilityEvent, TransactionKind, UserId, UserClass,
};
use crate::CurrentClock;

/// Default reward rate credited on the upload side: 1x raw bytes.
pub const DEFAULT_UPLOAD_REWARD_RATE: f64 = 1.0;

/// Default session reset threshold: 30 minutes of silence starts a new session.
pub const DEFAULT_SESSION_RESET_THRESHOLD: Duration = Duration::from_secs(30 * 60);

/// Default link-capacity ceiling used by the cheating heuristic, in bytes/second.
pub const DEFAULT_LINK_CAPACITY_BYTES_PER_SEC: u64 = 125_000_000 / 8; // ~125 Mbps

#[derive(Debug, Clone, Copy)]
struct Session {
    last_uploaded: u64,
    last_downloaded: u64,
    last_announce: DurationSinceUnixEpoch,
    swarm_peer_count_at_last_announce: usize,
}

impl Session {
    fn fresh(uploaded: u64, downloaded: u64, now: DurationSinceUnixEpoch, swarm_peer_count: usize) -> Self {
        Self {
            last_uploaded: uploaded,
            last_downloaded: downloaded,
            last_announce: now,
            swarm_peer_count_at_last_announce: swarm_peer_count,
        }
    }
}

/// Configuration knobs for [`CreditEngine`], distinct from the swarm registry's policy.
#[derive(Debug, Clone, Copy)]
pub struct CreditPolicy {
    pub session_reset_threshold: Duration,
    pub upload_reward_rate: f64,
    pub link_capacity_bytes_per_sec: u64,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            session_reset_threshold: DEFAULT_SESSION_RESET_THRESHOLD,
            upload_reward_rate: DEFAULT_UPLOAD_REWARD_RATE,
            link_capacity_bytes_per_sec: DEFAULT_LINK_CAPACITY_BYTES_PER_SEC,
        }
    }
}

/// Tracks one session per `(user_id, info_hash)` and writes deltas through the ledger.
pub struct CreditEngine {
    policy: CreditPolicy,
    sessions: Mutex<HashMap<(UserId, InfoHash), Session>>,
    ledger: std::sync::Arc<dyn Ledger>,
    observability: std::sync::Arc<dyn Observability>,
}

impl CreditEngine {
    #[must_use]
    pub fn new(policy: CreditPolicy, ledger: std::sync::Arc<dyn Ledger>, observability: std::sync::Arc<dyn Observability>) -> Self {
        Self {
            policy,
            sessions: Mutex::new(HashMap::new()),
            ledger,
            observability,
        }
    }

    /// Diffs one announce against the running session for `(user, info_hash)`, books the
    /// resulting deltas at `user_class`'s download multiplier, and writes them through the
    /// ledger. Never fails the caller: ledger errors are logged and swallowed.
    pub async fn record_announce(
        &self,
        user_id: UserId,
        user_class: UserClass,
        info_hash: &InfoHash,
        uploaded: u64,
        downloaded: u64,
        swarm_peer_count: usize,
    ) {
        let now = CurrentClock::now();
        let key = (user_id, *info_hash);

        let (delta_upload, delta_download, is_new_session) = {
            let mut sessions = self.sessions.lock().unwrap();

            match sessions.get(&key).copied() {
                None => {
                    sessions.insert(key, Session::fresh(uploaded, downloaded, now, swarm_peer_count));
                    (0, 0, true)
                }
                Some(session) => {
                    let silence = now.saturating_sub(session.last_announce);
                    let counters_decreased = uploaded < session.last_uploaded || downloaded < session.last_downloaded;
                    let session_expired = silence > self.policy.session_reset_threshold;

                    if counters_decreased || session_expired {
                        sessions.insert(key, Session::fresh(uploaded, downloaded, now, swarm_peer_count));
                        (0, 0, true)
                    } else {
                        let delta_upload = uploaded.saturating_sub(session.last_uploaded);
                        let delta_download = downloaded.saturating_sub(session.last_downloaded);
                        sessions.insert(key, Session::fresh(uploaded, downloaded, now, swarm_peer_count));
                        (delta_upload, delta_download, false)
                    }
                }
            }
        };

        if !is_new_session {
            self.check_cheating_heuristics(user_id, info_hash, delta_upload, swarm_peer_count);
        }

        if delta_upload > 0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bytes = (delta_upload as f64 * self.policy.upload_reward_rate) as u64;
            self.write_transaction(user_id, info_hash, TransactionKind::Upload, bytes, self.policy.upload_reward_rate)
                .await;
        }

        if delta_download > 0 {
            let multiplier = user_class.download_multiplier();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bytes = (delta_download as f64 * multiplier) as u64;
            self.write_transaction(user_id, info_hash, TransactionKind::Download, bytes, multiplier)
                .await;
        }
    }

    /// Drops the session for `(user, info_hash)`, e.g. when the peer stops or is evicted.
    pub fn close_session(&self, user_id: UserId, info_hash: &InfoHash) {
        self.sessions.lock().unwrap().remove(&(user_id, *info_hash));
    }

    fn check_cheating_heuristics(&self, user_id: UserId, info_hash: &InfoHash, delta_upload: u64, swarm_peer_count: usize) {
        if delta_upload > 0 && swarm_peer_count <= 1 {
            self.observability.emit(ObservabilityEvent::ImplausibleUploadSwarmSize {
                user_id,
                info_hash: *info_hash,
            });
        }

        // A 10-minute announce interval is the usual cadence; treat it as the elapsed window for
        // the link-capacity ceiling since sessions don't track a precise inter-announce delta here.
        let plausible_ceiling = self.policy.link_capacity_bytes_per_sec * 600;
        if delta_upload > plausible_ceiling {
            self.observability.emit(ObservabilityEvent::ImplausibleUploadLinkCapacity {
                user_id,
                info_hash: *info_hash,
            });
        }
    }

    async fn write_transaction(&self, user_id: UserId, info_hash: &InfoHash, kind: TransactionKind, bytes: u64, multiplier: f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let multiplier_applied = (multiplier * 1000.0).round() as u32;

        let transaction = CreditTransaction {
            user_id,
            info_hash: *info_hash,
            kind,
            bytes,
            multiplier_applied,
            timestamp: CurrentClock::now(),
        };

        for attempt in 0..3u8 {
            match self.ledger.write_transaction(transaction).await {
                Ok(()) => return,
                Err(external::LedgerError::Permanent) => {
                    warn!("dropping credit transaction after permanent ledger error: {transaction:?}");
                    return;
                }
                Err(external::LedgerError::Transient) => {
                    warn!("transient ledger error writing {transaction:?}, attempt {attempt}");
                }
            }
        }

        warn!("dropping credit transaction after retries exhausted: {transaction:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use torrust_tracker_clock::clock;
    use torrust_tracker_clock::clock::stopped::Stopped as _;

    use super::*;

    struct RecordingLedger {
        transactions: std::sync::Mutex<Vec<CreditTransaction>>,
    }

    impl RecordingLedger {
        fn new() -> Self {
            Self {
                transactions: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Ledger for RecordingLedger {
        async fn write_transaction(&self, transaction: CreditTransaction) -> Result<(), external::LedgerError> {
            self.transactions.lock().unwrap().push(transaction);
            Ok(())
        }
    }

    struct CountingObservability {
        flags: AtomicUsize,
    }

    impl Observability for CountingObservability {
        fn emit(&self, _event: ObservabilityEvent) {
            self.flags.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample_info_hash() -> InfoHash {
        use std::str::FromStr;
        InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap()
    }

    #[tokio::test]
    async fn scenario_d_credit_delta_across_three_announces() {
        clock::Stopped::local_set_to_unix_epoch();

        let ledger = Arc::new(RecordingLedger::new());
        let observability = Arc::new(CountingObservability { flags: AtomicUsize::new(0) });
        let engine = CreditEngine::new(CreditPolicy::default(), ledger.clone(), observability);

        let user_id = UserId(1);
        let info_hash = sample_info_hash();

        engine.record_announce(user_id, UserClass::Regular, &info_hash, 0, 0, 2).await;
        clock::Stopped::local_add(&Duration::from_secs(10)).unwrap();
        engine.record_announce(user_id, UserClass::Regular, &info_hash, 1000, 500, 2).await;
        clock::Stopped::local_add(&Duration::from_secs(10)).unwrap();
        engine.record_announce(user_id, UserClass::Regular, &info_hash, 1000, 500, 2).await;

        let transactions = ledger.transactions.lock().unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, TransactionKind::Upload);
        assert_eq!(transactions[0].bytes, 1000);
        assert_eq!(transactions[1].kind, TransactionKind::Download);
        assert_eq!(transactions[1].bytes, 500);
    }

    #[tokio::test]
    async fn scenario_e_counter_decrease_starts_a_new_session_with_zero_delta() {
        clock::Stopped::local_set_to_unix_epoch();

        let ledger = Arc::new(RecordingLedger::new());
        let observability = Arc::new(CountingObservability { flags: AtomicUsize::new(0) });
        let engine = CreditEngine::new(CreditPolicy::default(), ledger.clone(), observability);

        let user_id = UserId(7);
        let info_hash = sample_info_hash();

        engine.record_announce(user_id, UserClass::Regular, &info_hash, 5000, 0, 2).await;
        engine.record_announce(user_id, UserClass::Regular, &info_hash, 1000, 0, 2).await;

        let transactions = ledger.transactions.lock().unwrap();
        assert!(transactions.is_empty(), "a restart must never emit a negative delta");
    }

    #[tokio::test]
    async fn download_multiplier_is_applied_per_user_class() {
        clock::Stopped::local_set_to_unix_epoch();

        let ledger = Arc::new(RecordingLedger::new());
        let observability = Arc::new(CountingObservability { flags: AtomicUsize::new(0) });
        let engine = CreditEngine::new(CreditPolicy::default(), ledger.clone(), observability);

        let user_id = UserId(9);
        let info_hash = sample_info_hash();

        engine.record_announce(user_id, UserClass::Newbie, &info_hash, 0, 0, 2).await;
        engine.record_announce(user_id, UserClass::Newbie, &info_hash, 0, 1000, 2).await;

        let transactions = ledger.transactions.lock().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].bytes, 2000, "newbies download at a 2x multiplier");
    }

    #[tokio::test]
    async fn session_silence_past_threshold_resets_with_zero_delta() {
        clock::Stopped::local_set_to_unix_epoch();

        let ledger = Arc::new(RecordingLedger::new());
        let observability = Arc::new(CountingObservability { flags: AtomicUsize::new(0) });
        let engine = CreditEngine::new(CreditPolicy::default(), ledger.clone(), observability);

        let user_id = UserId(3);
        let info_hash = sample_info_hash();

        engine.record_announce(user_id, UserClass::Regular, &info_hash, 100, 100, 2).await;
        clock::Stopped::local_add(&Duration::from_secs(31 * 60)).unwrap();
        engine.record_announce(user_id, UserClass::Regular, &info_hash, 2000, 2000, 2).await;

        let transactions = ledger.transactions.lock().unwrap();
        assert!(transactions.is_empty(), "silence past the reset threshold must start a fresh session");
    }

    #[tokio::test]
    async fn close_session_drops_tracked_state() {
        let ledger = Arc::new(RecordingLedger::new());
        let observability = Arc::new(CountingObservability { flags: AtomicUsize::new(0) });
        let engine = CreditEngine::new(CreditPolicy::default(), ledger, observability);

        let user_id = UserId(5);
        let info_hash = sample_info_hash();

        engine.record_announce(user_id, UserClass::Regular, &info_hash, 10, 10, 2).await;
        engine.close_session(user_id, &info_hash);

        assert!(engine.sessions.lock().unwrap().get(&(user_id, info_hash)).is_none());
    }
}
