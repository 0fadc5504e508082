use std::sync::Arc;

use repository::skip_map_mutex_std::CrossbeamSkipList;
use torrust_tracker_clock::clock;

pub mod entry;
pub mod repository;

// Torrent Entry

pub type EntrySingle = entry::Torrent;
pub type EntryMutexStd = Arc<std::sync::Mutex<EntrySingle>>;

// Repo: lock-free `SkipMap` keyed by info_hash, each value a `Mutex`-guarded torrent entry.
//
// Reading the map (`get`, `get_paginated`, `get_metrics`) never blocks on another reader or
// on in-progress peer mutation of an unrelated torrent; only concurrent mutation of the *same*
// torrent's peer list is serialized, by the per-entry mutex.
pub type Torrents = CrossbeamSkipList<EntryMutexStd>;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
