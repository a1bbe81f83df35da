//! Content-digest cache for analytics snapshots.
//!
//! Recomputation is keyed by what the contact list *contains*, not by
//! which allocation holds it: equal content yields a cache hit even
//! across fresh clones of the list. Clock-sensitive fields (streak,
//! month window) refresh only when the content changes or the caller
//! invalidates explicitly.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sha2::{Digest, Sha256};

use crate::analytics::{compute_analytics, AnalyticsSnapshot};
use crate::types::Contact;

#[derive(Debug, Default)]
pub struct SnapshotCache {
    cached: Option<(String, AnalyticsSnapshot)>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic digest over the serialized contact list.
    pub fn digest(contacts: &[Contact]) -> String {
        let bytes = serde_json::to_vec(contacts).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }

    /// Return the snapshot for `contacts`, recomputing only when the
    /// content digest differs from the cached one.
    pub fn snapshot(
        &mut self,
        contacts: &[Contact],
        timezone: Tz,
        now: DateTime<Utc>,
    ) -> &AnalyticsSnapshot {
        let digest = Self::digest(contacts);
        let stale = self
            .cached
            .as_ref()
            .map(|(cached_digest, _)| *cached_digest != digest)
            .unwrap_or(true);
        if stale {
            log::debug!("analytics cache miss ({} contacts)", contacts.len());
            let snapshot = compute_analytics(contacts, timezone, now);
            self.cached = Some((digest, snapshot));
        }
        let (_, snapshot) = self.cached.as_ref().expect("cache populated above");
        snapshot
    }

    /// Drop the cached snapshot; the next read recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
