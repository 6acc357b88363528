//! Concurrent, expiring client → lane assignment store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::assignments::clock::{Clock, SystemClock};
use crate::config::AssignmentConfig;
use crate::lanes::Lane;
use crate::observability::metrics;

/// A client's sticky lane choice.
///
/// Installed as a whole value and never mutated afterwards, so a reader sees
/// either the previous assignment or the new one.
#[derive(Debug, Clone)]
pub struct Assignment {
    lane: Arc<Lane>,
    /// `None` means the assignment never expires.
    expires_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn lane(&self) -> &Arc<Lane> {
        &self.lane
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Stale at and after the expiration instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Thread-safe store of assignments keyed by client identifier.
pub struct AssignmentStore {
    entries: DashMap<String, Assignment>,
    /// Retention used when `set` is given a zero ttl. `None` keeps such
    /// assignments until they are replaced or deleted.
    default_ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl AssignmentStore {
    /// Create a store on the system clock.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Option<Duration>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: default_ttl.filter(|ttl| !ttl.is_zero()),
            clock,
        }
    }

    pub fn from_config(config: &AssignmentConfig) -> Self {
        Self::new(config.default_ttl())
    }

    /// Install or replace the assignment for `client_key`.
    ///
    /// A zero `ttl` applies the store's default retention. Returns the
    /// resulting expiration instant.
    pub fn set(&self, client_key: &str, lane: Arc<Lane>, ttl: Duration) -> Option<DateTime<Utc>> {
        let expires_at = self.expiry_for(ttl);
        self.entries
            .insert(client_key.to_string(), Assignment { lane, expires_at });
        metrics::record_active_assignments(self.entries.len());
        expires_at
    }

    /// The assigned lane, if an unexpired assignment exists.
    pub fn get(&self, client_key: &str) -> Option<Arc<Lane>> {
        self.get_with_expiration(client_key)
            .map(|assignment| assignment.lane)
    }

    /// The current assignment including its expiration instant.
    ///
    /// An expired entry found here is evicted, unless a concurrent `set`
    /// has already replaced it with a live one.
    pub fn get_with_expiration(&self, client_key: &str) -> Option<Assignment> {
        let now = self.clock.now();

        let expired = match self.entries.get(client_key) {
            Some(entry) if !entry.is_expired_at(now) => return Some(entry.value().clone()),
            Some(_) => true,
            None => false,
        };

        if expired
            && self
                .entries
                .remove_if(client_key, |_, assignment| assignment.is_expired_at(now))
                .is_some()
        {
            metrics::record_active_assignments(self.entries.len());
        }
        None
    }

    /// Remove any assignment for `client_key`. Returns whether one existed.
    pub fn delete(&self, client_key: &str) -> bool {
        let removed = self.entries.remove(client_key).is_some();
        if removed {
            metrics::record_active_assignments(self.entries.len());
        }
        removed
    }

    /// Physically remove every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, assignment| {
            let keep = !assignment.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        metrics::record_active_assignments(self.entries.len());
        removed
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expiry_for(&self, ttl: Duration) -> Option<DateTime<Utc>> {
        let ttl = if ttl.is_zero() { self.default_ttl? } else { ttl };
        // Out of range durations never expire.
        let ttl = chrono::Duration::from_std(ttl).ok()?;
        self.clock.now().checked_add_signed(ttl)
    }
}

impl Default for AssignmentStore {
    fn default() -> Self {
        Self::new(None)
    }
}
