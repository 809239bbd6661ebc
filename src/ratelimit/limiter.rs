//! Core admission limiter implementation.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

use super::counter::{ClientWindowState, Decision, WindowConfig};
use super::identity::ClientId;

/// Per-client fixed-window admission limiter.
///
/// The registry is a concurrent map; each entry carries its own lock, so
/// requests from unrelated clients never contend. This struct is meant to be
/// constructed once and shared behind an `Arc`.
pub struct AdmissionLimiter {
    config: WindowConfig,
    /// Window state indexed by client identity
    clients: DashMap<ClientId, Arc<Mutex<ClientWindowState>>>,
}

impl AdmissionLimiter {
    /// Create a new limiter.
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            clients: DashMap::new(),
        }
    }

    /// The window configuration applied to every client.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Record a request from `client` and decide whether to admit it.
    pub fn check_and_record(&self, client: &ClientId) -> Decision {
        self.check_and_record_at(client, Utc::now())
    }

    /// Same as [`check_and_record`](Self::check_and_record) with an explicit clock reading.
    pub fn check_and_record_at(&self, client: &ClientId, now: DateTime<Utc>) -> Decision {
        let (decision, count) = loop {
            let entry = self.entry(client, now);
            let mut state = entry.lock();

            // Dropped by the sweeper between lookup and lock; the registry
            // holds a fresh entry (or none) now.
            if state.is_evicted() {
                continue;
            }

            let decision = state.record(now, &self.config);
            break (decision, state.count());
        };

        trace!(
            client = %client,
            count,
            admitted = decision.admitted,
            "Admission decision"
        );

        decision
    }

    /// Atomically get or create the state for a client.
    fn entry(&self, client: &ClientId, now: DateTime<Utc>) -> Arc<Mutex<ClientWindowState>> {
        if let Some(existing) = self.clients.get(client) {
            return Arc::clone(existing.value());
        }

        let mut created = false;
        let state = {
            let entry = self.clients.entry(client.clone()).or_insert_with(|| {
                created = true;
                Arc::new(Mutex::new(ClientWindowState::new(now)))
            });
            Arc::clone(entry.value())
        };

        if created {
            debug!(client = %client, "Creating new client window");
        }
        state
    }

    /// Remove every client whose window has elapsed.
    ///
    /// A removed client is indistinguishable from one whose window would be
    /// reset on its next request. Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Same as [`sweep`](Self::sweep) with an explicit clock reading.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, entry| {
            let mut state = entry.lock();
            if state.is_expired(now, &self.config) {
                state.mark_evicted();
                false
            } else {
                true
            }
        });
        before.saturating_sub(self.clients.len())
    }

    /// Requests recorded for a client in its current window.
    ///
    /// Returns `None` if the client has no window.
    pub fn current_count(&self, client: &ClientId) -> Option<u64> {
        self.clients.get(client).map(|e| e.value().lock().count())
    }

    /// Number of clients with a window in the registry.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Drop all client windows.
    pub fn clear(&self) {
        self.clients.retain(|_, entry| {
            entry.lock().mark_evicted();
            false
        });
    }
}

impl Default for AdmissionLimiter {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}
