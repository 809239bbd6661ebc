//! Per-client fixed-window counter.

use chrono::{DateTime, Duration, Utc};

/// Parameters shared by every client window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Maximum requests admitted in one window
    pub limit: u64,
    /// Length of a window
    pub window: Duration,
}

impl WindowConfig {
    /// Create a window configuration from a request budget and a length in seconds.
    pub fn new(limit: u64, window_secs: u64) -> Self {
        let secs = i64::try_from(window_secs).unwrap_or(i64::MAX);
        Self {
            limit,
            window: Duration::try_seconds(secs).unwrap_or(Duration::MAX),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(100, 60)
    }
}

/// The admit/reject verdict plus quota metadata for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request fits in the client's budget
    pub admitted: bool,
    /// The configured budget for one window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

/// Request accounting for a single client identity.
///
/// Never shared without a lock; see [`super::AdmissionLimiter`].
#[derive(Debug, Clone)]
pub struct ClientWindowState {
    /// Requests observed in the current window
    count: u64,
    /// When the current window began
    window_start: DateTime<Utc>,
    /// Set once the sweeper has dropped this state from the registry
    evicted: bool,
}

impl ClientWindowState {
    /// Create an empty window beginning at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_start: now,
            evicted: false,
        }
    }

    /// Record one request at `now` and decide whether it is admitted.
    pub fn record(&mut self, now: DateTime<Utc>, config: &WindowConfig) -> Decision {
        if self.is_expired(now, config) {
            self.count = 0;
            self.window_start = now;
        }

        self.count = self.count.saturating_add(1);

        Decision {
            admitted: self.count <= config.limit,
            limit: config.limit,
            remaining: config.limit.saturating_sub(self.count),
            reset_at: self.reset_at(config),
        }
    }

    /// Whether the window that began at `window_start` has fully elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>, config: &WindowConfig) -> bool {
        now.signed_duration_since(self.window_start) >= config.window
    }

    /// When the current window ends.
    pub fn reset_at(&self, config: &WindowConfig) -> DateTime<Utc> {
        self.window_start
            .checked_add_signed(config.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Requests observed in the current window.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// When the current window began.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    pub(crate) fn is_evicted(&self) -> bool {
        self.evicted
    }

    pub(crate) fn mark_evicted(&mut self) {
        self.evicted = true;
    }
}
