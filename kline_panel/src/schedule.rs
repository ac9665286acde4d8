use std::time::{Duration, Instant};

pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// Nothing has been fetched yet.
    Startup,
    Periodic,
    /// The user picked another interval.
    Manual,
}

/// Decides when the next fetch goes out.
///
/// One repeating period, reset both by an expiry and by a manual interval
/// change. At most one fetch is in flight; while it is, expiries wait and a
/// manual request is remembered until the fetch completes.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    period: Duration,
    last_reset: Option<Instant>,
    pending_manual: bool,
    in_flight: Option<u64>,
}

impl RefreshScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_reset: None,
            pending_manual: false,
            in_flight: None,
        }
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Record a user-driven change: fetch as soon as possible and restart
    /// the period from now.
    pub fn request_manual(&mut self, now: Instant) {
        self.pending_manual = true;
        self.last_reset = Some(now);
    }

    /// Whether a fetch should be dispatched now. The caller must follow a
    /// `Some` with [`RefreshScheduler::started`].
    pub fn poll(&mut self, now: Instant) -> Option<RefreshReason> {
        if self.in_flight.is_some() {
            return None;
        }
        if self.pending_manual {
            return Some(RefreshReason::Manual);
        }
        match self.last_reset {
            None => Some(RefreshReason::Startup),
            Some(at) if now.saturating_duration_since(at) >= self.period => Some(RefreshReason::Periodic),
            Some(_) => None,
        }
    }

    pub fn started(&mut self, id: u64, reason: RefreshReason, now: Instant) {
        self.in_flight = Some(id);
        self.pending_manual = false;
        if reason != RefreshReason::Manual {
            self.last_reset = Some(now);
        }
    }

    /// Clear the in-flight marker if `id` is the outstanding fetch.
    pub fn finished(&mut self, id: u64) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Time left until the next periodic refresh.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_reset {
            None => Duration::ZERO,
            Some(at) => self.period.saturating_sub(now.saturating_duration_since(at)),
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_PERIOD)
    }
}
