#![forbid(unsafe_code)]

//! Refresh scheduling.
//!
//! Refresh requests are coalesced into one pending flag and consumed by
//! the periodic tick, so any burst of configuration changes or layout
//! events costs at most one refresh per tick.
//!
//! # Decision rule
//!
//! On each tick at `now`:
//!
//! 1) A deferred request whose deadline has passed becomes pending.
//! 2) Nothing pending: no refresh.
//! 3) Less than `min_interval` since the last refresh: stay pending.
//! 4) Otherwise consume the flag and refresh.
//!
//! A deferred request re-armed before it fires moves its deadline to the
//! later of the two, so the refresh lands after the last disruption in a
//! burst has had time to settle.

use std::time::Duration;

use web_time::Instant;

/// Coalescing refresh scheduler driven by an external tick.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    pending: bool,
    deferred_until: Option<Instant>,
    min_interval: Duration,
    last_refresh: Option<Instant>,
    requests: u64,
    coalesced: u64,
    throttled: u64,
}

impl RefreshScheduler {
    /// Scheduler allowing at most one refresh per `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            pending: false,
            deferred_until: None,
            min_interval,
            last_refresh: None,
            requests: 0,
            coalesced: 0,
            throttled: 0,
        }
    }

    /// Mark a refresh as needed on the next tick.
    pub fn schedule_update(&mut self) {
        self.requests += 1;
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    /// Request a refresh no earlier than `now + delay`.
    pub fn schedule_after(&mut self, delay: Duration, now: Instant) {
        let due = now + delay;
        self.requests += 1;
        self.deferred_until = Some(match self.deferred_until {
            Some(existing) => {
                self.coalesced += 1;
                existing.max(due)
            }
            None => due,
        });
    }

    /// Consume the pending flag if a refresh should run at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if let Some(due) = self.deferred_until
            && now >= due
        {
            self.deferred_until = None;
            if self.pending {
                self.coalesced += 1;
            }
            self.pending = true;
        }

        if !self.pending {
            return false;
        }

        if let Some(last) = self.last_refresh
            && now.saturating_duration_since(last) < self.min_interval
        {
            self.throttled += 1;
            return false;
        }

        self.pending = false;
        self.last_refresh = Some(now);
        true
    }

    /// Time until a refresh could run, `None` when nothing is requested.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let throttle = self
            .last_refresh
            .map(|last| (last + self.min_interval).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO);
        let immediate = self.pending.then_some(throttle);
        let deferred = self
            .deferred_until
            .map(|due| due.saturating_duration_since(now).max(throttle));
        match (immediate, deferred) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop every outstanding request.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.deferred_until = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn has_deferred(&self) -> bool {
        self.deferred_until.is_some()
    }

    #[inline]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Requests absorbed into an already outstanding one.
    #[inline]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    #[inline]
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Ticks that found a request but were inside the throttle window.
    #[inline]
    pub fn throttled_count(&self) -> u64 {
        self.throttled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(66);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_pending_nothing_due() {
        let mut s = RefreshScheduler::new(MIN);
        assert!(!s.take_due(Instant::now()));
        assert_eq!(s.time_until_due(Instant::now()), None);
    }

    #[test]
    fn burst_coalesces_to_one_refresh() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        for _ in 0..10 {
            s.schedule_update();
        }
        assert!(s.take_due(t0));
        assert!(!s.take_due(t0 + ms(100)));
        assert_eq!(s.coalesced_count(), 9);
        assert_eq!(s.request_count(), 10);
    }

    #[test]
    fn throttle_keeps_request_pending() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_update();
        assert!(s.take_due(t0));

        s.schedule_update();
        assert!(!s.take_due(t0 + ms(10)));
        assert!(s.is_pending());
        assert_eq!(s.throttled_count(), 1);
        assert!(s.take_due(t0 + ms(70)));
    }

    #[test]
    fn deferred_fires_after_delay() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_after(ms(300), t0);
        assert!(!s.take_due(t0 + ms(100)));
        assert!(!s.take_due(t0 + ms(299)));
        assert!(s.take_due(t0 + ms(300)));
        assert!(!s.has_deferred());
    }

    #[test]
    fn rearming_defers_to_latest() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_after(ms(300), t0);
        s.schedule_after(ms(300), t0 + ms(200));
        assert!(!s.take_due(t0 + ms(350)));
        assert!(s.take_due(t0 + ms(500)));
    }

    #[test]
    fn immediate_and_deferred_are_independent() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_after(ms(300), t0);
        s.schedule_update();
        assert!(s.take_due(t0));
        assert!(s.has_deferred());
        assert!(s.take_due(t0 + ms(300)));
    }

    #[test]
    fn time_until_due_reports_nearest() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_after(ms(300), t0);
        assert_eq!(s.time_until_due(t0), Some(ms(300)));
        s.schedule_update();
        assert_eq!(s.time_until_due(t0), Some(Duration::ZERO));
    }

    #[test]
    fn cancel_clears_everything() {
        let mut s = RefreshScheduler::new(MIN);
        let t0 = Instant::now();
        s.schedule_update();
        s.schedule_after(ms(10), t0);
        s.cancel();
        assert!(!s.take_due(t0 + ms(20)));
    }
}
