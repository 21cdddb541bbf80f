//! Gate for the periodic timeline refresh.
//!
//! The timeline page re-reads its blocks on a timer. A refresh that lands
//! while someone is typing in a block form, or mid-scroll, is disruptive,
//! so the poll is skipped while the user is active or editing. Skipping is
//! harmless: writes never go through the poller.
//!
//! The gate holds no clock of its own; callers pass `now`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Time between refresh attempts.
    pub interval: Duration,
    /// Recent input (mouse, scroll, key) within this window defers a refresh.
    pub quiet_period: Duration,
    /// An editing flag is ignored once it is this old.
    pub editing_ttl: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::minutes(5),
            quiet_period: Duration::seconds(30),
            editing_ttl: Duration::minutes(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshGate {
    policy: RefreshPolicy,
    last_refresh: DateTime<Utc>,
    last_activity: Option<DateTime<Utc>>,
    editing_since: Option<DateTime<Utc>>,
}

impl RefreshGate {
    pub fn new(policy: RefreshPolicy, now: DateTime<Utc>) -> Self {
        Self {
            policy,
            last_refresh: now,
            last_activity: None,
            editing_since: None,
        }
    }

    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        self.last_activity = Some(now);
    }

    pub fn begin_editing(&mut self, now: DateTime<Utc>) {
        self.editing_since = Some(now);
    }

    pub fn end_editing(&mut self) {
        self.editing_since = None;
    }

    pub fn is_editing(&self, now: DateTime<Utc>) -> bool {
        self.editing_since
            .is_some_and(|since| now - since < self.policy.editing_ttl)
    }

    /// True when the interval has elapsed and the user is idle.
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        if now - self.last_refresh < self.policy.interval {
            return false;
        }
        if self.is_editing(now) {
            debug!("refresh deferred: editing");
            return false;
        }
        if self
            .last_activity
            .is_some_and(|at| now - at < self.policy.quiet_period)
        {
            debug!("refresh deferred: recent activity");
            return false;
        }
        true
    }

    pub fn mark_refreshed(&mut self, now: DateTime<Utc>) {
        self.last_refresh = now;
    }
}
