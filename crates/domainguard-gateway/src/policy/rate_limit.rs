//! Per-client fixed-window limiter (pre-credential DoS guard).
//!
//! - One entry per client identity: `{count, window_start}`.
//! - The expiry check and the increment run under the same map-entry lock.
//! - Expired entries are swept by a background task; a soft cap on table size
//!   triggers an inline sweep and, if still full, denies unseen identities.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::config::RateLimitSection;
use crate::obs::PipelineMetrics;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    capacity: u32,
    window: Duration,
    max_entries: usize,
    entries: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(capacity: u32, window: Duration, max_entries: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            window,
            max_entries: max_entries.max(1),
            entries: DashMap::new(),
        }
    }

    pub fn from_config(cfg: &RateLimitSection) -> Self {
        Self::new(cfg.capacity, cfg.window(), cfg.max_entries)
    }

    pub fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }

    /// Decide for `client` as of `now`.
    pub fn allow_at(&self, client: &str, now: Instant) -> bool {
        if !self.entries.contains_key(client) && self.entries.len() >= self.max_entries {
            let swept = self.sweep_expired_at(now);
            if self.entries.len() >= self.max_entries {
                tracing::warn!(
                    client,
                    swept,
                    len = self.entries.len(),
                    "rate limiter table full; denying new identity"
                );
                return false;
            }
        }

        match self.entries.entry(client.to_owned()) {
            Entry::Vacant(v) => {
                v.insert(Window { count: 1, started: now });
                true
            }
            Entry::Occupied(mut o) => {
                let w = o.get_mut();
                if now.saturating_duration_since(w.started) >= self.window {
                    *w = Window { count: 1, started: now };
                    true
                } else if w.count >= self.capacity {
                    // Saturated: the counter stays at capacity until the window rolls.
                    false
                } else {
                    w.count += 1;
                    true
                }
            }
        }
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Drop entries whose window has elapsed. Returns how many were removed.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Periodic eviction of expired windows.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        every: Duration,
        metrics: Arc<PipelineMetrics>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                let removed = self.sweep_expired();
                let len = self.len();
                metrics.rate_limit_entries.set(i64::try_from(len).unwrap_or(i64::MAX));
                if removed > 0 {
                    tracing::debug!(removed, len, "rate limiter swept expired windows");
                }
            }
        })
    }
}
