//! In-memory rate limiter.
//!
//! Uses a sliding-window log: each key keeps the timestamps of its recent
//! requests, and a request is allowed while fewer than `limit` of them fall
//! inside the window. State is per process. Keys whose log has emptied are
//! evicted every `EVICT_EVERY` checks.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};

const GLOBAL_WINDOW_SECS: u32 = 60;
const EVICT_EVERY: u64 = 256;

type Logs = HashMap<RateLimitKey, VecDeque<u64>>;

/// In-memory sliding-window rate limiter.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    /// Request log per key, oldest first, in unix milliseconds.
    logs: Arc<RwLock<Logs>>,
    checks: AtomicU64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            logs: Arc::new(RwLock::new(HashMap::new())),
            checks: AtomicU64::new(0),
        }
    }

    fn limits_for(&self, scope: RateLimitScope) -> (u32, u32) {
        match scope {
            RateLimitScope::Global => (self.config.global_requests_per_minute, GLOBAL_WINDOW_SECS),
            RateLimitScope::Ip => (self.config.requests_per_window, self.config.window_secs),
        }
    }

    fn window_ms(&self, scope: RateLimitScope) -> u64 {
        u64::from(self.limits_for(scope).1) * 1000
    }

    /// Drops every key with no request left inside its window.
    fn evict_idle(&self, logs: &mut Logs, now: u64) -> usize {
        let before = logs.len();
        logs.retain(|key, log| {
            prune(log, now, self.window_ms(key.scope));
            !log.is_empty()
        });
        before - logs.len()
    }

    #[cfg(test)]
    async fn key_count(&self) -> usize {
        self.logs.read().await.len()
    }
}

/// Drops entries that have left the window.
fn prune(log: &mut VecDeque<u64>, now: u64, window_ms: u64) {
    let floor = now.saturating_sub(window_ms);
    while log.front().is_some_and(|&t| t <= floor) {
        log.pop_front();
    }
}

/// When the oldest entry leaves the window, or `now + window` for an empty log.
fn reset_millis(log: &VecDeque<u64>, now: u64, window_ms: u64) -> u64 {
    log.front().copied().unwrap_or(now) + window_ms
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let (limit, window_secs) = self.limits_for(key.scope);
        let window_ms = u64::from(window_secs) * 1000;
        let now = Timestamp::now().as_unix_millis();

        let mut logs = self.logs.write().await;

        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % EVICT_EVERY == 0 {
            let evicted = self.evict_idle(&mut logs, now);
            if evicted > 0 {
                tracing::debug!(evicted, remaining = logs.len(), "Evicted idle rate limit keys");
            }
        }

        let log = logs.entry(key.clone()).or_default();
        prune(log, now, window_ms);

        let reset_ms = reset_millis(log, now, window_ms);
        let reset_at = Timestamp::from_unix_secs(reset_ms.div_ceil(1000));

        if log.len() >= limit as usize {
            let retry_after = (reset_ms.saturating_sub(now).div_ceil(1000) as u32).max(1);

            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after,
                reset_at,
                scope: key.scope,
            }));
        }

        log.push_back(now);
        let remaining = limit.saturating_sub(log.len() as u32);

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining,
            reset_at,
            window_secs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter_with_ip_limit(limit: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            requests_per_window: limit,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn allows_requests_within_limit() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::default());
        let key = RateLimitKey::ip("192.168.1.1");

        // IP limit is 30 per window
        for i in 0..30 {
            let result = limiter.check(key.clone()).await.unwrap();
            assert!(result.is_allowed(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn denies_requests_at_limit() {
        let limiter = limiter_with_ip_limit(5);
        let key = RateLimitKey::ip("192.168.1.1");

        for _ in 0..5 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }

        let result = limiter.check(key.clone()).await.unwrap();
        assert!(result.is_denied());

        if let RateLimitResult::Denied(denied) = result {
            assert_eq!(denied.limit, 5);
            assert!(denied.retry_after_secs > 0 && denied.retry_after_secs <= 60);
            assert_eq!(denied.scope, RateLimitScope::Ip);
        }
    }

    #[tokio::test]
    async fn denied_requests_are_not_logged() {
        let limiter = limiter_with_ip_limit(2);
        let key = RateLimitKey::ip("10.0.0.9");

        for _ in 0..5 {
            limiter.check(key.clone()).await.unwrap();
        }

        assert_eq!(limiter.logs.read().await.values().next().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn window_slides_after_expiry() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            requests_per_window: 2,
            window_secs: 1,
            ..Default::default()
        });
        let key = RateLimitKey::ip("10.0.0.3");

        limiter.check(key.clone()).await.unwrap();
        limiter.check(key.clone()).await.unwrap();
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn idle_keys_are_evicted() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            window_secs: 1,
            ..Default::default()
        });

        for i in 0..EVICT_EVERY - 1 {
            limiter.check(RateLimitKey::ip(&format!("10.9.{}.{}", i / 256, i % 256))).await.unwrap();
        }
        assert_eq!(limiter.key_count().await, (EVICT_EVERY - 1) as usize);

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        limiter.check(RateLimitKey::ip("172.16.0.1")).await.unwrap();

        assert_eq!(limiter.key_count().await, 1);
    }

    #[test]
    fn evict_keeps_keys_with_live_entries() {
        let limiter = limiter_with_ip_limit(5);
        let now = 100_000;
        let mut logs: Logs = HashMap::new();
        logs.insert(RateLimitKey::ip("stale"), VecDeque::from(vec![1_000]));
        logs.insert(RateLimitKey::ip("live"), VecDeque::from(vec![99_000]));
        logs.insert(RateLimitKey::ip("empty"), VecDeque::new());

        assert_eq!(limiter.evict_idle(&mut logs, now), 2);
        assert!(logs.contains_key(&RateLimitKey::ip("live")));
    }

    // ─── Global Limit Tests ───────────────────────────────────────────

    #[tokio::test]
    async fn global_limit_applies_to_all_requests() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            global_requests_per_minute: 3,
            ..Default::default()
        });
        let key = RateLimitKey::global();

        for _ in 0..3 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }

        let result = limiter.check(key.clone()).await.unwrap();
        assert!(result.is_denied());
    }

    // ─── Different Keys Are Independent ───────────────────────────────

    #[tokio::test]
    async fn different_ips_have_independent_limits() {
        let limiter = limiter_with_ip_limit(3);
        let key1 = RateLimitKey::ip("1.1.1.1");
        let key2 = RateLimitKey::ip("2.2.2.2");

        for _ in 0..3 {
            limiter.check(key1.clone()).await.unwrap();
        }
        assert!(limiter.check(key1.clone()).await.unwrap().is_denied());

        assert!(limiter.check(key2.clone()).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn remaining_decrements_correctly() {
        let limiter = limiter_with_ip_limit(10);
        let key = RateLimitKey::ip("test-ip");

        for expected_remaining in (0..10u32).rev() {
            let result = limiter.check(key.clone()).await.unwrap();
            if let RateLimitResult::Allowed(status) = result {
                assert_eq!(status.remaining, expected_remaining);
            }
        }
    }

    #[test]
    fn prune_drops_entries_outside_window() {
        let mut log: VecDeque<u64> = [1_000, 5_000, 9_000].into_iter().collect();
        prune(&mut log, 10_000, 5_000);
        assert_eq!(log, VecDeque::from(vec![9_000]));
    }
}
