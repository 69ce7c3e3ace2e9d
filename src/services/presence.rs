//! Best-effort, time-bounded record of recently-active visitors.
//!
//! Process-local only: entries expire after a fixed TTL, a background task
//! sweeps them out, and the whole map resets on restart. The count is
//! advisory (admin dashboard), never correctness-critical.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config;

pub struct PresenceMap {
    entries: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
}

impl PresenceMap {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Process-wide instance, TTL from config
    pub fn instance() -> &'static PresenceMap {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<PresenceMap> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            PresenceMap::new(Duration::from_secs(config::config().cache.presence_ttl_secs))
        })
    }

    /// Record a heartbeat for a visitor
    pub fn touch(&self, visitor_id: &str) {
        self.touch_at(visitor_id, Instant::now());
    }

    /// Number of visitors seen within the TTL
    pub fn online_count(&self) -> usize {
        self.online_count_at(Instant::now())
    }

    /// Drop expired entries; returns how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn touch_at(&self, visitor_id: &str, now: Instant) {
        let mut entries = self.entries.lock().expect("presence map poisoned");
        entries.insert(visitor_id.to_string(), now + self.ttl);
    }

    fn online_count_at(&self, now: Instant) -> usize {
        let entries = self.entries.lock().expect("presence map poisoned");
        entries.values().filter(|expires| **expires > now).count()
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().expect("presence map poisoned");
        let before = entries.len();
        entries.retain(|_, expires| *expires > now);
        before - entries.len()
    }
}

/// Background sweep loop, spawned once at startup
pub async fn run_sweeper() {
    let interval_secs = config::config().cache.presence_sweep_secs;
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        interval.tick().await;
        let removed = PresenceMap::instance().sweep();
        if removed > 0 {
            tracing::debug!(removed, "swept expired presence entries");
        }
    }
}
