//! In-memory OTP store for the mocked password-reset flow.
//!
//! Real SMS delivery is out of scope; codes are generated here, held for a
//! fixed TTL, and logged instead of sent. Process-local, resets on restart.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires: Instant,
}

#[derive(Debug, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    WrongCode,
    ExpiredOrMissing,
}

pub struct OtpStore {
    entries: Mutex<HashMap<String, OtpEntry>>,
    ttl: Duration,
}

impl OtpStore {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Process-wide instance, TTL from config
    pub fn instance() -> &'static OtpStore {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<OtpStore> = OnceLock::new();
        INSTANCE
            .get_or_init(|| OtpStore::new(Duration::from_secs(config::config().cache.otp_ttl_secs)))
    }

    /// Generate and store a 6-digit code for this phone, replacing any
    /// previous one. Returns the code so the dev response can echo it.
    pub fn issue(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        self.issue_at(phone, code.clone(), Instant::now());
        code
    }

    /// Check a submitted code without consuming it
    pub fn verify(&self, phone: &str, code: &str) -> OtpCheck {
        self.verify_at(phone, code, Instant::now())
    }

    /// True if a live (unexpired) entry exists for this phone
    pub fn has_live_entry(&self, phone: &str) -> bool {
        let now = Instant::now();
        let entries = self.entries.lock().expect("otp store poisoned");
        entries.get(phone).is_some_and(|e| e.expires > now)
    }

    /// Remove the entry after a successful reset
    pub fn consume(&self, phone: &str) {
        let mut entries = self.entries.lock().expect("otp store poisoned");
        entries.remove(phone);
    }

    /// Drop expired entries; returns how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn issue_at(&self, phone: &str, code: String, now: Instant) {
        let mut entries = self.entries.lock().expect("otp store poisoned");
        entries.insert(
            phone.to_string(),
            OtpEntry {
                code,
                expires: now + self.ttl,
            },
        );
    }

    fn verify_at(&self, phone: &str, code: &str, now: Instant) -> OtpCheck {
        let mut entries = self.entries.lock().expect("otp store poisoned");
        let entry = match entries.get(phone) {
            Some(entry) => entry.clone(),
            None => return OtpCheck::ExpiredOrMissing,
        };

        if entry.expires <= now {
            entries.remove(phone);
            return OtpCheck::ExpiredOrMissing;
        }
        if entry.code != code {
            return OtpCheck::WrongCode;
        }
        OtpCheck::Valid
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().expect("otp store poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires > now);
        before - entries.len()
    }
}

/// Background sweep loop, spawned once at startup
pub async fn run_sweeper() {
    let interval_secs = config::config().cache.otp_sweep_secs;
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        interval.tick().await;
        let removed = OtpStore::instance().sweep();
        if removed > 0 {
            tracing::debug!(removed, "swept expired OTP entries");
        }
    }
}
