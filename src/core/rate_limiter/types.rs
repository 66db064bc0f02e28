//! Admission types and data structures

use chrono::{DateTime, Utc};
use std::fmt;

/// Length of one admission window
pub const WINDOW_SECS: i64 = 60;

/// Key under which a caller's budget is tracked
///
/// Always `user:<id>` or `ip:<addr>`, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Identity of an authenticated caller
    pub fn user(user_id: &str) -> Self {
        Self(format!("user:{}", user_id))
    }

    /// Identity of an anonymous caller by address
    pub fn ip(addr: &str) -> Self {
        let addr = addr.trim();
        if addr.is_empty() {
            Self("ip:unknown".to_string())
        } else {
            Self(format!("ip:{}", addr))
        }
    }

    /// Derive the identity for a request.
    ///
    /// Precedence: authenticated user id, then the first `X-Forwarded-For`
    /// entry, then the peer address.
    pub fn resolve(
        user_id: Option<&str>,
        forwarded_for: Option<&str>,
        peer_addr: Option<&str>,
    ) -> Self {
        if let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) {
            return Self::user(user_id.trim());
        }

        let forwarded = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        match forwarded {
            Some(addr) => Self::ip(addr),
            None => Self::ip(peer_addr.unwrap_or_default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Configured per-window limit
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the budget is next replenished
    pub reset_at: DateTime<Utc>,
}

impl AdmissionDecision {
    /// Decision returned when the shared store fails
    pub fn fail_open(limit: u32, now: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            reset_at: now + chrono::Duration::seconds(WINDOW_SECS),
        }
    }

    /// `reset_at` as epoch seconds, for the `X-RateLimit-Reset` header
    pub fn reset_epoch(&self) -> i64 {
        self.reset_at.timestamp()
    }

    /// Seconds a denied caller should wait, never less than one
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds();
        let secs = (millis + 999).div_euclid(1000);
        secs.max(1) as u64
    }
}

/// Which strategy the controller was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionMode {
    Local,
    Distributed,
}

impl AdmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Distributed => "distributed",
        }
    }
}

impl fmt::Display for AdmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
