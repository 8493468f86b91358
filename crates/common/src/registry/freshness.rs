use std::time::Duration;

use time::OffsetDateTime;

/// How long a recorded `last_used_at` stays fresh before a read stamps a
/// new one.
pub const DEFAULT_TOUCH_INTERVAL: Duration = Duration::from_secs(30);
/// Distance of the advisory expiry from a record's last use.
pub const DEFAULT_EXPIRY_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Decides when a record's last-used timestamp should be refreshed, and
/// computes the advisory expiry instant returned to callers.
///
/// Expiry is a hint only. Nothing in the registry deletes a record when
/// its expiry passes; callers that need enforcement build it on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub touch_interval: Duration,
    pub expiry_interval: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            touch_interval: DEFAULT_TOUCH_INTERVAL,
            expiry_interval: DEFAULT_EXPIRY_INTERVAL,
        }
    }
}

impl FreshnessPolicy {
    /// True when a read observed at `now` should stamp a new
    /// `last_used_at`: the record was never touched, the last touch is
    /// older than the touch interval, or the recorded value sits in the
    /// future and needs correcting forward.
    pub fn should_touch(&self, last_used_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
        match last_used_at {
            None => true,
            Some(last_used_at) => last_used_at < now - self.touch_interval || last_used_at > now,
        }
    }

    /// Advisory expiry for a record: its last use, or its creation when
    /// never used, plus the expiry interval.
    pub fn expires_at(
        &self,
        created_at: OffsetDateTime,
        last_used_at: Option<OffsetDateTime>,
    ) -> OffsetDateTime {
        last_used_at.unwrap_or(created_at) + self.expiry_interval
    }
}
