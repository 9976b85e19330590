//! Retention window for stored interactions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long interactions stay recallable before they may be pruned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Maximum age in days.
    pub retention_days: u32,
}

impl RetentionPolicy {
    /// Create a policy with the given window.
    pub fn new(retention_days: u32) -> Self {
        Self { retention_days }
    }

    /// Timestamp before which interactions count as stale.
    pub fn cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::days(i64::from(self.retention_days))
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_thirty_days() {
        let policy = RetentionPolicy::default();
        let age = Utc::now() - policy.cutoff();
        assert_eq!(age.num_days(), 30);
    }

    #[test]
    fn shorter_window_means_later_cutoff() {
        let tight = RetentionPolicy::new(1);
        let loose = RetentionPolicy::new(90);
        assert!(tight.cutoff() > loose.cutoff());
    }
}
