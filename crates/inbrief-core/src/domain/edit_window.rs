//! Edit-window policy.

use chrono::{DateTime, TimeDelta, Utc};

/// How long after creation a post stays editable.
///
/// The bound is inclusive: a post created exactly `length` ago can still be
/// edited. Both instants must come from the same UTC clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWindow {
    length: TimeDelta,
}

impl EditWindow {
    pub const DEFAULT_HOURS: i64 = 24;

    pub fn new(length: TimeDelta) -> Self {
        Self { length }
    }

    pub fn hours(hours: i64) -> Self {
        Self::new(TimeDelta::hours(hours))
    }

    pub fn length(&self) -> TimeDelta {
        self.length
    }

    pub fn is_open(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at <= self.length
    }
}

impl Default for EditWindow {
    fn default() -> Self {
        Self::hours(Self::DEFAULT_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case::fresh(TimeDelta::zero(), true)]
    #[case::just_inside(TimeDelta::hours(23) + TimeDelta::minutes(59) + TimeDelta::seconds(59), true)]
    #[case::exact_boundary(TimeDelta::hours(24), true)]
    #[case::just_outside(TimeDelta::hours(24) + TimeDelta::seconds(1), false)]
    #[case::days_later(TimeDelta::days(3), false)]
    #[case::clock_skew(TimeDelta::seconds(-30), true)]
    fn test_default_window(#[case] age: TimeDelta, #[case] editable: bool) {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let window = EditWindow::default();

        assert_eq!(window.is_open(created_at, created_at + age), editable);
    }

    #[test]
    fn test_custom_window() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let window = EditWindow::hours(1);

        assert!(window.is_open(created_at, created_at + TimeDelta::minutes(60)));
        assert!(!window.is_open(created_at, created_at + TimeDelta::minutes(61)));
    }
}
