use chrono::{DateTime, Duration, Utc};

use crate::models::matches::Match;

/// Cutoff before kickoff after which predictions for a match are frozen.
/// Times are always the server's UTC clock.
#[derive(Debug, Clone, Copy)]
pub struct LockWindow {
    before_kickoff: Duration,
}

impl Default for LockWindow {
    fn default() -> Self {
        Self::from_minutes(5)
    }
}

impl LockWindow {
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            before_kickoff: Duration::minutes(minutes),
        }
    }

    pub fn locks_at(&self, fixture: &Match) -> DateTime<Utc> {
        fixture.start_time - self.before_kickoff
    }

    /// Open strictly before the cutoff; the cutoff instant itself is locked.
    pub fn is_open(&self, fixture: &Match, now: DateTime<Utc>) -> bool {
        now < self.locks_at(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kickoff_at_eight() -> Match {
        Match::new("PSG", "Inter Milan", Utc.with_ymd_and_hms(2025, 5, 31, 20, 0, 0).unwrap())
    }

    #[test]
    fn test_cutoff_instant_is_locked() {
        let window = LockWindow::default();
        let fixture = kickoff_at_eight();
        let cutoff = Utc.with_ymd_and_hms(2025, 5, 31, 19, 55, 0).unwrap();

        assert_eq!(window.locks_at(&fixture), cutoff);
        assert!(!window.is_open(&fixture, cutoff));
        assert!(window.is_open(&fixture, cutoff - Duration::seconds(1)));
    }

    #[test]
    fn test_after_kickoff_is_locked() {
        let window = LockWindow::default();
        let fixture = kickoff_at_eight();
        assert!(!window.is_open(&fixture, fixture.start_time + Duration::minutes(30)));
    }

    #[test]
    fn test_custom_window() {
        let window = LockWindow::from_minutes(60);
        let fixture = kickoff_at_eight();
        assert!(!window.is_open(&fixture, fixture.start_time - Duration::minutes(30)));
        assert!(window.is_open(&fixture, fixture.start_time - Duration::minutes(61)));
    }
}
