use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use gardepost_core::types::GeoPoint;

/// Which half of the day a duty covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyShift {
    Day,
    Night,
}

/// One on-call shift from the external feed. Read-only — duties are
/// consumed for coverage checks and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Duty {
    pub date: NaiveDate,
    pub shift: DutyShift,
    /// Location of the pharmacy on call. Duties without one never count
    /// toward coverage.
    pub location: Option<GeoPoint>,
}

/// Inclusive UTC window a report covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DutyWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Every calendar day in the window, start and end days included.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = self.start.date_naive();
        let last = self.end.date_naive();
        while current <= last {
            days.push(current);
            current += Duration::days(1);
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_days_are_inclusive_of_both_ends() {
        let window = DutyWindow::new(
            Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 12, 8, 0, 0).unwrap(),
        );
        let days = window.days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    }

    #[test]
    fn single_day_window_has_one_day() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        let window = DutyWindow::new(instant, instant);
        assert_eq!(window.days().len(), 1);
    }
}
