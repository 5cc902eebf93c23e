//! Reporting periods - inclusive calendar date ranges.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::draft::ValidationError;
use crate::Day;

/// An inclusive `from ..= to` calendar range that parameterizes every
/// score and list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day of the period
    pub from: Day,

    /// Last day of the period
    pub to: Day,
}

impl Period {
    /// Build a period, rejecting inverted bounds. Callers must hold a
    /// valid period before issuing any backend call.
    pub fn new(from: Day, to: Day) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedPeriod { from, to });
        }
        Ok(Self { from, to })
    }

    /// The calendar month containing `today`, first day through last.
    pub fn current_month(today: Day) -> Self {
        let from = today.with_day(1).expect("day 1 exists in every month");
        let to = last_day_of_month(today.year(), today.month());
        Self { from, to }
    }

    /// The calendar quarter containing `today`.
    pub fn current_quarter(today: Day) -> Self {
        let start_month = (today.month0() / 3) * 3 + 1;
        let from = Day::from_ymd_opt(today.year(), start_month, 1)
            .expect("quarter start is a valid date");
        let to = last_day_of_month(today.year(), start_month + 2);
        Self { from, to }
    }

    /// Number of days spanned, `to - from`. Scales the reference baseline.
    pub fn day_span(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Whether the given day falls inside the period.
    pub fn contains(&self, day: Day) -> bool {
        self.from <= day && day <= self.to
    }
}

fn last_day_of_month(year: i32, month: u32) -> Day {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    Day::from_ymd_opt(next_year, next_month, 1)
        .expect("first of next month is a valid date")
        .pred_opt()
        .expect("every month has a last day")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = Period::new(day(2025, 7, 1), day(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedPeriod { .. }));
        assert!(Period::new(day(2025, 6, 1), day(2025, 6, 1)).is_ok());
    }

    #[test]
    fn month_preset_covers_the_whole_month() {
        let p = Period::current_month(day(2025, 2, 14));
        assert_eq!(p.from, day(2025, 2, 1));
        assert_eq!(p.to, day(2025, 2, 28));

        let leap = Period::current_month(day(2024, 2, 14));
        assert_eq!(leap.to, day(2024, 2, 29));
    }

    #[test]
    fn quarter_preset_covers_three_months() {
        let p = Period::current_quarter(day(2025, 8, 5));
        assert_eq!(p.from, day(2025, 7, 1));
        assert_eq!(p.to, day(2025, 9, 30));

        let q4 = Period::current_quarter(day(2025, 11, 30));
        assert_eq!(q4.from, day(2025, 10, 1));
        assert_eq!(q4.to, day(2025, 12, 31));
    }

    #[test]
    fn day_span_matches_calendar_difference() {
        let p = Period::new(day(2025, 6, 1), day(2025, 7, 1)).unwrap();
        assert_eq!(p.day_span(), 30);
        assert!(p.contains(day(2025, 6, 15)));
        assert!(!p.contains(day(2025, 7, 2)));
    }
}
