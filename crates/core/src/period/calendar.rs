//! Calendar math for monthly accounting periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month reference (`year`, `month` with month in 1..=12).
///
/// Periods are ordered chronologically by `(year, month)`; that ordering is
/// what "the previous period" means everywhere in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
}

impl MonthRef {
    /// Creates a month reference, rejecting out-of-range months.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        let next = self.next().first_day();
        next.pred_opt().unwrap_or(next)
    }

    /// The following calendar month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Human label, e.g. "March 2025".
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

/// Start and end dates of a month, or `None` for an out-of-range month.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let month_ref = MonthRef::new(year, month)?;
    Some((month_ref.first_day(), month_ref.last_day()))
}

/// Human label for a month, e.g. "March 2025".
#[must_use]
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", month_name(month), year)
}

/// The `(year, month)` pair following the given one.
#[must_use]
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Returns month name.
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(2025, 1, 31)]
    #[case(2025, 2, 28)]
    #[case(2024, 2, 29)] // leap year
    #[case(2000, 2, 29)] // divisible by 400
    #[case(1900, 2, 28)] // divisible by 100 but not 400
    #[case(2025, 4, 30)]
    #[case(2025, 12, 31)]
    fn test_last_day_of_month(#[case] year: i32, #[case] month: u32, #[case] day: u32) {
        let (start, end) = month_bounds(year, month).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(year, month, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(year, month, day).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_invalid_month() {
        assert!(month_bounds(2025, 0).is_none());
        assert!(month_bounds(2025, 13).is_none());
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2025, 3), "March 2025");
        assert_eq!(month_label(2026, 12), "December 2026");
    }

    #[test]
    fn test_next_month_wraps_year() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 6), (2025, 7));
    }

    #[test]
    fn test_month_ref_of_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let month_ref = MonthRef::of(date);
        assert_eq!(month_ref, MonthRef::new(2025, 3).unwrap());
        assert_eq!(month_ref.label(), "March 2025");
    }

    proptest! {
        /// Consecutive months tile the calendar: the day after one month's
        /// end is the next month's start.
        #[test]
        fn prop_months_tile_without_gaps(year in 1990i32..2100, month in 1u32..=12) {
            let month_ref = MonthRef::new(year, month).unwrap();
            let next = month_ref.next();
            prop_assert_eq!(
                month_ref.last_day().succ_opt().unwrap(),
                next.first_day()
            );
        }

        /// `(year, month)` ordering agrees with date ordering of month starts.
        #[test]
        fn prop_month_order_matches_date_order(
            a_year in 1990i32..2100, a_month in 1u32..=12,
            b_year in 1990i32..2100, b_month in 1u32..=12,
        ) {
            let a = MonthRef::new(a_year, a_month).unwrap();
            let b = MonthRef::new(b_year, b_month).unwrap();
            prop_assert_eq!(a.cmp(&b), a.first_day().cmp(&b.first_day()));
        }

        /// Every day of a month is inside the month's bounds.
        #[test]
        fn prop_bounds_contain_all_days(year in 1990i32..2100, month in 1u32..=12, day in 1u32..=31) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let (start, end) = month_bounds(year, month).unwrap();
                prop_assert!(date >= start && date <= end);
            }
        }
    }
}
