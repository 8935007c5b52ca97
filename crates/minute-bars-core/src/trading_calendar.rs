use chrono::{Datelike, NaiveDate, Weekday};

/// Number of weekdays (Mon-Fri) in the inclusive range [start, end].
/// Exchange holidays are not accounted for.
pub fn weekday_count(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_week() {
        // Mon Nov 24 through Sun Nov 30, 2025
        assert_eq!(weekday_count(date(2025, 11, 24), date(2025, 11, 30)), 5);
    }

    #[test]
    fn weekend_only() {
        assert_eq!(weekday_count(date(2025, 11, 29), date(2025, 11, 30)), 0);
    }

    #[test]
    fn single_weekday() {
        assert_eq!(weekday_count(date(2025, 11, 26), date(2025, 11, 26)), 1);
    }

    #[test]
    fn inverted_range() {
        assert_eq!(weekday_count(date(2025, 11, 30), date(2025, 11, 24)), 0);
    }
}
