use crate::models::HeatmapCell;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub const HEATMAP_DAYS: i64 = 180;

/// Number of consecutive days ending at `today` that have an entry. A missing
/// entry for `today` means no streak, however long the run before it.
pub fn current_streak_at(today: NaiveDate, dates: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut streak = 0;
    let mut expected = today;
    for date in dates.range(..=today).rev() {
        if *date != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(1);
    }
    streak
}

/// One cell per day from `HEATMAP_DAYS` ago through `today`, oldest first.
pub fn heatmap_at(today: NaiveDate, dates: impl IntoIterator<Item = NaiveDate>) -> Vec<HeatmapCell> {
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let start = today - Duration::days(HEATMAP_DAYS);

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| HeatmapCell {
            date,
            count: u8::from(dates.contains(&date)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    #[test]
    fn empty_journal_has_no_streak() {
        assert_eq!(current_streak_at(today(), Vec::new()), 0);
    }

    #[test]
    fn entry_today_counts_one() {
        assert_eq!(current_streak_at(today(), [today()]), 1);
    }

    #[test]
    fn three_consecutive_days() {
        assert_eq!(current_streak_at(today(), [days_ago(2), today(), days_ago(1)]), 3);
    }

    #[test]
    fn streak_requires_today() {
        assert_eq!(current_streak_at(today(), [days_ago(1)]), 0);
        assert_eq!(current_streak_at(today(), (1..30).map(days_ago)), 0);
    }

    #[test]
    fn stops_at_first_gap() {
        let dates = [today(), days_ago(1), days_ago(2), days_ago(4), days_ago(5)];
        assert_eq!(current_streak_at(today(), dates), 3);
    }

    #[test]
    fn walks_across_month_and_year_boundaries() {
        // Runs from 2026-03-02 back into November 2025.
        let dates: Vec<_> = (0..95).map(days_ago).collect();
        assert_eq!(current_streak_at(today(), dates), 95);
    }

    #[test]
    fn future_entries_are_ignored() {
        let dates = [today() + Duration::days(1), today(), days_ago(1)];
        assert_eq!(current_streak_at(today(), dates), 2);
    }

    #[test]
    fn duplicate_dates_count_once() {
        assert_eq!(current_streak_at(today(), [today(), today(), days_ago(1)]), 2);
    }

    #[test]
    fn heatmap_covers_window_inclusive() {
        let cells = heatmap_at(today(), [today(), days_ago(HEATMAP_DAYS), days_ago(HEATMAP_DAYS + 1)]);
        assert_eq!(cells.len(), HEATMAP_DAYS as usize + 1);
        assert_eq!(cells.first().unwrap().date, days_ago(HEATMAP_DAYS));
        assert_eq!(cells.last().unwrap().date, today());
        assert_eq!(cells.iter().map(|c| u32::from(c.count)).sum::<u32>(), 2);
        assert_eq!(cells.first().unwrap().count, 1);
        assert_eq!(cells.last().unwrap().count, 1);
    }
}
